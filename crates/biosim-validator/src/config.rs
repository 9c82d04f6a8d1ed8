//! Validator configuration.

use std::path::PathBuf;

use tempfile::TempDir;

/// Where test cases live and where scratch directories are created.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    /// Directory of test-case descriptors and fixtures.
    pub test_case_dir: PathBuf,
    /// Parent of per-case scratch directories; the system temp dir when unset.
    pub temp_root: Option<PathBuf>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            test_case_dir: std::env::var("BIOSIM_TEST_SUITE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("test-cases")),
            temp_root: None,
        }
    }
}

impl ValidatorConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn new(test_case_dir: impl Into<PathBuf>) -> Self {
        ValidatorConfig {
            test_case_dir: test_case_dir.into(),
            temp_root: None,
        }
    }

    pub fn with_temp_root(mut self, temp_root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(temp_root.into());
        self
    }

    /// A fresh scratch directory, removed when dropped.
    pub(crate) fn scratch_dir(&self, prefix: &str) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }
}

//! Test-case catalog loading.
//!
//! A catalog is a directory of JSON descriptors, one per test case, next to
//! the fixture files they name.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CatalogError;
use crate::test_case::TestCase;

/// Load every `*.json` descriptor directly inside `dir`, ordered by file name.
///
/// Each case's `filename` is resolved against `dir`.
pub fn load_test_cases(dir: &Path) -> Result<Vec<TestCase>, CatalogError> {
    let read_error = |source| CatalogError::ReadError {
        path: dir.display().to_string(),
        source,
    };

    let mut descriptors: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            descriptors.push(path);
        }
    }
    descriptors.sort();

    let mut ids = HashSet::new();
    let mut cases = Vec::with_capacity(descriptors.len());
    for path in &descriptors {
        let case = load_test_case(path, dir)?;
        if !ids.insert(case.id.clone()) {
            return Err(CatalogError::DuplicateId {
                id: case.id,
                path: path.display().to_string(),
            });
        }
        cases.push(case);
    }

    debug!(dir = %dir.display(), cases = cases.len(), "Loaded test-case catalog");
    Ok(cases)
}

/// Load a single descriptor, resolving its fixture against `base_dir`.
pub fn load_test_case(path: &Path, base_dir: &Path) -> Result<TestCase, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut case: TestCase = serde_json::from_str(&content).map_err(|e| CatalogError::JsonError {
        path: path.display().to_string(),
        source: e,
    })?;
    case.filename = base_dir.join(&case.filename);
    Ok(case)
}

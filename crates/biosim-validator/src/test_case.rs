//! Test-case descriptors and per-case failures.

use std::path::PathBuf;

use biosim_domain::{ArchiveFormat, ModelFormat, ModelingFramework, SimulationFormat};
use serde::{Deserialize, Serialize};

use crate::error::CaseError;

/// What a test case's fixture file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestCaseType {
    /// A ready COMBINE archive, executed as-is.
    Archive,
    /// A bare model; an example simulation and archive are synthesized for it.
    Biomodel,
}

impl std::fmt::Display for TestCaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestCaseType::Archive => write!(f, "archive"),
            TestCaseType::Biomodel => write!(f, "biomodel"),
        }
    }
}

/// A conformance test case, as declared by a JSON descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestCase {
    pub id: String,

    /// Fixture path; relative to the catalog directory until loaded.
    pub filename: PathBuf,

    #[serde(rename = "type")]
    pub case_type: TestCaseType,

    pub modeling_framework: ModelingFramework,

    pub model_format: ModelFormat,

    pub simulation_format: SimulationFormat,

    pub archive_format: ArchiveFormat,
}

/// A test case together with the error that failed it.
#[derive(Debug)]
pub struct TestCaseException {
    pub test_case: TestCase,
    pub exception: CaseError,
}

impl std::fmt::Display for TestCaseException {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "test case {} failed: {}", self.test_case.id, self.exception)
    }
}

impl std::error::Error for TestCaseException {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.exception)
    }
}

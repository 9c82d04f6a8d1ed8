//! Error types for catalog loading, simulator execution and case validation

use std::path::PathBuf;

use biosim_combine::CombineError;
use thiserror::Error;

/// Failure to load the test-case catalog. Fatal for the validator.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse test case {path}: {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate test case id {id} in {path}")]
    DuplicateId { id: String, path: String },
}

/// Failure to run a simulator image on an archive.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("simulator timed out after {0} seconds")]
    Timeout(u64),

    #[error("simulator exited with code {exit_code}: {stderr}")]
    Failed { exit_code: i32, stderr: String },

    #[error("archive path has no file name: {0}")]
    InvalidArchivePath(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single test case failed.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("simulator did not produce output directory {0}")]
    MissingOutputDir(PathBuf),

    #[error("simulator did not produce report {0}")]
    MissingReport(PathBuf),

    #[error("time course of {report} is incorrect: {reason}")]
    TimeGridMismatch { report: PathBuf, reason: String },

    #[error("report {report} has the wrong columns (missing: {missing:?}, unexpected: {extra:?})")]
    ColumnMismatch {
        report: PathBuf,
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("unreadable report: {0}")]
    Report(#[from] csv::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Combine(#[from] CombineError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for test-case validation
pub type Result<T> = std::result::Result<T, CaseError>;

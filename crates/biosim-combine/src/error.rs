//! Error types for archive, model and simulation I/O

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CombineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("archive {0} has no manifest.xml")]
    MissingManifest(PathBuf),

    #[error("archive entry escapes the extraction directory: {0}")]
    UnsafeEntry(String),

    #[error("invalid {document} document: {reason}")]
    InvalidDocument {
        document: &'static str,
        reason: String,
    },

    #[error("{0} is not supported")]
    Unsupported(String),
}

impl CombineError {
    pub(crate) fn invalid(document: &'static str, reason: impl Into<String>) -> Self {
        CombineError::InvalidDocument {
            document,
            reason: reason.into(),
        }
    }
}

/// Result type for archive, model and simulation I/O
pub type Result<T> = std::result::Result<T, CombineError>;

//! Error types for data model operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Result type for data model operations
pub type Result<T> = std::result::Result<T, DomainError>;

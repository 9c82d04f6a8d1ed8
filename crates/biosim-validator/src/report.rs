//! JSON run summaries for CI.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validator::ValidationReport;

pub const SUMMARY_SCHEMA_VERSION: &str = "1.0";

/// A failed case in the persisted run summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailedCaseSummary {
    pub id: String,
    pub filename: String,
    pub error: String,
}

/// Run summary written for CI consumption.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationSummary {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub image: String,
    pub passed: Vec<String>,
    pub failed: Vec<FailedCaseSummary>,
    pub skipped: Vec<String>,
}

impl ValidationSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl ValidationReport {
    /// Summarize the run of `image`, stamped with the current time.
    pub fn summary(&self, image: &str) -> ValidationSummary {
        ValidationSummary {
            schema_version: SUMMARY_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            image: image.to_string(),
            passed: self.valid.iter().map(|c| c.id.clone()).collect(),
            failed: self
                .failed
                .iter()
                .map(|f| FailedCaseSummary {
                    id: f.test_case.id.clone(),
                    filename: f.test_case.filename.display().to_string(),
                    error: f.exception.to_string(),
                })
                .collect(),
            skipped: self.skipped.iter().map(|c| c.id.clone()).collect(),
        }
    }
}

/// Write the run summary as pretty JSON.
pub fn write_summary_json(path: &Path, summary: &ValidationSummary) -> Result<()> {
    let content = serde_json::to_string_pretty(summary).context("serialize validation summary")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

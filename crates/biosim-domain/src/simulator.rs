//! Simulators and their declared capabilities.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::ontology::Format;
use crate::simulation::Algorithm;

/// A containerized simulation tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Simulator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,

    /// Docker Hub image (e.g. `crbm/biosimulations_tellurium:2.4.1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_hub_image_id: Option<String>,

    /// Supported algorithms with their frameworks and formats.
    #[serde(default)]
    pub algorithms: Vec<Algorithm>,
}

impl Simulator {
    /// Read a simulator's properties from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

//! Ontology terms and file formats.

use serde::{Deserialize, Serialize};

/// A term from an ontology such as SBO, KISAO or EDAM.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub struct OntologyTerm {
    /// Ontology prefix (e.g. `SBO`, `KISAO`).
    pub ontology: String,

    /// Identifier within the ontology (e.g. `0000019`).
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iri: Option<String>,
}

impl OntologyTerm {
    pub fn new(ontology: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            ontology: ontology.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// `ONTOLOGY:id`, the form used by SED-ML `kisaoID` attributes.
    pub fn curie(&self) -> String {
        format!("{}:{}", self.ontology, self.id)
    }

    /// Parse a `ONTOLOGY:id` compact identifier.
    pub fn from_curie(curie: &str) -> Option<Self> {
        let (ontology, id) = curie.split_once(':')?;
        if ontology.is_empty() || id.is_empty() {
            return None;
        }
        Some(Self::new(ontology, id))
    }
}

/// A file format (model language, simulation language, archive format, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Format {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edam_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// URL of the format's specification; used as the format URI in
    /// COMBINE manifests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// SED-ML `language` URN for model formats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sed_urn: Option<String>,
}

impl Format {
    /// A format known only by its specification URL.
    pub fn from_spec_url(spec_url: impl Into<String>) -> Self {
        Self {
            spec_url: Some(spec_url.into()),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Whether this format's specification URL equals `spec_url`.
    pub fn has_spec_url(&self, spec_url: &str) -> bool {
        self.spec_url.as_deref() == Some(spec_url)
    }
}

//! Catalogs of modeling frameworks and model, simulation and archive formats.
//!
//! Each catalog is a closed enum whose catalog name (e.g. `non_spatial_continuous`,
//! `SBML`, `sedml`, `combine`) is what test-case descriptors and CLI flags use.
//! Names parse case-insensitively and serialize back to their canonical spelling.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::ontology::{Format, OntologyTerm};

macro_rules! catalog_names {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Every entry of the catalog, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Canonical catalog name.
            pub fn name(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| DomainError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $ty {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> String {
                value.name().to_string()
            }
        }
    };
}

/// Static description of a catalogued format.
struct FormatSpec {
    id: &'static str,
    name: &'static str,
    edam_id: Option<&'static str>,
    url: &'static str,
    spec_url: &'static str,
    mime_type: &'static str,
    extension: &'static str,
    sed_urn: Option<&'static str>,
}

impl FormatSpec {
    fn to_format(&self) -> Format {
        Format {
            id: Some(self.id.to_string()),
            name: Some(self.name.to_string()),
            version: None,
            edam_id: self.edam_id.map(str::to_string),
            url: Some(self.url.to_string()),
            spec_url: Some(self.spec_url.to_string()),
            mime_type: Some(self.mime_type.to_string()),
            extension: Some(self.extension.to_string()),
            sed_urn: self.sed_urn.map(str::to_string),
        }
    }
}

// ---------------------------------------------------------------------------
// Modeling frameworks
// ---------------------------------------------------------------------------

/// SBO modeling framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ModelingFramework {
    FluxBalance,
    Logical,
    NonSpatialContinuous,
    NonSpatialDiscrete,
    SpatialContinuous,
    SpatialDiscrete,
}

catalog_names!(ModelingFramework, "modeling framework", {
    FluxBalance => "flux_balance",
    Logical => "logical",
    NonSpatialContinuous => "non_spatial_continuous",
    NonSpatialDiscrete => "non_spatial_discrete",
    SpatialContinuous => "spatial_continuous",
    SpatialDiscrete => "spatial_discrete",
});

impl ModelingFramework {
    /// SBO identifier of the framework.
    pub fn sbo_id(&self) -> &'static str {
        match self {
            ModelingFramework::FluxBalance => "0000624",
            ModelingFramework::Logical => "0000234",
            ModelingFramework::NonSpatialContinuous => "0000293",
            ModelingFramework::NonSpatialDiscrete => "0000295",
            ModelingFramework::SpatialContinuous => "0000292",
            ModelingFramework::SpatialDiscrete => "0000294",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ModelingFramework::FluxBalance => "flux balance framework",
            ModelingFramework::Logical => "logical framework",
            ModelingFramework::NonSpatialContinuous => "non-spatial continuous framework",
            ModelingFramework::NonSpatialDiscrete => "non-spatial discrete framework",
            ModelingFramework::SpatialContinuous => "spatial continuous framework",
            ModelingFramework::SpatialDiscrete => "spatial discrete framework",
        }
    }

    /// The framework as an SBO ontology term.
    pub fn term(&self) -> OntologyTerm {
        let mut term = OntologyTerm::new("SBO", self.sbo_id()).with_name(self.label());
        term.iri = Some(format!("http://biomodels.net/SBO/SBO_{}", self.sbo_id()));
        term
    }
}

// ---------------------------------------------------------------------------
// Model formats
// ---------------------------------------------------------------------------

const BNGL: FormatSpec = FormatSpec {
    id: "BNGL",
    name: "BioNetGen Language",
    edam_id: None,
    url: "https://bionetgen.org/",
    spec_url: "https://bionetgen.org/",
    mime_type: "text/plain",
    extension: "bngl",
    sed_urn: None,
};

const CELLML: FormatSpec = FormatSpec {
    id: "CellML",
    name: "CellML",
    edam_id: Some("format_3240"),
    url: "https://www.cellml.org/",
    spec_url: "http://identifiers.org/combine.specifications/cellml",
    mime_type: "application/cellml+xml",
    extension: "cellml",
    sed_urn: Some("urn:sedml:language:cellml"),
};

const KAPPA: FormatSpec = FormatSpec {
    id: "Kappa",
    name: "Kappa",
    edam_id: None,
    url: "https://kappalanguage.org/",
    spec_url: "https://kappalanguage.org/",
    mime_type: "text/plain",
    extension: "ka",
    sed_urn: None,
};

const MML: FormatSpec = FormatSpec {
    id: "MML",
    name: "Multiscale Modeling Language",
    edam_id: None,
    url: "https://doi.org/10.1016/j.procs.2010.04.089",
    spec_url: "https://doi.org/10.1016/j.procs.2010.04.089",
    mime_type: "application/xml",
    extension: "xml",
    sed_urn: None,
};

const NEUROML: FormatSpec = FormatSpec {
    id: "NeuroML",
    name: "NeuroML",
    edam_id: None,
    url: "https://neuroml.org/",
    spec_url: "http://identifiers.org/combine.specifications/neuroml",
    mime_type: "application/xml",
    extension: "nml",
    sed_urn: Some("urn:sedml:language:neuroml"),
};

const PHARMML: FormatSpec = FormatSpec {
    id: "pharmML",
    name: "Pharmacometrics Markup Language",
    edam_id: None,
    url: "http://www.pharmml.org/",
    spec_url: "http://www.pharmml.org/",
    mime_type: "application/xml",
    extension: "xml",
    sed_urn: None,
};

const SBML: FormatSpec = FormatSpec {
    id: "SBML",
    name: "Systems Biology Markup Language",
    edam_id: Some("format_2585"),
    url: "http://sbml.org/",
    spec_url: "http://identifiers.org/combine.specifications/sbml",
    mime_type: "application/sbml+xml",
    extension: "xml",
    sed_urn: Some("urn:sedml:language:sbml"),
};

/// Model language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ModelFormat {
    Bngl,
    CellMl,
    Kappa,
    Mml,
    NeuroMl,
    PharmMl,
    Sbml,
}

catalog_names!(ModelFormat, "model format", {
    Bngl => "BNGL",
    CellMl => "CellML",
    Kappa => "Kappa",
    Mml => "MML",
    NeuroMl => "NeuroML",
    PharmMl => "pharmML",
    Sbml => "SBML",
});

impl ModelFormat {
    fn spec(&self) -> &'static FormatSpec {
        match self {
            ModelFormat::Bngl => &BNGL,
            ModelFormat::CellMl => &CELLML,
            ModelFormat::Kappa => &KAPPA,
            ModelFormat::Mml => &MML,
            ModelFormat::NeuroMl => &NEUROML,
            ModelFormat::PharmMl => &PHARMML,
            ModelFormat::Sbml => &SBML,
        }
    }

    /// Format id, as declared by simulators (e.g. `SBML`).
    pub fn id(&self) -> &'static str {
        self.spec().id
    }

    pub fn spec_url(&self) -> &'static str {
        self.spec().spec_url
    }

    /// SED-ML `language` URN, when SED-ML defines one.
    pub fn sed_urn(&self) -> Option<&'static str> {
        self.spec().sed_urn
    }

    pub fn format(&self) -> Format {
        self.spec().to_format()
    }

    /// Resolve a SED-ML `language` attribute (`urn:sedml:language:sbml`,
    /// optionally with a level/version suffix) to a model format.
    pub fn from_sed_urn(urn: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|format| {
            format
                .sed_urn()
                .map(|known| urn == known || urn.starts_with(&format!("{known}.")))
                .unwrap_or(false)
        })
    }
}

// ---------------------------------------------------------------------------
// Simulation formats
// ---------------------------------------------------------------------------

const SEDML: FormatSpec = FormatSpec {
    id: "SED-ML",
    name: "Simulation Experiment Description Markup Language",
    edam_id: Some("format_3685"),
    url: "https://sed-ml.org/",
    spec_url: "http://identifiers.org/combine.specifications/sed-ml",
    mime_type: "application/xml",
    extension: "sedml",
    sed_urn: None,
};

const SESSL: FormatSpec = FormatSpec {
    id: "SESSL",
    name: "Simulation Experiment Specification via a Scala Layer",
    edam_id: None,
    url: "http://sessl.org/",
    spec_url: "http://sessl.org/",
    mime_type: "text/plain",
    extension: "scala",
    sed_urn: None,
};

/// Simulation experiment language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SimulationFormat {
    Sedml,
    Sessl,
}

catalog_names!(SimulationFormat, "simulation format", {
    Sedml => "sedml",
    Sessl => "sessl",
});

impl SimulationFormat {
    fn spec(&self) -> &'static FormatSpec {
        match self {
            SimulationFormat::Sedml => &SEDML,
            SimulationFormat::Sessl => &SESSL,
        }
    }

    pub fn id(&self) -> &'static str {
        self.spec().id
    }

    pub fn spec_url(&self) -> &'static str {
        self.spec().spec_url
    }

    pub fn format(&self) -> Format {
        self.spec().to_format()
    }
}

// ---------------------------------------------------------------------------
// Archive formats
// ---------------------------------------------------------------------------

const COMBINE: FormatSpec = FormatSpec {
    id: "COMBINE",
    name: "COMBINE archive",
    edam_id: Some("format_3686"),
    url: "https://combinearchive.org/",
    spec_url: "http://identifiers.org/combine.specifications/omex",
    mime_type: "application/zip",
    extension: "omex",
    sed_urn: None,
};

/// Archive format bundling models and simulation experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ArchiveFormat {
    Combine,
}

catalog_names!(ArchiveFormat, "archive format", {
    Combine => "combine",
});

impl ArchiveFormat {
    fn spec(&self) -> &'static FormatSpec {
        match self {
            ArchiveFormat::Combine => &COMBINE,
        }
    }

    pub fn id(&self) -> &'static str {
        self.spec().id
    }

    pub fn spec_url(&self) -> &'static str {
        self.spec().spec_url
    }

    pub fn format(&self) -> Format {
        self.spec().to_format()
    }
}

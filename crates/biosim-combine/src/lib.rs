//! COMBINE/OMEX archives, SBML models and SED-ML simulations
//!
//! - `archive`: unpack and pack COMBINE archives and their manifests
//! - `sbml`: read species and parameters from SBML models
//! - `sedml`: read and write uniform timecourse simulations
//! - `synth`: package a model and a simulation into a new archive

pub mod archive;
pub mod error;
pub mod sbml;
pub mod sedml;
pub mod synth;

mod xml;

pub use archive::{read_archive, write_archive, ArchiveFile, CombineArchive, MANIFEST_FILENAME};
pub use error::{CombineError, Result};
pub use sbml::read_biomodel;
pub use sedml::{read_simulations, write_simulation};
pub use synth::gen_archive_for_sim;

//! Packaging a model and one simulation into a COMBINE archive.

use std::path::Path;

use biosim_domain::{ModelFormat, SimulationFormat, TimecourseSimulation};
use tracing::debug;

use crate::archive::{write_archive, ArchiveFile, CombineArchive};
use crate::error::{CombineError, Result};
use crate::sedml::write_simulation;

/// Write a COMBINE archive at `archive_path` holding the model file at
/// `model_path` and a SED-ML document for `simulation`, which is the master
/// file.
///
/// Files are staged in a temporary directory that is removed on return.
pub fn gen_archive_for_sim(
    model_path: &Path,
    simulation: &TimecourseSimulation,
    archive_path: &Path,
) -> Result<CombineArchive> {
    let model_filename = model_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CombineError::Unsupported(format!("model path {}", model_path.display())))?;
    let sedml_filename = format!("{}.sedml", simulation.id);

    let model_spec_url = simulation
        .model
        .format
        .as_ref()
        .and_then(|f| f.spec_url.clone())
        .unwrap_or_else(|| ModelFormat::Sbml.spec_url().to_string());

    let staging = tempfile::tempdir()?;
    std::fs::copy(model_path, staging.path().join(&model_filename))?;
    write_simulation(
        simulation,
        &model_filename,
        &staging.path().join(&sedml_filename),
    )?;

    let archive = CombineArchive {
        files: vec![
            ArchiveFile::new(model_filename, model_spec_url),
            ArchiveFile::new(sedml_filename, SimulationFormat::Sedml.spec_url()).as_master(),
        ],
    };
    write_archive(&archive, staging.path(), archive_path)?;

    debug!(
        archive = %archive_path.display(),
        simulation = %simulation.id,
        "Generated archive for simulation"
    );
    Ok(archive)
}

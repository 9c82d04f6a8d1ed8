//! End-to-end validation runs with stub execution engines.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use biosim_combine::{
    gen_archive_for_sim, read_archive, read_biomodel, read_simulations, write_archive,
    ArchiveFile, CombineArchive,
};
use biosim_domain::{linspace, ModelFormat, SimulationFormat, Simulator, TimecourseSimulation};
use biosim_validator::{
    gen_example_simulation, CaseError, EngineError, ExecutionEngine, SimulatorValidator,
    ValidatorConfig,
};
use serde_json::json;

const MODEL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sbml xmlns="http://www.sbml.org/sbml/level3/version2/core" level="3" version="2">
  <model id="toy">
    <listOfSpecies>
      <species id="A" initialConcentration="10"/>
      <species id="B" initialConcentration="0"/>
      <species id="C" initialAmount="1"/>
    </listOfSpecies>
  </model>
</sbml>"#;

#[derive(Clone, Copy, PartialEq)]
enum Behaviour {
    /// Writes every report the archive asks for.
    Correct,
    /// Writes reports without the last model variable.
    DropLastVariable,
    /// Exits successfully without writing anything.
    Silent,
}

/// Stands in for a simulator image by reading the archive itself.
struct StubEngine {
    behaviour: Behaviour,
    simulations: Mutex<Vec<TimecourseSimulation>>,
}

impl StubEngine {
    fn new(behaviour: Behaviour) -> Self {
        StubEngine {
            behaviour,
            simulations: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ExecutionEngine for StubEngine {
    async fn exec_archive(
        &self,
        archive_path: &Path,
        _image: &str,
        out_dir: &Path,
    ) -> Result<(), EngineError> {
        if self.behaviour == Behaviour::Silent {
            return Ok(());
        }

        let unpacked = tempfile::tempdir()?;
        let archive = read_archive(archive_path, unpacked.path())
            .map_err(|e| EngineError::Failed { exit_code: 1, stderr: e.to_string() })?;

        for file in archive.files_with_spec_url(SimulationFormat::Sedml.spec_url()) {
            let sims = read_simulations(&unpacked.path().join(&file.filename))
                .map_err(|e| EngineError::Failed { exit_code: 1, stderr: e.to_string() })?;
            let dir = out_dir.join(Path::new(&file.filename).with_extension(""));
            std::fs::create_dir_all(&dir)?;

            for sim in sims {
                let mut columns = vec!["time".to_string()];
                columns.extend(sim.model.variable_ids().iter().map(|id| id.to_string()));
                if self.behaviour == Behaviour::DropLastVariable {
                    columns.pop();
                }

                let mut writer = csv::Writer::from_path(dir.join(format!("{}.csv", sim.id)))
                    .map_err(|e| EngineError::Failed { exit_code: 1, stderr: e.to_string() })?;
                writer.write_record(&columns).map_err(std::io::Error::from)?;
                for t in sim.output_times() {
                    let mut row = vec![t.to_string()];
                    row.extend(std::iter::repeat("0".to_string()).take(columns.len() - 1));
                    writer.write_record(&row).map_err(std::io::Error::from)?;
                }
                writer.flush()?;
                self.simulations.lock().unwrap().push(sim);
            }
        }
        Ok(())
    }
}

fn descriptor(dir: &Path, id: &str, filename: &str, case_type: &str, framework: &str) {
    let content = json!({
        "id": id,
        "filename": filename,
        "type": case_type,
        "modeling-framework": framework,
        "model-format": "SBML",
        "simulation-format": "sedml",
        "archive-format": "combine"
    });
    std::fs::write(dir.join(format!("{id}.json")), content.to_string()).unwrap();
}

/// Catalog of an archive case, a biomodel case and an unsupported spatial case.
fn catalog() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("toy.xml");
    std::fs::write(&model_path, MODEL).unwrap();

    let model = read_biomodel(&model_path, ModelFormat::Sbml).unwrap();
    let mut simulation = gen_example_simulation(model);
    simulation.end_time = 5.0;
    simulation.num_time_points = 50;
    gen_archive_for_sim(&model_path, &simulation, &dir.path().join("toy.omex")).unwrap();

    descriptor(dir.path(), "1-archive", "toy.omex", "archive", "non_spatial_continuous");
    descriptor(dir.path(), "2-biomodel", "toy.xml", "biomodel", "non_spatial_continuous");
    descriptor(dir.path(), "3-spatial", "toy.omex", "archive", "spatial_continuous");
    dir
}

fn simulator() -> Simulator {
    serde_json::from_value(json!({
        "id": "stub",
        "algorithms": [{
            "modelingFrameworks": [{ "ontology": "SBO", "id": "0000293" }],
            "modelFormats": [{ "id": "SBML" }],
            "simulationFormats": [{ "id": "SED-ML" }],
            "archiveFormats": [{ "id": "COMBINE" }]
        }]
    }))
    .unwrap()
}

fn ids<'a>(cases: impl IntoIterator<Item = &'a biosim_validator::TestCase>) -> Vec<String> {
    cases.into_iter().map(|c| c.id.clone()).collect()
}

#[test]
fn catalog_has_one_case_per_descriptor() {
    let dir = catalog();
    let validator = SimulatorValidator::new(ValidatorConfig::new(dir.path())).unwrap();
    assert_eq!(
        ids(validator.test_cases()),
        vec!["1-archive", "2-biomodel", "3-spatial"]
    );
}

#[tokio::test]
async fn correct_simulator_passes_supported_cases() {
    let dir = catalog();
    let temp_root = tempfile::tempdir().unwrap();
    let config = ValidatorConfig::new(dir.path()).with_temp_root(temp_root.path());
    let validator = SimulatorValidator::new(config).unwrap();
    let engine = StubEngine::new(Behaviour::Correct);

    let report = validator.run(&engine, "stub:latest", &simulator(), None).await;

    assert_eq!(ids(&report.valid), vec!["1-archive", "2-biomodel"]);
    assert!(report.failed.is_empty(), "{:?}", report.failed);
    assert_eq!(ids(&report.skipped), vec!["3-spatial"]);
    assert_eq!(report.total(), validator.test_cases().len());

    let simulations = engine.simulations.lock().unwrap();
    assert_eq!(simulations.len(), 2);
    assert_eq!(simulations[0].output_times(), linspace(0.0, 5.0, 51));
    assert_eq!(simulations[1].output_times(), linspace(0.0, 10.0, 101));
    assert_eq!(simulations[1].model.variable_ids(), vec!["A", "B", "C"]);

    let leftovers: Vec<PathBuf> = std::fs::read_dir(temp_root.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert!(leftovers.is_empty(), "scratch directories left behind: {leftovers:?}");
}

#[tokio::test]
async fn silent_simulator_fails_with_missing_output() {
    let dir = catalog();
    let temp_root = tempfile::tempdir().unwrap();
    let config = ValidatorConfig::new(dir.path()).with_temp_root(temp_root.path());
    let validator = SimulatorValidator::new(config).unwrap();
    let engine = StubEngine::new(Behaviour::Silent);

    let report = validator.run(&engine, "stub:latest", &simulator(), None).await;

    assert!(report.valid.is_empty());
    assert_eq!(report.failed.len(), 2);
    assert_eq!(report.failed[0].test_case.id, "1-archive");
    assert!(matches!(
        report.failed[0].exception,
        CaseError::MissingOutputDir(ref path) if path.ends_with("simulation_1")
    ));
    assert_eq!(ids(&report.skipped), vec!["3-spatial"]);
    assert_eq!(std::fs::read_dir(temp_root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn missing_variable_column_is_reported() {
    let dir = catalog();
    let validator = SimulatorValidator::new(ValidatorConfig::new(dir.path())).unwrap();
    let engine = StubEngine::new(Behaviour::DropLastVariable);
    let selected = vec!["2-biomodel".to_string()];

    let report = validator
        .run(&engine, "stub:latest", &simulator(), Some(&selected))
        .await;

    assert_eq!(ids(&report.skipped), vec!["1-archive", "3-spatial"]);
    assert_eq!(report.failed.len(), 1);
    match &report.failed[0].exception {
        CaseError::ColumnMismatch { missing, extra, .. } => {
            assert_eq!(missing, &vec!["C".to_string()]);
            assert!(extra.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn partial_capabilities_skip_everything() {
    let dir = catalog();
    let validator = SimulatorValidator::new(ValidatorConfig::new(dir.path())).unwrap();
    let engine = StubEngine::new(Behaviour::Correct);
    let mut simulator = simulator();
    simulator.algorithms[0].archive_formats.clear();

    let report = validator.run(&engine, "stub:latest", &simulator, None).await;

    assert_eq!(report.skipped.len(), 3);
    assert!(engine.simulations.lock().unwrap().is_empty());
}

/// Archive with a single SED-ML file `sim.sedml` listing `simulations`.
fn sedml_archive(dir: &Path, name: &str, simulations: &str) {
    let staging = tempfile::tempdir().unwrap();
    let sedml = format!(
        r#"<sedML xmlns="http://sed-ml.org/sed-ml/level1/version3" level="1" version="3">
          <listOfSimulations>{simulations}</listOfSimulations>
        </sedML>"#
    );
    std::fs::write(staging.path().join("sim.sedml"), sedml).unwrap();
    let manifest = CombineArchive {
        files: vec![ArchiveFile::new("sim.sedml", SimulationFormat::Sedml.spec_url()).as_master()],
    };
    write_archive(&manifest, staging.path(), &dir.join(name)).unwrap();
}

#[tokio::test]
async fn oversized_time_course_fails_only_its_case() {
    let dir = catalog();
    sedml_archive(
        dir.path(),
        "huge.omex",
        r#"<uniformTimeCourse id="s1" initialTime="0" outputStartTime="0" outputEndTime="1" numberOfPoints="18446744073709551615"/>"#,
    );
    descriptor(dir.path(), "0-huge", "huge.omex", "archive", "non_spatial_continuous");
    let validator = SimulatorValidator::new(ValidatorConfig::new(dir.path())).unwrap();
    let engine = StubEngine::new(Behaviour::Correct);

    let report = validator.run(&engine, "stub:latest", &simulator(), None).await;

    assert_eq!(report.total(), 4);
    assert_eq!(ids(&report.valid), vec!["1-archive", "2-biomodel"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].test_case.id, "0-huge");
}

#[tokio::test]
async fn sedml_without_simulations_needs_no_output() {
    let dir = tempfile::tempdir().unwrap();
    sedml_archive(dir.path(), "empty.omex", "");
    descriptor(dir.path(), "empty", "empty.omex", "archive", "non_spatial_continuous");
    let validator = SimulatorValidator::new(ValidatorConfig::new(dir.path())).unwrap();
    let engine = StubEngine::new(Behaviour::Silent);

    let report = validator.run(&engine, "stub:latest", &simulator(), None).await;

    assert!(report.failed.is_empty(), "{:?}", report.failed);
    assert_eq!(ids(&report.valid), vec!["empty"]);
}

//! The simulator conformance-test runner.

use std::path::PathBuf;

use biosim_combine::{gen_archive_for_sim, read_biomodel};
use biosim_domain::Simulator;
use tempfile::TempDir;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::capability::SimulatorCapabilities;
use crate::catalog::load_test_cases;
use crate::config::ValidatorConfig;
use crate::engine::ExecutionEngine;
use crate::error::{CatalogError, Result};
use crate::example::gen_example_simulation;
use crate::output::check_archive_output;
use crate::test_case::{TestCase, TestCaseException, TestCaseType};

/// Outcome of a validation run. Every catalog case lands in exactly one of
/// the three lists, in catalog order.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub valid: Vec<TestCase>,
    pub failed: Vec<TestCaseException>,
    pub skipped: Vec<TestCase>,
}

impl ValidationReport {
    /// Whether no case failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.valid.len() + self.failed.len() + self.skipped.len()
    }
}

/// Runs a catalog of test cases against simulator images.
#[derive(Debug, Clone)]
pub struct SimulatorValidator {
    config: ValidatorConfig,
    test_cases: Vec<TestCase>,
}

impl SimulatorValidator {
    /// Load the catalog from `config.test_case_dir`.
    pub fn new(config: ValidatorConfig) -> std::result::Result<Self, CatalogError> {
        let test_cases = load_test_cases(&config.test_case_dir)?;
        info!(
            dir = %config.test_case_dir.display(),
            cases = test_cases.len(),
            "Loaded test cases"
        );
        Ok(Self::from_test_cases(config, test_cases))
    }

    pub fn from_test_cases(config: ValidatorConfig, test_cases: Vec<TestCase>) -> Self {
        SimulatorValidator { config, test_cases }
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate `image` against every test case the simulator declares
    /// support for.
    ///
    /// With `selected_ids`, cases not listed are skipped. Cases run one at a
    /// time; a failing case is recorded and the run moves on.
    pub async fn run<E>(
        &self,
        engine: &E,
        image: &str,
        simulator: &Simulator,
        selected_ids: Option<&[String]>,
    ) -> ValidationReport
    where
        E: ExecutionEngine + ?Sized,
    {
        let capabilities = SimulatorCapabilities::from_simulator(simulator);
        let mut report = ValidationReport::default();

        for case in &self.test_cases {
            let span = info_span!("biosim.case", case_id = %case.id);

            if let Some(ids) = selected_ids {
                if !ids.iter().any(|id| *id == case.id) {
                    span.in_scope(|| debug!(outcome = "skipped", reason = "not selected"));
                    report.skipped.push(case.clone());
                    continue;
                }
            }

            let unmet = capabilities.unmet_requirements(case);
            if !unmet.is_empty() {
                span.in_scope(|| info!(outcome = "skipped", unsupported = ?unmet, "Skipping test case"));
                report.skipped.push(case.clone());
                continue;
            }

            match self
                .validate_case(engine, image, case)
                .instrument(span.clone())
                .await
            {
                Ok(()) => {
                    span.in_scope(|| info!(outcome = "passed", "Test case passed"));
                    report.valid.push(case.clone());
                }
                Err(exception) => {
                    span.in_scope(|| warn!(outcome = "failed", error = %exception, "Test case failed"));
                    report.failed.push(TestCaseException {
                        test_case: case.clone(),
                        exception,
                    });
                }
            }
        }

        info!("Passed {} test cases", report.valid.len());
        info!("Failed {} test cases", report.failed.len());
        info!("Skipped {} test cases", report.skipped.len());
        report
    }

    async fn validate_case<E>(&self, engine: &E, image: &str, case: &TestCase) -> Result<()>
    where
        E: ExecutionEngine + ?Sized,
    {
        // The synthesized archive lives until `_synth_dir` drops at the end of the case.
        let (archive_path, _synth_dir): (PathBuf, Option<TempDir>) = match case.case_type {
            TestCaseType::Archive => (case.filename.clone(), None),
            TestCaseType::Biomodel => {
                let dir = self.config.scratch_dir("biosim-synth-")?;
                let model = read_biomodel(&case.filename, case.model_format)?;
                let simulation = gen_example_simulation(model);
                let path = dir.path().join(format!("{}.omex", case.id));
                gen_archive_for_sim(&case.filename, &simulation, &path)?;
                (path, Some(dir))
            }
        };

        let out_dir = self.config.scratch_dir("biosim-out-")?;
        debug!(archive = %archive_path.display(), image, "Executing archive");
        engine.exec_archive(&archive_path, image, out_dir.path()).await?;

        let unpack_dir = self.config.scratch_dir("biosim-unpack-")?;
        check_archive_output(case, &archive_path, out_dir.path(), unpack_dir.path())
    }
}

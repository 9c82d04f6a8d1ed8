//! BioSimulators simulator conformance testing
//!
//! Loads a catalog of test cases, selects those a simulator declares support
//! for, runs its image on each case's COMBINE archive and checks the reports
//! it produces:
//! - `catalog`: test-case descriptors from a directory of JSON files
//! - `capability`: matching cases against a simulator's algorithms
//! - `example`: the example simulation synthesized for bare models
//! - `engine`: running simulator images (`docker run`)
//! - `output`: checking report locations, time grids and columns
//! - `validator`: the runner and its report
//! - `report`: JSON run summaries

pub mod capability;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod example;
pub mod output;
pub mod report;
pub mod telemetry;
pub mod test_case;
pub mod validator;

pub use biosim_domain::linspace;
pub use capability::SimulatorCapabilities;
pub use catalog::{load_test_case, load_test_cases};
pub use config::ValidatorConfig;
pub use engine::{DockerConfig, DockerEngine, ExecutionEngine};
pub use error::{CaseError, CatalogError, EngineError};
pub use example::{gen_example_simulation, ExampleSimulationConfig, EXAMPLE_SIMULATION};
pub use output::{assert_archive_output_valid, check_archive_output, TIME_TOLERANCE};
pub use report::{write_summary_json, FailedCaseSummary, ValidationSummary};
pub use telemetry::init_tracing;
pub use test_case::{TestCase, TestCaseException, TestCaseType};
pub use validator::{SimulatorValidator, ValidationReport};

/// biosim-validator version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

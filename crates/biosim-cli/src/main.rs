//! biosim-validate - BioSimulators simulator conformance testing
//!
//! ## Commands
//!
//! - `run`: execute a simulator image on every test case it supports
//! - `list`: print the test-case catalog

use anyhow::{bail, Context, Result};
use biosim_domain::Simulator;
use biosim_validator::{
    write_summary_json, DockerConfig, DockerEngine, SimulatorValidator, ValidatorConfig,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "biosim-validate")]
#[command(author = "Center for Reproducible Biomedical Modeling")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate BioSimulators simulator images against the conformance test suite", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the test suite against a simulator image
    Run {
        /// Simulator properties (JSON) declaring its algorithms and formats
        #[arg(short, long)]
        simulator: PathBuf,

        /// Docker image to validate (default: the simulator's dockerHubImageId)
        #[arg(short, long)]
        image: Option<String>,

        /// Directory of test-case descriptors
        #[arg(long, env = "BIOSIM_TEST_SUITE_DIR", default_value = "test-cases")]
        test_cases: PathBuf,

        /// Only run these test cases (repeatable)
        #[arg(long = "case")]
        cases: Vec<String>,

        /// Write a JSON run summary to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Parent directory for scratch files
        #[arg(long)]
        temp_root: Option<PathBuf>,

        /// Container CLI used to run the image
        #[arg(long, env = "BIOSIM_DOCKER_BIN", default_value = "docker")]
        docker_bin: String,

        /// Seconds before a simulator run is killed (0 = no limit)
        #[arg(long, env = "BIOSIM_EXEC_TIMEOUT_SECS", default_value_t = 0)]
        timeout_secs: u64,
    },

    /// List the test cases of the suite
    List {
        /// Directory of test-case descriptors
        #[arg(long, env = "BIOSIM_TEST_SUITE_DIR", default_value = "test-cases")]
        test_cases: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    biosim_validator::init_tracing(cli.json, level);

    match cli.command {
        Commands::Run {
            simulator,
            image,
            test_cases,
            cases,
            report,
            temp_root,
            docker_bin,
            timeout_secs,
        } => {
            let docker = DockerConfig::default()
                .with_docker_bin(&docker_bin)
                .with_timeout_secs(timeout_secs);
            let failed = cmd_run(
                &simulator,
                image.as_deref(),
                &test_cases,
                &cases,
                report.as_deref(),
                temp_root,
                docker,
            )
            .await?;
            if failed > 0 {
                bail!("{failed} test case(s) failed");
            }
            Ok(())
        }
        Commands::List { test_cases } => cmd_list(&test_cases),
    }
}

/// Image to run: the explicit one, else the simulator's declared image.
fn resolve_image(explicit: Option<&str>, simulator: &Simulator) -> Result<String> {
    explicit
        .map(str::to_string)
        .or_else(|| simulator.docker_hub_image_id.clone())
        .context("no --image given and the simulator declares no dockerHubImageId")
}

/// Returns the number of failed test cases.
async fn cmd_run(
    simulator_path: &Path,
    image: Option<&str>,
    test_cases: &Path,
    cases: &[String],
    report_path: Option<&Path>,
    temp_root: Option<PathBuf>,
    docker: DockerConfig,
) -> Result<usize> {
    let simulator = Simulator::from_path(simulator_path)
        .with_context(|| format!("Failed to read simulator properties {:?}", simulator_path))?;
    let image = resolve_image(image, &simulator)?;

    let mut config = ValidatorConfig::new(test_cases);
    if let Some(root) = temp_root {
        config = config.with_temp_root(root);
    }
    let validator = SimulatorValidator::new(config).context("Failed to load test cases")?;
    let engine = DockerEngine::new(docker);

    info!(image = %image, cases = validator.test_cases().len(), "Validating simulator");
    let selected = (!cases.is_empty()).then_some(cases);
    let report = validator.run(&engine, &image, &simulator, selected).await;

    for exception in &report.failed {
        println!("FAILED  {}: {}", exception.test_case.id, exception.exception);
    }
    println!(
        "{} passed, {} failed, {} skipped",
        report.valid.len(),
        report.failed.len(),
        report.skipped.len()
    );

    if let Some(path) = report_path {
        write_summary_json(path, &report.summary(&image))?;
        info!(path = %path.display(), "Wrote validation summary");
    }
    Ok(report.failed.len())
}

fn cmd_list(test_cases: &Path) -> Result<()> {
    let validator = SimulatorValidator::new(ValidatorConfig::new(test_cases))
        .context("Failed to load test cases")?;

    for case in validator.test_cases() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            case.id,
            case.case_type,
            case.modeling_framework,
            case.model_format,
            case.filename.display()
        );
    }
    Ok(())
}

//! Checking the reports a simulator produced for an archive.
//!
//! For every SED-ML file of the archive, the simulator must write
//! `<out_dir>/<sed-ml path without extension>/<simulation id>.csv`, whose
//! `time` column follows the simulation's output grid and whose columns are
//! exactly `time` plus the ids of the simulation's model variables.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use biosim_combine::{read_archive, read_simulations};
use biosim_domain::TimecourseSimulation;
use tracing::debug;

use crate::error::{CaseError, Result};
use crate::test_case::TestCase;

/// Largest absolute difference allowed between reported and expected times.
pub const TIME_TOLERANCE: f64 = 1.5e-6;

/// Name of the time column of every report.
pub const TIME_COLUMN: &str = "time";

/// Check the reports in `out_dir` against the simulations of `archive_path`.
pub fn assert_archive_output_valid(case: &TestCase, archive_path: &Path, out_dir: &Path) -> Result<()> {
    let unpack_dir = tempfile::tempdir()?;
    check_archive_output(case, archive_path, out_dir, unpack_dir.path())
}

/// As [`assert_archive_output_valid`], unpacking the archive into `unpack_dir`.
pub fn check_archive_output(
    case: &TestCase,
    archive_path: &Path,
    out_dir: &Path,
    unpack_dir: &Path,
) -> Result<()> {
    let archive = read_archive(archive_path, unpack_dir)?;
    let spec_url = case.simulation_format.spec_url();

    for file in archive.files_with_spec_url(spec_url) {
        let simulations = read_simulations(&unpack_dir.join(&file.filename))?;
        let sim_out_dir = out_dir.join(Path::new(&file.filename).with_extension(""));

        for simulation in &simulations {
            if !sim_out_dir.is_dir() {
                return Err(CaseError::MissingOutputDir(sim_out_dir));
            }
            let report = sim_out_dir.join(format!("{}.csv", simulation.id));
            if !report.is_file() {
                return Err(CaseError::MissingReport(report));
            }
            check_report(simulation, &report)?;
            debug!(report = %report.display(), simulation = %simulation.id, "Report is valid");
        }
    }
    Ok(())
}

/// A report's header and its `time` column, if any.
#[derive(Debug, Clone, PartialEq)]
struct Report {
    columns: Vec<String>,
    times: Option<Vec<String>>,
}

fn read_report(path: &Path) -> Result<Report> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let time_index = columns.iter().position(|c| c == TIME_COLUMN);

    let times = match time_index {
        Some(index) => {
            let mut times = Vec::new();
            for record in reader.records() {
                let record = record?;
                times.push(record.get(index).unwrap_or_default().to_string());
            }
            Some(times)
        }
        None => None,
    };
    Ok(Report { columns, times })
}

fn check_report(simulation: &TimecourseSimulation, path: &Path) -> Result<()> {
    let report = read_report(path)?;
    check_time_grid(simulation, path, report.times.as_deref())?;
    check_columns(simulation, path, &report.columns)
}

fn check_time_grid(simulation: &TimecourseSimulation, path: &Path, times: Option<&[String]>) -> Result<()> {
    let mismatch = |reason: String| CaseError::TimeGridMismatch {
        report: path.to_path_buf(),
        reason,
    };

    let times = times.ok_or_else(|| mismatch("no time column".to_string()))?;
    let samples = simulation.num_output_samples().ok_or_else(|| {
        mismatch(format!(
            "number of time points {} is out of range",
            simulation.num_time_points
        ))
    })?;
    if times.len() != samples {
        return Err(mismatch(format!(
            "expected {} time points, found {}",
            samples,
            times.len()
        )));
    }

    // lengths agree, so the grid is no larger than the report
    let expected = simulation.output_times();
    for (row, (raw, want)) in times.iter().zip(&expected).enumerate() {
        let got: f64 = raw
            .parse()
            .map_err(|_| mismatch(format!("row {row}: time {raw:?} is not a number")))?;
        if !((got - want).abs() < TIME_TOLERANCE) {
            return Err(mismatch(format!("row {row}: expected time {want}, found {got}")));
        }
    }
    Ok(())
}

fn check_columns(simulation: &TimecourseSimulation, path: &Path, columns: &[String]) -> Result<()> {
    let expected: BTreeSet<&str> = std::iter::once(TIME_COLUMN)
        .chain(simulation.model.variable_ids())
        .collect();
    let actual: BTreeSet<&str> = columns.iter().map(String::as_str).collect();
    if expected == actual {
        return Ok(());
    }

    Err(CaseError::ColumnMismatch {
        report: PathBuf::from(path),
        missing: expected.difference(&actual).map(|c| c.to_string()).collect(),
        extra: actual.difference(&expected).map(|c| c.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_case::TestCaseType;
    use biosim_combine::{write_archive, ArchiveFile, CombineArchive};
    use biosim_domain::{
        linspace, ArchiveFormat, Biomodel, BiomodelVariable, ModelFormat, ModelingFramework,
        SimulationFormat,
    };

    fn simulation(variables: &[&str]) -> TimecourseSimulation {
        TimecourseSimulation {
            id: "sim".to_string(),
            name: None,
            model: Biomodel {
                variables: variables
                    .iter()
                    .map(|id| BiomodelVariable {
                        id: Some(id.to_string()),
                        ..BiomodelVariable::default()
                    })
                    .collect(),
                ..Biomodel::default()
            },
            model_parameter_changes: vec![],
            start_time: 0.0,
            output_start_time: 0.0,
            end_time: 1.0,
            num_time_points: 4,
            algorithm: None,
            algorithm_parameter_changes: vec![],
            format: None,
            created: None,
            updated: None,
        }
    }

    fn write_report(dir: &Path, header: &[&str], times: &[f64]) -> PathBuf {
        let path = dir.join("sim.csv");
        let mut writer = csv::Writer::from_path(&path).expect("writer");
        writer.write_record(header).expect("header");
        for t in times {
            let row: Vec<String> = header
                .iter()
                .map(|c| if *c == "time" { t.to_string() } else { "1.0".to_string() })
                .collect();
            writer.write_record(&row).expect("row");
        }
        writer.flush().expect("flush");
        path
    }

    #[test]
    fn test_matching_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = write_report(dir.path(), &["time", "A", "B"], &linspace(0.0, 1.0, 5));
        check_report(&simulation(&["A", "B"]), &report).expect("valid");
    }

    #[test]
    fn test_time_within_tolerance() {
        let dir = tempfile::tempdir().expect("tempdir");
        let times: Vec<f64> = linspace(0.0, 1.0, 5).iter().map(|t| t + 1e-6).collect();
        let report = write_report(dir.path(), &["time", "A"], &times);
        check_report(&simulation(&["A"]), &report).expect("valid");
    }

    #[test]
    fn test_time_outside_tolerance() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut times = linspace(0.0, 1.0, 5);
        times[2] += 2e-6;
        let report = write_report(dir.path(), &["time", "A"], &times);
        let err = check_report(&simulation(&["A"]), &report).unwrap_err();
        assert!(matches!(err, CaseError::TimeGridMismatch { ref reason, .. } if reason.starts_with("row 2")));
    }

    #[test]
    fn test_wrong_number_of_points() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = write_report(dir.path(), &["time", "A"], &linspace(0.0, 1.0, 4));
        let err = check_report(&simulation(&["A"]), &report).unwrap_err();
        assert!(err.to_string().contains("expected 5 time points, found 4"));
    }

    #[test]
    fn test_missing_time_column() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = write_report(dir.path(), &["A", "B"], &linspace(0.0, 1.0, 5));
        let err = check_report(&simulation(&["A", "B"]), &report).unwrap_err();
        assert!(matches!(err, CaseError::TimeGridMismatch { ref reason, .. } if reason == "no time column"));
    }

    #[test]
    fn test_column_sets_must_be_equal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = write_report(dir.path(), &["time", "A", "B"], &linspace(0.0, 1.0, 5));
        let err = check_report(&simulation(&["A", "B", "C"]), &report).unwrap_err();
        match err {
            CaseError::ColumnMismatch { missing, extra, .. } => {
                assert_eq!(missing, vec!["C"]);
                assert!(extra.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extra_columns_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = write_report(dir.path(), &["time", "A", "B", "D"], &linspace(0.0, 1.0, 5));
        let err = check_report(&simulation(&["A", "B"]), &report).unwrap_err();
        match err {
            CaseError::ColumnMismatch { missing, extra, .. } => {
                assert!(missing.is_empty());
                assert_eq!(extra, vec!["D"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_point_count_out_of_range() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = write_report(dir.path(), &["time", "A"], &linspace(0.0, 1.0, 5));

        let mut sim = simulation(&["A"]);
        sim.num_time_points = usize::MAX;
        let err = check_report(&sim, &report).unwrap_err();
        assert!(matches!(err, CaseError::TimeGridMismatch { ref reason, .. } if reason.contains("out of range")));

        sim.num_time_points = 4_000_000_000_000;
        let err = check_report(&sim, &report).unwrap_err();
        assert!(err.to_string().contains("expected 4000000000001 time points, found 5"));
    }

    fn case() -> TestCase {
        TestCase {
            id: "case".to_string(),
            filename: PathBuf::from("case.omex"),
            case_type: TestCaseType::Archive,
            modeling_framework: ModelingFramework::NonSpatialContinuous,
            model_format: ModelFormat::Sbml,
            simulation_format: SimulationFormat::Sedml,
            archive_format: ArchiveFormat::Combine,
        }
    }

    /// Archive holding `sim.sedml` with the given `<listOfSimulations>` body.
    fn archive(dir: &Path, simulations: &str) -> PathBuf {
        let staging = dir.join("staging");
        std::fs::create_dir_all(&staging).expect("staging");
        let sedml = format!(
            r#"<sedML xmlns="http://sed-ml.org/sed-ml/level1/version3" level="1" version="3">
              <listOfSimulations>{simulations}</listOfSimulations>
            </sedML>"#
        );
        std::fs::write(staging.join("sim.sedml"), sedml).expect("sedml");

        let manifest = CombineArchive {
            files: vec![ArchiveFile::new("sim.sedml", SimulationFormat::Sedml.spec_url()).as_master()],
        };
        let path = dir.join("case.omex");
        write_archive(&manifest, &staging, &path).expect("archive");
        path
    }

    #[test]
    fn test_sedml_without_simulations_needs_no_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive_path = archive(dir.path(), "");
        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&out_dir).expect("out");

        assert_archive_output_valid(&case(), &archive_path, &out_dir).expect("valid");
    }

    #[test]
    fn test_missing_output_dir_for_simulation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive_path = archive(
            dir.path(),
            r#"<uniformTimeCourse id="s1" initialTime="0" outputStartTime="0" outputEndTime="1" numberOfPoints="4"/>"#,
        );
        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&out_dir).expect("out");

        let err = assert_archive_output_valid(&case(), &archive_path, &out_dir).unwrap_err();
        assert!(matches!(err, CaseError::MissingOutputDir(ref path) if path.ends_with("sim")));

        std::fs::create_dir_all(out_dir.join("sim")).expect("sim dir");
        write_report(&out_dir.join("sim"), &["time"], &linspace(0.0, 1.0, 5));
        std::fs::rename(out_dir.join("sim/sim.csv"), out_dir.join("sim/s1.csv")).expect("rename");
        assert_archive_output_valid(&case(), &archive_path, &out_dir).expect("valid");
    }

    #[test]
    fn test_column_order_is_irrelevant() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = write_report(dir.path(), &["B", "time", "A"], &linspace(0.0, 1.0, 5));
        check_report(&simulation(&["A", "B"]), &report).expect("valid");
    }
}

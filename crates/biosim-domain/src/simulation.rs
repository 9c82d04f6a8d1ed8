//! Simulation experiments, algorithms and parameter changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::biomodel::{Biomodel, BiomodelVariable};
use crate::ontology::{Format, OntologyTerm};

/// A change to a model attribute or algorithm parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParameterChange {
    /// Model address (XPath) or algorithm parameter KiSAO id.
    pub target: String,

    pub value: f64,
}

impl ParameterChange {
    pub fn new(target: impl Into<String>, value: f64) -> Self {
        Self {
            target: target.into(),
            value,
        }
    }
}

/// A parameter of a simulation algorithm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmParameter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kisao_term: Option<OntologyTerm>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_range: Option<Vec<f64>>,
}

/// A simulation algorithm and, when declared by a simulator, the frameworks
/// and formats it supports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Algorithm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kisao_term: Option<OntologyTerm>,

    #[serde(default)]
    pub ontology_terms: Vec<OntologyTerm>,

    #[serde(default)]
    pub modeling_frameworks: Vec<OntologyTerm>,

    #[serde(default)]
    pub model_formats: Vec<Format>,

    #[serde(default)]
    pub simulation_formats: Vec<Format>,

    #[serde(default)]
    pub archive_formats: Vec<Format>,

    #[serde(default)]
    pub parameters: Vec<AlgorithmParameter>,
}

/// A uniform timecourse simulation of a model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimecourseSimulation {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub model: Biomodel,

    #[serde(default)]
    pub model_parameter_changes: Vec<ParameterChange>,

    pub start_time: f64,

    pub output_start_time: f64,

    pub end_time: f64,

    /// Number of intervals; the simulation records `num_time_points + 1` samples.
    pub num_time_points: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<Algorithm>,

    #[serde(default)]
    pub algorithm_parameter_changes: Vec<ParameterChange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl TimecourseSimulation {
    /// Number of recorded samples, `num_time_points + 1`; `None` on overflow.
    pub fn num_output_samples(&self) -> Option<usize> {
        self.num_time_points.checked_add(1)
    }

    /// Expected output time grid: `num_time_points + 1` evenly spaced samples
    /// from `output_start_time` to `end_time`, inclusive.
    ///
    /// Allocates the whole grid; check [`Self::num_output_samples`] first when
    /// `num_time_points` comes from untrusted input.
    pub fn output_times(&self) -> Vec<f64> {
        linspace(
            self.output_start_time,
            self.end_time,
            self.num_time_points.saturating_add(1),
        )
    }
}

/// One variable of one simulation's output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation: Option<TimecourseSimulation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<BiomodelVariable>,
}

impl SimulationResult {
    /// `(simulation id, variable id)`
    pub fn sort_key(&self) -> (Option<String>, Option<String>) {
        (
            self.simulation.as_ref().map(|s| s.id.clone()),
            self.variable.as_ref().and_then(|v| v.id.clone()),
        )
    }
}

/// `num` evenly spaced samples over `[start, stop]`, end point included.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = num - 1;
            let step = (stop - start) / last as f64;
            (0..num)
                .map(|i| if i == last { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

//! Matching test cases against a simulator's declared capabilities.

use std::collections::HashSet;

use biosim_domain::Simulator;

use crate::test_case::TestCase;

/// Everything any of a simulator's algorithms declares support for.
///
/// Frameworks are keyed by `(ontology, id)`, formats by `id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulatorCapabilities {
    pub modeling_frameworks: HashSet<(String, String)>,
    pub model_formats: HashSet<String>,
    pub simulation_formats: HashSet<String>,
    pub archive_formats: HashSet<String>,
}

impl SimulatorCapabilities {
    pub fn from_simulator(simulator: &Simulator) -> Self {
        let mut caps = Self::default();
        for algorithm in &simulator.algorithms {
            caps.modeling_frameworks.extend(
                algorithm
                    .modeling_frameworks
                    .iter()
                    .map(|term| (term.ontology.clone(), term.id.clone())),
            );
            caps.model_formats
                .extend(algorithm.model_formats.iter().filter_map(|f| f.id.clone()));
            caps.simulation_formats
                .extend(algorithm.simulation_formats.iter().filter_map(|f| f.id.clone()));
            caps.archive_formats
                .extend(algorithm.archive_formats.iter().filter_map(|f| f.id.clone()));
        }
        caps
    }

    /// Whether all four of the case's requirements are declared.
    pub fn supports(&self, case: &TestCase) -> bool {
        self.unmet_requirements(case).is_empty()
    }

    /// Names of the requirement categories the case needs but the simulator
    /// does not declare.
    pub fn unmet_requirements(&self, case: &TestCase) -> Vec<&'static str> {
        let framework = case.modeling_framework.term();
        let mut unmet = Vec::new();
        if !self
            .modeling_frameworks
            .contains(&(framework.ontology, framework.id))
        {
            unmet.push("modeling framework");
        }
        if !self.model_formats.contains(case.model_format.id()) {
            unmet.push("model format");
        }
        if !self.simulation_formats.contains(case.simulation_format.id()) {
            unmet.push("simulation format");
        }
        if !self.archive_formats.contains(case.archive_format.id()) {
            unmet.push("archive format");
        }
        unmet
    }
}

//! Example simulations synthesized for `biomodel` test cases.

use biosim_domain::{
    Algorithm, Biomodel, OntologyTerm, ParameterChange, SimulationFormat, TimecourseSimulation,
};

/// Settings of the timecourse simulated for every bare model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExampleSimulationConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub start_time: f64,
    pub output_start_time: f64,
    pub end_time: f64,
    pub num_time_points: usize,
    /// KiSAO id of the algorithm and its name.
    pub algorithm: (&'static str, &'static str),
    /// KiSAO id and value of each algorithm parameter.
    pub algorithm_parameters: &'static [(&'static str, f64)],
    pub sedml_version: &'static str,
}

pub const EXAMPLE_SIMULATION: ExampleSimulationConfig = ExampleSimulationConfig {
    id: "simulation_1",
    name: "simulation 1",
    start_time: 0.0,
    output_start_time: 0.0,
    end_time: 10.0,
    num_time_points: 100,
    algorithm: ("0000019", "CVODE"),
    algorithm_parameters: &[
        // relative tolerance
        ("KISAO:0000209", 1e-5),
        // absolute tolerance
        ("KISAO:0000211", 1e-11),
    ],
    sedml_version: "L1V3",
};

impl ExampleSimulationConfig {
    /// A simulation of `model` with these settings. Every initial species
    /// amount or concentration of the model is set to zero.
    pub fn simulation(&self, model: Biomodel) -> TimecourseSimulation {
        let model_parameter_changes = model
            .initial_condition_parameters()
            .filter_map(|p| p.target.as_deref())
            .map(|target| ParameterChange::new(target, 0.0))
            .collect();

        let (kisao_id, algorithm_name) = self.algorithm;
        let kisao_term = OntologyTerm::new("KISAO", kisao_id).with_name(algorithm_name);

        TimecourseSimulation {
            id: self.id.to_string(),
            name: Some(self.name.to_string()),
            model,
            model_parameter_changes,
            start_time: self.start_time,
            output_start_time: self.output_start_time,
            end_time: self.end_time,
            num_time_points: self.num_time_points,
            algorithm: Some(Algorithm {
                id: Some(algorithm_name.to_string()),
                name: Some(algorithm_name.to_string()),
                kisao_term: Some(kisao_term),
                ..Algorithm::default()
            }),
            algorithm_parameter_changes: self
                .algorithm_parameters
                .iter()
                .map(|(target, value)| ParameterChange::new(*target, *value))
                .collect(),
            format: Some(SimulationFormat::Sedml.format().with_version(self.sedml_version)),
            created: None,
            updated: None,
        }
    }
}

/// [`EXAMPLE_SIMULATION`] around `model`.
pub fn gen_example_simulation(model: Biomodel) -> TimecourseSimulation {
    EXAMPLE_SIMULATION.simulation(model)
}

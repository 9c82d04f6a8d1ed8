//! BioSimulations data model
//!
//! Typed records for the BioSimulations/BioSimulators ecosystem:
//! - Ontology terms and file formats
//! - Modeling frameworks and model/simulation/archive format catalogs
//! - Biomodels with their parameters and variables
//! - Timecourse simulations, algorithms and parameter changes
//! - Simulators and their declared algorithm capabilities
//! - Visualizations of simulation results
//!
//! All records serialize to the camelCase JSON used by the BioSimulations API.

pub mod biomodel;
pub mod error;
pub mod formats;
pub mod ontology;
pub mod simulation;
pub mod simulator;
pub mod visualization;

pub use biomodel::{
    Biomodel, BiomodelParameter, BiomodelVariable, Taxon, INITIAL_SPECIES_GROUP,
    OTHER_PARAMETERS_GROUP, SPECIES_VARIABLES_GROUP,
};
pub use error::{DomainError, Result};
pub use formats::{ArchiveFormat, ModelFormat, ModelingFramework, SimulationFormat};
pub use ontology::{Format, OntologyTerm};
pub use simulation::{
    linspace, Algorithm, AlgorithmParameter, ParameterChange, SimulationResult,
    TimecourseSimulation,
};
pub use simulator::Simulator;
pub use visualization::{
    Chart, ChartDataField, Visualization, VisualizationDataField, VisualizationLayoutElement,
};

/// biosim-domain version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! SED-ML reading and writing (Level 1 Version 3, uniform timecourses).

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use biosim_domain::{
    Algorithm, Biomodel, BiomodelVariable, ModelFormat, OntologyTerm, ParameterChange,
    SimulationFormat, TimecourseSimulation,
};
use tracing::debug;

use crate::error::{CombineError, Result};
use crate::sbml::{sbml_namespace, species_target};
use crate::xml::{self, escape, version_label, Element};

const DOCUMENT: &str = "SED-ML";

/// Level and version written by [`write_simulation`].
pub const SEDML_LEVEL: u32 = 1;
pub const SEDML_VERSION: u32 = 3;

const SEDML_NAMESPACE: &str = "http://sed-ml.org/sed-ml/level1/version3";
const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";
const TIME_SYMBOL: &str = "urn:sedml:symbol:time";
const MODEL_ID: &str = "model";

/// Largest `numberOfPoints` accepted by [`read_simulations`].
pub const MAX_NUMBER_OF_POINTS: usize = 10_000_000;

/// Encode `simulation` as a SED-ML document at `path`.
///
/// `model_source` is the model's location relative to the SED-ML file. The
/// document contains one report, named after the simulation, with a `time`
/// data set followed by one data set per model variable.
pub fn write_simulation(simulation: &TimecourseSimulation, model_source: &str, path: &Path) -> Result<()> {
    check_simulation_format(simulation)?;
    let language = model_language(&simulation.model)?;
    let task_id = format!("task_{}", simulation.id);
    let sbml_ns = sbml_namespace(
        simulation
            .model
            .format
            .as_ref()
            .and_then(|f| f.version.as_deref()),
    );

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<sedML xmlns=\"{SEDML_NAMESPACE}\" xmlns:sbml=\"{sbml_ns}\" level=\"{SEDML_LEVEL}\" version=\"{SEDML_VERSION}\">\n"
    ));

    out.push_str("  <listOfModels>\n");
    out.push_str(&format!(
        "    <model id=\"{MODEL_ID}\" language=\"{}\" source=\"{}\"",
        escape(language),
        escape(model_source)
    ));
    if simulation.model_parameter_changes.is_empty() {
        out.push_str("/>\n");
    } else {
        out.push_str(">\n      <listOfChanges>\n");
        for change in &simulation.model_parameter_changes {
            out.push_str(&format!(
                "        <changeAttribute target=\"{}\" newValue=\"{}\"/>\n",
                escape(&change.target),
                change.value
            ));
        }
        out.push_str("      </listOfChanges>\n    </model>\n");
    }
    out.push_str("  </listOfModels>\n");

    out.push_str("  <listOfSimulations>\n");
    out.push_str(&format!(
        "    <uniformTimeCourse id=\"{}\"{} initialTime=\"{}\" outputStartTime=\"{}\" outputEndTime=\"{}\" numberOfPoints=\"{}\">\n",
        escape(&simulation.id),
        simulation
            .name
            .as_deref()
            .map(|name| format!(" name=\"{}\"", escape(name)))
            .unwrap_or_default(),
        simulation.start_time,
        simulation.output_start_time,
        simulation.end_time,
        simulation.num_time_points
    ));
    let kisao_id = simulation
        .algorithm
        .as_ref()
        .and_then(|a| a.kisao_term.as_ref())
        .map(OntologyTerm::curie)
        .ok_or_else(|| CombineError::invalid(DOCUMENT, "simulation has no KiSAO algorithm"))?;
    out.push_str(&format!("      <algorithm kisaoID=\"{}\"", escape(&kisao_id)));
    if simulation.algorithm_parameter_changes.is_empty() {
        out.push_str("/>\n");
    } else {
        out.push_str(">\n        <listOfAlgorithmParameters>\n");
        for change in &simulation.algorithm_parameter_changes {
            out.push_str(&format!(
                "          <algorithmParameter kisaoID=\"{}\" value=\"{}\"/>\n",
                escape(&change.target),
                change.value
            ));
        }
        out.push_str("        </listOfAlgorithmParameters>\n      </algorithm>\n");
    }
    out.push_str("    </uniformTimeCourse>\n  </listOfSimulations>\n");

    out.push_str("  <listOfTasks>\n");
    out.push_str(&format!(
        "    <task id=\"{}\" modelReference=\"{MODEL_ID}\" simulationReference=\"{}\"/>\n",
        escape(&task_id),
        escape(&simulation.id)
    ));
    out.push_str("  </listOfTasks>\n");

    let variables = simulation
        .model
        .variables
        .iter()
        .filter_map(|v| v.id.as_deref().map(|id| (id, v.target.clone().unwrap_or_else(|| species_target(id)))))
        .collect::<Vec<_>>();

    out.push_str("  <listOfDataGenerators>\n");
    out.push_str(&data_generator("time", "time", &format!("symbol=\"{TIME_SYMBOL}\""), &task_id));
    for (id, target) in &variables {
        out.push_str(&data_generator(
            id,
            id,
            &format!("target=\"{}\"", escape(target)),
            &task_id,
        ));
    }
    out.push_str("  </listOfDataGenerators>\n");

    out.push_str("  <listOfOutputs>\n");
    out.push_str(&format!("    <report id=\"{}\">\n      <listOfDataSets>\n", escape(&simulation.id)));
    for label in std::iter::once("time").chain(variables.iter().map(|(id, _)| *id)) {
        out.push_str(&format!(
            "        <dataSet id=\"data_set_{0}\" label=\"{0}\" dataReference=\"data_generator_{0}\"/>\n",
            escape(label)
        ));
    }
    out.push_str("      </listOfDataSets>\n    </report>\n  </listOfOutputs>\n");
    out.push_str("</sedML>\n");

    std::fs::write(path, out)?;
    debug!(path = %path.display(), simulation = %simulation.id, "Wrote SED-ML");
    Ok(())
}

fn data_generator(id: &str, name: &str, address: &str, task_id: &str) -> String {
    let id = escape(id);
    format!(
        "    <dataGenerator id=\"data_generator_{id}\" name=\"{}\">\n      <listOfVariables>\n        <variable id=\"{id}\" {address} taskReference=\"{}\"/>\n      </listOfVariables>\n      <math xmlns=\"{MATHML_NAMESPACE}\">\n        <ci>{id}</ci>\n      </math>\n    </dataGenerator>\n",
        escape(name),
        escape(task_id)
    )
}

fn check_simulation_format(simulation: &TimecourseSimulation) -> Result<()> {
    let Some(format) = &simulation.format else {
        return Ok(());
    };
    if let Some(id) = format.id.as_deref() {
        if id != SimulationFormat::Sedml.id() {
            return Err(CombineError::Unsupported(format!("simulation format {id}")));
        }
    }
    if let Some(version) = format.version.as_deref() {
        if version != version_label(SEDML_LEVEL, SEDML_VERSION) {
            return Err(CombineError::Unsupported(format!("SED-ML version {version}")));
        }
    }
    Ok(())
}

fn model_language(model: &Biomodel) -> Result<&str> {
    match &model.format {
        None => Ok(ModelFormat::Sbml.sed_urn().unwrap_or_default()),
        Some(format) => format.sed_urn.as_deref().ok_or_else(|| {
            CombineError::Unsupported(format!(
                "encoding models in format {} in SED-ML",
                format.id.as_deref().unwrap_or("<unknown>")
            ))
        }),
    }
}

/// Read every uniform timecourse simulation from a SED-ML file.
///
/// Each simulation's model carries the target-addressed variables recorded
/// by data generators of the tasks that run it.
pub fn read_simulations(path: &Path) -> Result<Vec<TimecourseSimulation>> {
    let text = std::fs::read_to_string(path)?;
    let simulations = parse_sedml(&text)?;
    debug!(path = %path.display(), simulations = simulations.len(), "Read SED-ML");
    Ok(simulations)
}

struct Task<'a> {
    id: &'a str,
    model: &'a str,
    simulation: &'a str,
}

fn parse_sedml(text: &str) -> Result<Vec<TimecourseSimulation>> {
    let root = xml::parse(text, DOCUMENT)?;
    if root.name != "sedML" {
        return Err(CombineError::invalid(
            DOCUMENT,
            format!("unexpected root element <{}>", root.name),
        ));
    }
    let format = match root.version_label() {
        Some(label) => SimulationFormat::Sedml.format().with_version(label),
        None => SimulationFormat::Sedml.format(),
    };

    let models: BTreeMap<&str, &Element> = root
        .list("listOfModels", "model")
        .map(|m| Ok((m.required_attr("id", DOCUMENT)?, m)))
        .collect::<Result<_>>()?;

    let tasks = root
        .list("listOfTasks", "task")
        .map(|t| {
            Ok(Task {
                id: t.required_attr("id", DOCUMENT)?,
                model: t.required_attr("modelReference", DOCUMENT)?,
                simulation: t.required_attr("simulationReference", DOCUMENT)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // (task id, variable) for every target-addressed data generator variable
    let recorded: Vec<(&str, &Element)> = root
        .list("listOfDataGenerators", "dataGenerator")
        .flat_map(|g| g.list("listOfVariables", "variable"))
        .filter(|v| v.attr("target").is_some())
        .filter_map(|v| v.attr("taskReference").map(|task| (task, v)))
        .collect();

    let mut simulations = Vec::new();
    let Some(list) = root.child("listOfSimulations") else {
        return Ok(simulations);
    };

    for element in &list.children {
        if element.name != "uniformTimeCourse" {
            return Err(CombineError::Unsupported(format!(
                "simulation type <{}>",
                element.name
            )));
        }
        let id = element.required_attr("id", DOCUMENT)?;
        let sim_tasks: Vec<&Task> = tasks.iter().filter(|t| t.simulation == id).collect();

        let mut model = match sim_tasks.first() {
            Some(task) => {
                let model = models.get(task.model).ok_or_else(|| {
                    CombineError::invalid(DOCUMENT, format!("task {} references unknown model {}", task.id, task.model))
                })?;
                model_record(model)?
            }
            None => Biomodel::default(),
        };

        let mut seen = HashSet::new();
        for (_, variable) in recorded
            .iter()
            .filter(|(task, _)| sim_tasks.iter().any(|t| t.id == *task))
        {
            let var_id = variable.required_attr("id", DOCUMENT)?;
            if seen.insert(var_id) {
                model.variables.push(BiomodelVariable {
                    id: Some(var_id.to_string()),
                    target: variable.attr("target").map(str::to_string),
                    name: variable.attr("name").map(str::to_string),
                    ..BiomodelVariable::default()
                });
            }
        }

        let model_parameter_changes = sim_tasks
            .first()
            .and_then(|task| models.get(task.model))
            .map(|m| changes(m))
            .transpose()?
            .unwrap_or_default();

        let (algorithm, algorithm_parameter_changes) = match element.child("algorithm") {
            Some(algorithm) => {
                let (algorithm, changes) = algorithm_record(algorithm)?;
                (Some(algorithm), changes)
            }
            None => (None, Vec::new()),
        };

        simulations.push(TimecourseSimulation {
            id: id.to_string(),
            name: element.attr("name").map(str::to_string),
            model,
            model_parameter_changes,
            start_time: number(element, "initialTime")?,
            output_start_time: number(element, "outputStartTime")?,
            end_time: number(element, "outputEndTime")?,
            num_time_points: number_of_points(element, id)?,
            algorithm,
            algorithm_parameter_changes,
            format: Some(format.clone()),
            created: None,
            updated: None,
        });
    }

    Ok(simulations)
}

fn model_record(model: &Element) -> Result<Biomodel> {
    let language = model.attr("language");
    Ok(Biomodel {
        id: Some(model.required_attr("id", DOCUMENT)?.to_string()),
        file: model.attr("source").map(str::to_string),
        format: language.and_then(ModelFormat::from_sed_urn).map(|f| f.format()),
        ..Biomodel::default()
    })
}

fn changes(model: &Element) -> Result<Vec<ParameterChange>> {
    model
        .list("listOfChanges", "changeAttribute")
        .map(|change| {
            Ok(ParameterChange::new(
                change.required_attr("target", DOCUMENT)?,
                number(change, "newValue")?,
            ))
        })
        .collect()
}

fn algorithm_record(algorithm: &Element) -> Result<(Algorithm, Vec<ParameterChange>)> {
    let kisao_id = algorithm.required_attr("kisaoID", DOCUMENT)?;
    let changes = algorithm
        .list("listOfAlgorithmParameters", "algorithmParameter")
        .map(|p| {
            Ok(ParameterChange::new(
                p.required_attr("kisaoID", DOCUMENT)?,
                number(p, "value")?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((
        Algorithm {
            id: Some(kisao_id.to_string()),
            kisao_term: OntologyTerm::from_curie(kisao_id),
            ..Algorithm::default()
        },
        changes,
    ))
}

fn number_of_points(element: &Element, id: &str) -> Result<usize> {
    let raw = element.required_attr("numberOfPoints", DOCUMENT)?;
    let points: usize = raw
        .trim()
        .parse()
        .map_err(|_| CombineError::invalid(DOCUMENT, format!("{id}: numberOfPoints is not a count")))?;
    if points > MAX_NUMBER_OF_POINTS {
        return Err(CombineError::invalid(
            DOCUMENT,
            format!("{id}: numberOfPoints {points} exceeds {MAX_NUMBER_OF_POINTS}"),
        ));
    }
    Ok(points)
}

fn number(element: &Element, key: &str) -> Result<f64> {
    let raw = element.required_attr(key, DOCUMENT)?;
    raw.trim().parse().map_err(|_| {
        CombineError::invalid(DOCUMENT, format!("<{}> {key} is not a number: {raw}", element.name))
    })
}

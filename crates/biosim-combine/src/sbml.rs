//! SBML model reader.
//!
//! Extracts what the validator needs from an SBML document: species as
//! variables, their initial amounts/concentrations and the global parameters
//! as parameters, each addressed by an XPath target.

use std::path::Path;

use biosim_domain::{
    Biomodel, BiomodelParameter, BiomodelVariable, ModelFormat, ModelingFramework,
    INITIAL_SPECIES_GROUP, OTHER_PARAMETERS_GROUP, SPECIES_VARIABLES_GROUP,
};
use tracing::debug;

use crate::error::{CombineError, Result};
use crate::xml::{self, parse_version_label, Element};

const DOCUMENT: &str = "SBML";

/// Namespace bound to the `sbml` prefix of model XPaths for an SBML version
/// label (`L<level>V<version>`). Unknown or missing labels map to L3V2.
pub fn sbml_namespace(version_label: Option<&str>) -> String {
    match version_label.and_then(parse_version_label) {
        Some((1, _)) => "http://www.sbml.org/sbml/level1".to_string(),
        Some((2, 1)) => "http://www.sbml.org/sbml/level2".to_string(),
        Some((2, version)) => format!("http://www.sbml.org/sbml/level2/version{version}"),
        Some((3, version)) => format!("http://www.sbml.org/sbml/level3/version{version}/core"),
        _ => "http://www.sbml.org/sbml/level3/version2/core".to_string(),
    }
}

/// XPath of a species element.
pub fn species_target(id: &str) -> String {
    format!("/sbml:sbml/sbml:model/sbml:listOfSpecies/sbml:species[@id='{id}']")
}

/// XPath of a global parameter's value.
pub fn parameter_target(id: &str) -> String {
    format!("/sbml:sbml/sbml:model/sbml:listOfParameters/sbml:parameter[@id='{id}']/@value")
}

/// Read a model file of the given format.
///
/// Only SBML is readable; other formats fail with [`CombineError::Unsupported`].
pub fn read_biomodel(path: &Path, format: ModelFormat) -> Result<Biomodel> {
    if format != ModelFormat::Sbml {
        return Err(CombineError::Unsupported(format!(
            "reading models in format {}",
            format.id()
        )));
    }

    let text = std::fs::read_to_string(path)?;
    let mut model = parse_sbml(&text)?;
    model.file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    debug!(
        model = %path.display(),
        parameters = model.parameters.len(),
        variables = model.variables.len(),
        "Read SBML model"
    );
    Ok(model)
}

fn parse_sbml(text: &str) -> Result<Biomodel> {
    let root = xml::parse(text, DOCUMENT)?;
    if root.name != "sbml" {
        return Err(CombineError::invalid(
            DOCUMENT,
            format!("unexpected root element <{}>", root.name),
        ));
    }
    let model = root
        .child("model")
        .ok_or_else(|| CombineError::invalid(DOCUMENT, "missing <model>"))?;

    let mut format = ModelFormat::Sbml.format();
    if let Some(label) = root.version_label() {
        format = format.with_version(label);
    }

    let mut parameters = Vec::new();
    let mut variables = Vec::new();

    for species in model.list("listOfSpecies", "species") {
        let id = species.required_attr("id", DOCUMENT)?;
        let label = species.attr("name").unwrap_or(id);
        variables.push(BiomodelVariable {
            target: Some(species_target(id)),
            group: Some(SPECIES_VARIABLES_GROUP.to_string()),
            id: Some(id.to_string()),
            name: Some(label.to_string()),
            units: species.attr("substanceUnits").map(str::to_string),
        });
        if let Some(parameter) = initial_condition(species, id, label)? {
            parameters.push(parameter);
        }
    }

    for parameter in model.list("listOfParameters", "parameter") {
        let id = parameter.required_attr("id", DOCUMENT)?;
        parameters.push(BiomodelParameter {
            target: Some(parameter_target(id)),
            group: Some(OTHER_PARAMETERS_GROUP.to_string()),
            id: Some(id.to_string()),
            name: Some(parameter.attr("name").unwrap_or(id).to_string()),
            value: parse_number(parameter.attr("value"))?,
            units: parameter.attr("units").map(str::to_string),
        });
    }

    Ok(Biomodel {
        id: model.attr("id").map(str::to_string),
        file: None,
        format: Some(format),
        framework: Some(ModelingFramework::NonSpatialContinuous.term()),
        taxon: None,
        parameters,
        variables,
    })
}

fn initial_condition(species: &Element, id: &str, label: &str) -> Result<Option<BiomodelParameter>> {
    let (attribute, kind) = if species.attr("initialConcentration").is_some() {
        ("initialConcentration", "concentration")
    } else if species.attr("initialAmount").is_some() {
        ("initialAmount", "amount")
    } else {
        return Ok(None);
    };

    Ok(Some(BiomodelParameter {
        target: Some(format!("{}/@{attribute}", species_target(id))),
        group: Some(INITIAL_SPECIES_GROUP.to_string()),
        id: Some(format!("init_{id}")),
        name: Some(format!("Initial {kind} of {label}")),
        value: parse_number(species.attr(attribute))?,
        units: species.attr("substanceUnits").map(str::to_string),
    }))
}

fn parse_number(raw: Option<&str>) -> Result<Option<f64>> {
    raw.map(|value| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| CombineError::invalid(DOCUMENT, format!("not a number: {value}")))
    })
    .transpose()
}

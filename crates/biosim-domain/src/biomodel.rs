//! Biomodels and their parameters and variables.

use serde::{Deserialize, Serialize};

use crate::ontology::{Format, OntologyTerm};

/// Parameter group for initial species amounts and concentrations.
pub const INITIAL_SPECIES_GROUP: &str = "Initial species amounts/concentrations";

/// Parameter group for global model parameters.
pub const OTHER_PARAMETERS_GROUP: &str = "Other global parameters";

/// Variable group for species amounts and concentrations.
pub const SPECIES_VARIABLES_GROUP: &str = "Species amounts/concentrations";

/// An NCBI taxonomy entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Taxon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Taxon {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
        }
    }
}

/// A computational model of a biological system.
///
/// Equality ignores the order of parameters and variables.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Biomodel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Name of the model file (e.g. the `source` of a SED-ML model).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<OntologyTerm>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxon: Option<Taxon>,

    /// Inputs such as initial conditions and rate constants.
    #[serde(default)]
    pub parameters: Vec<BiomodelParameter>,

    /// Observables such as species amounts.
    #[serde(default)]
    pub variables: Vec<BiomodelVariable>,
}

impl Biomodel {
    /// Parameters that set initial species amounts or concentrations.
    pub fn initial_condition_parameters(&self) -> impl Iterator<Item = &BiomodelParameter> {
        self.parameters
            .iter()
            .filter(|p| p.group.as_deref() == Some(INITIAL_SPECIES_GROUP))
    }

    /// Ids of the model's variables, in declaration order.
    pub fn variable_ids(&self) -> Vec<&str> {
        self.variables
            .iter()
            .filter_map(|v| v.id.as_deref())
            .collect()
    }
}

impl PartialEq for Biomodel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.file == other.file
            && self.format == other.format
            && self.framework == other.framework
            && self.taxon == other.taxon
            && eq_ignoring_order(&self.parameters, &other.parameters, |p| p.id.clone())
            && eq_ignoring_order(&self.variables, &other.variables, |v| v.id.clone())
    }
}

/// Compare two lists as multisets: both are stably sorted by `key`, then
/// compared item by item.
pub(crate) fn eq_ignoring_order<T, K, F>(a: &[T], b: &[T], key: F) -> bool
where
    T: PartialEq,
    K: Ord,
    F: Fn(&T) -> K,
{
    if a.len() != b.len() {
        return false;
    }
    sorted_by_key(a, &key)
        .into_iter()
        .zip(sorted_by_key(b, &key))
        .all(|((_, x), (_, y))| x == y)
}

fn sorted_by_key<'a, T, K: Ord>(items: &'a [T], key: &impl Fn(&T) -> K) -> Vec<(K, &'a T)> {
    let mut keyed: Vec<(K, &T)> = items.iter().map(|item| (key(item), item)).collect();
    keyed.sort_by(|x, y| x.0.cmp(&y.0));
    keyed
}

/// A parameter of a model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BiomodelParameter {
    /// Address within the model (XPath for XML-encoded models).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Display group (e.g. [`INITIAL_SPECIES_GROUP`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

/// A variable (prediction) of a model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BiomodelVariable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameter(id: &str, group: &str) -> BiomodelParameter {
        BiomodelParameter {
            id: Some(id.to_string()),
            group: Some(group.to_string()),
            ..BiomodelParameter::default()
        }
    }

    #[test]
    fn test_initial_condition_parameters() {
        let model = Biomodel {
            parameters: vec![
                parameter("init_A", INITIAL_SPECIES_GROUP),
                parameter("k1", OTHER_PARAMETERS_GROUP),
                parameter("init_B", INITIAL_SPECIES_GROUP),
            ],
            ..Biomodel::default()
        };

        let ids: Vec<_> = model
            .initial_condition_parameters()
            .filter_map(|p| p.id.as_deref())
            .collect();
        assert_eq!(ids, vec!["init_A", "init_B"]);
    }

    #[test]
    fn test_equality_ignores_list_order() {
        let a = Biomodel {
            id: Some("m".to_string()),
            taxon: Some(Taxon::new(9606, "Homo sapiens")),
            parameters: vec![
                parameter("init_A", INITIAL_SPECIES_GROUP),
                parameter("k1", OTHER_PARAMETERS_GROUP),
            ],
            ..Biomodel::default()
        };
        let mut b = a.clone();
        b.parameters.reverse();
        assert_eq!(a, b);

        b.parameters[0].group = Some(INITIAL_SPECIES_GROUP.to_string());
        assert_ne!(a, b);

        let mut c = a.clone();
        c.taxon = Some(Taxon::new(10090, "Mus musculus"));
        assert_ne!(a, c);

        let mut d = a.clone();
        d.parameters.pop();
        assert_ne!(a, d);
    }

    #[test]
    fn test_taxon_json() {
        let model = Biomodel {
            taxon: Some(Taxon::new(9606, "Homo sapiens")),
            ..Biomodel::default()
        };
        let value = serde_json::to_value(&model).expect("serialize");
        assert_eq!(
            value["taxon"],
            serde_json::json!({ "id": 9606, "name": "Homo sapiens" })
        );
        let back: Biomodel = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, model);
    }

    #[test]
    fn test_from_api_json() {
        let model: Biomodel = serde_json::from_value(serde_json::json!({
            "id": "BIOMD0000000297",
            "parameters": [
                { "target": "/sbml:sbml/sbml:model", "group": INITIAL_SPECIES_GROUP, "value": 1.5 }
            ],
            "variables": [ { "id": "A" }, { "id": "B" } ]
        }))
        .expect("deserialize");

        assert_eq!(model.id.as_deref(), Some("BIOMD0000000297"));
        assert_eq!(model.parameters[0].value, Some(1.5));
        assert_eq!(model.variable_ids(), vec!["A", "B"]);
        assert!(model.format.is_none());
    }
}

//! Visualizations of simulation results.
//!
//! A visualization is a grid of charts. Each cell binds the data fields of a
//! chart type to simulation results. Equality ignores the order of cells,
//! data fields and results.

use serde::{Deserialize, Serialize};

use crate::biomodel::eq_ignoring_order;
use crate::ontology::Format;
use crate::simulation::SimulationResult;

/// A chart type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A data field of a chart type (e.g. the x or y values of a line chart).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A grid of charts over the results of one or more simulations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Visualization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,

    /// Width of the grid, in cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,

    #[serde(default)]
    pub layout: Vec<VisualizationLayoutElement>,
}

impl PartialEq for Visualization {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.format == other.format
            && self.columns == other.columns
            && eq_ignoring_order(&self.layout, &other.layout, VisualizationLayoutElement::sort_key)
    }
}

/// A cell of a visualization's grid.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationLayoutElement {
    #[serde(rename = "chartType", default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<Chart>,

    #[serde(default)]
    pub data: Vec<VisualizationDataField>,
}

/// Sort key of a [`VisualizationDataField`].
pub type DataFieldKey = (Option<String>, Vec<(Option<String>, Option<String>)>);

impl VisualizationLayoutElement {
    /// Chart id, then the sorted keys of its data fields.
    pub fn sort_key(&self) -> (Option<String>, Vec<DataFieldKey>) {
        let mut data: Vec<DataFieldKey> =
            self.data.iter().map(VisualizationDataField::sort_key).collect();
        data.sort();
        (self.chart.as_ref().and_then(|c| c.id.clone()), data)
    }
}

impl PartialEq for VisualizationLayoutElement {
    fn eq(&self, other: &Self) -> bool {
        self.chart == other.chart
            && eq_ignoring_order(&self.data, &other.data, VisualizationDataField::sort_key)
    }
}

/// Simulation results painted into one data field of a chart.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationDataField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_field: Option<ChartDataField>,

    #[serde(default)]
    pub simulation_results: Vec<SimulationResult>,
}

impl VisualizationDataField {
    pub fn sort_key(&self) -> DataFieldKey {
        let mut results: Vec<_> = self
            .simulation_results
            .iter()
            .map(SimulationResult::sort_key)
            .collect();
        results.sort();
        (self.data_field.as_ref().and_then(|f| f.id.clone()), results)
    }
}

impl PartialEq for VisualizationDataField {
    fn eq(&self, other: &Self) -> bool {
        self.data_field == other.data_field
            && eq_ignoring_order(
                &self.simulation_results,
                &other.simulation_results,
                SimulationResult::sort_key,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomodel::BiomodelVariable;
    use serde_json::json;

    fn field(id: &str, variables: &[&str]) -> VisualizationDataField {
        VisualizationDataField {
            data_field: Some(ChartDataField {
                id: Some(id.to_string()),
                name: None,
            }),
            simulation_results: variables
                .iter()
                .map(|v| SimulationResult {
                    simulation: None,
                    variable: Some(BiomodelVariable {
                        id: Some(v.to_string()),
                        ..BiomodelVariable::default()
                    }),
                })
                .collect(),
        }
    }

    fn cell(chart: &str, data: Vec<VisualizationDataField>) -> VisualizationLayoutElement {
        VisualizationLayoutElement {
            chart: Some(Chart {
                id: Some(chart.to_string()),
                name: None,
            }),
            data,
        }
    }

    fn visualization() -> Visualization {
        Visualization {
            id: Some("viz".to_string()),
            format: None,
            columns: Some(2),
            layout: vec![
                cell("line", vec![field("x", &["time"]), field("y", &["A", "B"])]),
                cell("bar", vec![field("y", &["C"])]),
            ],
        }
    }

    #[test]
    fn test_json_keys() {
        let value = serde_json::to_value(visualization()).expect("serialize");
        assert_eq!(value["columns"], 2);
        assert_eq!(value["layout"][0]["chartType"], json!({ "id": "line" }));
        assert_eq!(value["layout"][0]["data"][1]["dataField"], json!({ "id": "y" }));
        assert_eq!(
            value["layout"][0]["data"][1]["simulationResults"][0]["variable"],
            json!({ "id": "A" })
        );
    }

    #[test]
    fn test_json_round_trip() {
        let viz = visualization();
        let json = serde_json::to_string(&viz).expect("serialize");
        let back: Visualization = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, viz);
    }

    #[test]
    fn test_equality_ignores_order() {
        let mut shuffled = visualization();
        shuffled.layout.reverse();
        shuffled.layout[1].data.reverse();
        shuffled.layout[1].data[0].simulation_results.reverse();
        assert_eq!(shuffled, visualization());

        let mut changed = visualization();
        changed.layout[0].data[1] = field("y", &["A", "D"]);
        assert_ne!(changed, visualization());

        let mut fewer = visualization();
        fewer.layout.pop();
        assert_ne!(fewer, visualization());
    }

    #[test]
    fn test_sort_keys() {
        let viz = visualization();
        assert_eq!(
            viz.layout[0].data[1].sort_key(),
            (
                Some("y".to_string()),
                vec![(None, Some("A".to_string())), (None, Some("B".to_string()))]
            )
        );
        assert_eq!(viz.layout[1].sort_key().0.as_deref(), Some("bar"));
    }
}

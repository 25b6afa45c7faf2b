//! Input output module.
//!
//! Contains the records exchanged with the grid-data provider and the documents
//! (grids, scenario sets) read from disk.
use crate::cascade::ScenarioParameters;
use crate::config::EngineConfig;
use crate::graph::NodeType;

use serde::{Deserialize, Deserializer, Serialize};

pub mod fs;

#[cfg(test)]
mod tests;

/// A node record as delivered by the grid-data provider.
///
/// Centrality fields are computed upstream and may be absent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub node_id: String,
    #[serde(default)]
    pub node_name: Option<String>,
    pub node_type: NodeType,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub capacity_kw: Option<f64>,
    #[serde(default)]
    pub voltage_kv: Option<f64>,
    #[serde(default)]
    pub criticality_score: Option<f64>,
    #[serde(default, deserialize_with = "count_from_number")]
    pub downstream_transformers: Option<u32>,
    #[serde(default)]
    pub downstream_capacity_kva: Option<f64>,
    #[serde(default)]
    pub betweenness_centrality: Option<f64>,
    #[serde(default)]
    pub pagerank: Option<f64>,
    #[serde(default)]
    pub cascade_risk_score: Option<f64>,
}

/// An edge record as delivered by the grid-data provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub from_node_id: String,
    pub to_node_id: String,
    /// Missing or null lengths are read as 0 when the topology is built.
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub edge_type: Option<String>,
}

/// Reads a count that may arrive as a float (`12.0`) from a NUMERIC column.
///
/// Negative, fractional and out of range values are rejected.
fn count_from_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<f64>::deserialize(deserializer)? {
        Some(value) => value,
        None => return Ok(None),
    };
    if value.fract() == 0.0 && value >= 0.0 && value <= u32::MAX as f64 {
        Ok(Some(value as u32))
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a non-negative whole count, found {value}"
        )))
    }
}

/// JSON representation of a distribution grid: every node and edge record of one export.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct GridDocument {
    #[serde(default)]
    pub name: Option<String>,
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// A set of what-if scenarios to run against a single grid.
///
/// `grid` and `config` may be given inline or as a path relative to the scenario file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScenarioSet {
    #[serde(default)]
    pub name: Option<String>,
    pub grid: GridDocument,
    #[serde(default)]
    pub config: EngineConfig,
    pub scenarios: Vec<ScenarioParameters>,
}

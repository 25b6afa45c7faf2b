use crate::io::{GridDocument, NodeRecord};
use crate::types::*;
use crate::CascadeError;

use serde::{Deserialize, Serialize};

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

/// Kind of a grid component.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    #[serde(alias = "substation")]
    Substation,
    #[serde(alias = "transformer")]
    Transformer,
    #[serde(alias = "pole")]
    Pole,
    #[serde(alias = "meter")]
    Meter,
}

/// Attributes of a single grid component, immutable once loaded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GridNode {
    pub node_id: String,
    pub name: String,
    pub node_type: NodeType,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub capacity_kw: f64,
    pub voltage_kv: f64,
    pub criticality_score: f64,
    pub downstream_transformers: u32,
    pub downstream_capacity_kva: f64,
    pub betweenness: f64,
    pub pagerank: f64,
    pub cascade_risk_score: f64,
}

impl From<NodeRecord> for GridNode {
    fn from(record: NodeRecord) -> Self {
        let criticality_score = record.criticality_score.unwrap_or(0.0);
        GridNode {
            name: record.node_name.unwrap_or_else(|| record.node_id.clone()),
            node_id: record.node_id,
            node_type: record.node_type,
            lat: record.lat,
            lon: record.lon,
            capacity_kw: record.capacity_kw.unwrap_or(0.0),
            voltage_kv: record.voltage_kv.unwrap_or(0.0),
            criticality_score,
            downstream_transformers: record.downstream_transformers.unwrap_or(0),
            downstream_capacity_kva: record.downstream_capacity_kva.unwrap_or(0.0),
            betweenness: record.betweenness_centrality.unwrap_or(0.0),
            pagerank: record.pagerank.unwrap_or(0.0),
            cascade_risk_score: record.cascade_risk_score.unwrap_or(criticality_score),
        }
    }
}

/// A loaded snapshot of the distribution grid.
///
/// Nodes live in an arena addressed by dense [`NodeIndex`] values. Adjacency lists keep
/// edge insertion order, which decides the discovery order of siblings during a cascade.
#[derive(Clone, Debug)]
pub struct Topology {
    /// Node attributes in load order.
    nodes: Vec<GridNode>,
    /// Maps each node id to its arena index.
    index: HashMap<String, NodeIndex>,
    /// Adjacency list for branch connections with their lengths.
    branches: Vec<Vec<(NodeIndex, Kilometers)>>,
    /// Load epoch this snapshot belongs to.
    epoch: Epoch,
}

impl Topology {
    /// Build a snapshot from provider records.
    ///
    /// Duplicate node ids keep the first record. Edges referencing an unknown endpoint are
    /// dropped. Fails if the document holds no nodes.
    pub fn from_document(document: GridDocument, epoch: Epoch) -> Result<Topology, CascadeError> {
        let GridDocument {
            name,
            nodes: records,
            edges,
        } = document;

        if records.is_empty() {
            return Err(CascadeError::DataUnavailable(format!(
                "Grid {} contains no nodes",
                name.as_deref().unwrap_or("-")
            )));
        }

        let mut nodes: Vec<GridNode> = Vec::with_capacity(records.len());
        let mut index: HashMap<String, NodeIndex> = HashMap::with_capacity(records.len());
        for record in records {
            if index.contains_key(&record.node_id) {
                log::warn!("Skipping duplicate node record {}", record.node_id);
                continue;
            }
            index.insert(record.node_id.clone(), nodes.len());
            nodes.push(GridNode::from(record));
        }

        let mut branches = vec![Vec::new(); nodes.len()];
        let mut dropped: usize = 0;
        for edge in edges.iter() {
            let (a, b) = match (index.get(&edge.from_node_id), index.get(&edge.to_node_id)) {
                (Some(&a), Some(&b)) => (a, b),
                _ => {
                    log::debug!(
                        "Dropping edge {} -> {}: unknown endpoint",
                        edge.from_node_id,
                        edge.to_node_id
                    );
                    dropped += 1;
                    continue;
                }
            };
            let distance_km = edge.distance_km.unwrap_or(0.0);
            branches[a].push((b, distance_km));
            branches[b].push((a, distance_km));
        }
        if dropped > 0 {
            log::warn!("Dropped {dropped} edges referencing unknown nodes");
        }

        Ok(Topology {
            nodes,
            index,
            branches,
            epoch,
        })
    }

    /// Number of nodes in the snapshot.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of adjacency entries; each undirected edge is counted twice.
    pub fn adjacency_count(&self) -> usize {
        self.branches.iter().map(Vec::len).sum()
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Find the arena index of a node id.
    pub fn index_of(&self, node_id: &str) -> Option<NodeIndex> {
        self.index.get(node_id).copied()
    }

    pub fn node(&self, index: NodeIndex) -> &GridNode {
        &self.nodes[index]
    }

    pub fn get(&self, node_id: &str) -> Option<&GridNode> {
        self.index_of(node_id).map(|i| &self.nodes[i])
    }

    /// Neighbors of a node with branch lengths, in edge insertion order.
    pub fn neighbors(&self, index: NodeIndex) -> &[(NodeIndex, Kilometers)] {
        &self.branches[index]
    }

    /// All nodes in load order.
    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }
}

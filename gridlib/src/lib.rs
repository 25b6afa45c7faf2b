//! # Grid Cascade Library
//!
//! Cascading failure simulation for electrical distribution grids.
//! Common functionality for the command line interface and any embedding service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod cascade;
pub mod config;
mod graph;
pub mod io;
pub mod probability;
pub mod sink;
pub mod store;
pub mod types;

pub use cascade::{
    CascadeEngine, CascadeNode, CascadeResult, PropagationEdge, ScenarioParameters, WaveBreakdown,
};
pub use config::EngineConfig;
pub use graph::{GridNode, NodeType, Topology};
pub use probability::{FailureProbabilityModel, ModelConstants};
pub use sink::{JsonDirSink, MemorySink, ResultSink, ScenarioRecord};
pub use store::{GridSource, JsonFileSource, TopologyStore};

/// Represents the reasons why a simulation or one of its surrounding steps might fail.
///
/// Truncation of a cascade is not a failure, see [`CascadeResult::truncated`].
#[derive(Error, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "content")]
pub enum CascadeError {
    /// The requested patient zero does not exist in the loaded topology.
    #[error("Unknown node: {0}")]
    UnknownNode(String),
    /// A scenario parameter is outside of its allowed range.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
    /// The topology source is unreachable, malformed or empty.
    #[error("Grid data unavailable: {0}")]
    DataUnavailable(String),
    /// The result sink failed to persist a result.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl CascadeError {
    /// True for failures caused by the caller's input rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CascadeError::UnknownNode(_) | CascadeError::InvalidParameter { .. }
        )
    }

    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        CascadeError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

//! Engine configuration.
use crate::io::fs::read_document;
use crate::probability::ModelConstants;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Customers assumed behind each downstream transformer.
pub const DEFAULT_CUSTOMERS_PER_TRANSFORMER: u32 = 50;

/// Configuration of a [`crate::CascadeEngine`], readable from JSON or YAML.
///
/// Every field is optional in documents, missing ones take their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Constants of the failure probability model.
    pub model: ModelConstants,
    /// Customer estimate per downstream transformer, used for impact figures.
    pub customers_per_transformer: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: ModelConstants::default(),
            customers_per_transformer: DEFAULT_CUSTOMERS_PER_TRANSFORMER,
        }
    }
}

impl EngineConfig {
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> std::io::Result<EngineConfig> {
        let value = read_document(&path)?;
        let config: EngineConfig = serde_json::from_value(value)?;
        Ok(config)
    }
}

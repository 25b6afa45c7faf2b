//! Persistence of finished simulations.
//!
//! A [`ResultSink`] receives an already computed [`CascadeResult`]. Storage failures are
//! reported as [`CascadeError::Storage`] and leave the result usable, so callers may retry.
use crate::cascade::{CascadeNode, CascadeResult, PropagationEdge, ScenarioParameters, WaveBreakdown};
use crate::types::Wave;
use crate::CascadeError;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

/// Destination for completed cascade results.
pub trait ResultSink {
    /// Persist a single result and return the id it was stored under.
    fn store_result(&self, result: &CascadeResult) -> Result<String, CascadeError>;
}

/// Lowercase alphanumeric words of `name` joined with underscores.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .join("_")
}

/// Id of a stored scenario: the slug of its name followed by a Unix timestamp.
pub fn scenario_id(scenario_name: &str, unix_timestamp: i64) -> String {
    let slug = slugify(scenario_name);
    if slug.is_empty() {
        format!("scenario_{unix_timestamp}")
    } else {
        format!("{slug}_{unix_timestamp}")
    }
}

/// Layout of a persisted scenario.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioRecord {
    pub scenario_id: String,
    pub scenario_name: String,
    pub patient_zero_id: String,
    pub patient_zero_name: String,
    pub simulation_params: ScenarioParameters,
    pub cascade_order: Vec<CascadeNode>,
    pub wave_breakdown: Vec<WaveBreakdown>,
    pub propagation_paths: Vec<PropagationEdge>,
    pub total_affected_nodes: usize,
    pub affected_capacity_mw: f64,
    pub estimated_customers_affected: u64,
    pub max_cascade_depth: Wave,
    pub simulation_timestamp: DateTime<Utc>,
}

impl ScenarioRecord {
    pub fn from_result(result: &CascadeResult, scenario_id: String) -> Self {
        ScenarioRecord {
            scenario_id,
            scenario_name: result.scenario_name.clone(),
            patient_zero_id: result.patient_zero.clone(),
            patient_zero_name: result.patient_zero_name().to_string(),
            simulation_params: result.parameters.clone(),
            cascade_order: result.cascade_order.clone(),
            wave_breakdown: result.wave_breakdown.clone(),
            propagation_paths: result.propagation_paths.clone(),
            total_affected_nodes: result.total_affected_nodes,
            affected_capacity_mw: result.affected_capacity_mw,
            estimated_customers_affected: result.estimated_customers_affected,
            max_cascade_depth: result.max_cascade_depth,
            simulation_timestamp: result.simulation_timestamp,
        }
    }
}

/// Stores every result as a pretty JSON file named after its scenario id.
///
/// Existing files are never overwritten. A missing directory is created on first store.
#[derive(Debug, Clone)]
pub struct JsonDirSink {
    pub dir: PathBuf,
}

impl JsonDirSink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn write_record(&self, record: &ScenarioRecord) -> std::io::Result<PathBuf> {
        let name = sanitize_filename::sanitize(format!("{}.json", record.scenario_id));
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        let content = serde_json::to_string_pretty(record)?;
        let mut file = std::fs::File::options()
            .read(false)
            .write(true)
            .create_new(true)
            .open(&path)?;
        file.write_all(content.as_bytes())?;
        Ok(path)
    }
}

impl ResultSink for JsonDirSink {
    fn store_result(&self, result: &CascadeResult) -> Result<String, CascadeError> {
        let id = scenario_id(&result.scenario_name, Utc::now().timestamp());
        let record = ScenarioRecord::from_result(result, id);
        match self.write_record(&record) {
            Ok(path) => {
                log::info!("Saved scenario: {}", path.display());
                Ok(record.scenario_id)
            }
            Err(e) => Err(CascadeError::Storage(format!(
                "Cannot save scenario {}: {e}",
                record.scenario_id
            ))),
        }
    }
}

/// Keeps stored records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<ScenarioRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of every record stored so far, in storage order.
    pub fn records(&self) -> Vec<ScenarioRecord> {
        self.records.lock().clone()
    }
}

impl ResultSink for MemorySink {
    fn store_result(&self, result: &CascadeResult) -> Result<String, CascadeError> {
        let id = scenario_id(&result.scenario_name, Utc::now().timestamp());
        self.records
            .lock()
            .push(ScenarioRecord::from_result(result, id.clone()));
        Ok(id)
    }
}

//! Topology store: loads the grid from a provider and publishes read-only snapshots.
//!
//! Loads are single-flight. Each successful load publishes a new [`Topology`] epoch;
//! simulations hold an `Arc` of the snapshot they started with, so a reload never tears
//! down a running traversal.
use crate::graph::{GridNode, Topology};
use crate::io::GridDocument;
use crate::types::Epoch;
use crate::CascadeError;

use arc_swap::ArcSwapOption;
use ordered_float::OrderedFloat;
use parking_lot::Mutex;
use std::cmp::Reverse;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Provider of node and edge records.
pub trait GridSource {
    /// Fetch a complete export of the grid.
    fn fetch(&self) -> Result<GridDocument, CascadeError>;
}

impl GridSource for GridDocument {
    fn fetch(&self) -> Result<GridDocument, CascadeError> {
        Ok(self.clone())
    }
}

/// Reads the grid from a JSON or YAML document on disk at every load.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    pub path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl GridSource for JsonFileSource {
    fn fetch(&self) -> Result<GridDocument, CascadeError> {
        GridDocument::read_from_file(&self.path).map_err(|e| {
            CascadeError::DataUnavailable(format!("Cannot read {}: {e}", self.path.display()))
        })
    }
}

/// Holds the current topology snapshot of a [`GridSource`].
pub struct TopologyStore<S> {
    source: S,
    snapshot: ArcSwapOption<Topology>,
    /// Serializes fetches; holds the epoch of the last successful load.
    load_lock: Mutex<Epoch>,
}

impl<S: GridSource> TopologyStore<S> {
    /// Create an empty store. Nothing is fetched until the first load.
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshot: ArcSwapOption::empty(),
            load_lock: Mutex::new(0),
        }
    }

    /// The current snapshot, if any load succeeded.
    pub fn snapshot(&self) -> Option<Arc<Topology>> {
        self.snapshot.load_full()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.load().is_some()
    }

    /// Load the topology unless a snapshot is already published.
    ///
    /// Concurrent callers wait for a single in-flight fetch and share its snapshot.
    pub fn ensure_loaded(&self) -> Result<Arc<Topology>, CascadeError> {
        if let Some(topology) = self.snapshot.load_full() {
            return Ok(topology);
        }
        let mut epoch = self.load_lock.lock();
        // Another caller may have finished loading while we waited.
        if let Some(topology) = self.snapshot.load_full() {
            return Ok(topology);
        }
        self.fetch_and_publish(&mut epoch)
    }

    /// Force a fetch and replace the whole snapshot, starting a new epoch.
    ///
    /// On failure the previous snapshot stays published.
    pub fn reload(&self) -> Result<Arc<Topology>, CascadeError> {
        let mut epoch = self.load_lock.lock();
        self.fetch_and_publish(&mut epoch)
    }

    fn fetch_and_publish(&self, epoch: &mut Epoch) -> Result<Arc<Topology>, CascadeError> {
        let start_time = Instant::now();
        let document = self.source.fetch()?;
        let topology = Arc::new(Topology::from_document(document, *epoch + 1)?);
        *epoch += 1;
        self.snapshot.store(Some(Arc::clone(&topology)));
        log::info!(
            "Loaded topology epoch {} with {} nodes and {} adjacency entries in {:.4} seconds",
            topology.epoch(),
            topology.node_count(),
            topology.adjacency_count(),
            start_time.elapsed().as_secs_f64(),
        );
        Ok(topology)
    }

    /// Nodes ordered by descending cascade risk score, at most `limit` of them.
    ///
    /// Ties keep load order. Meant for picking candidate patient zeros.
    pub fn get_high_risk_nodes(&self, limit: usize) -> Result<Vec<GridNode>, CascadeError> {
        let topology = self.ensure_loaded()?;
        Ok(high_risk_nodes(&topology, limit))
    }
}

/// Stable descending sort of a snapshot's nodes by cascade risk score.
///
/// NaN scores rank below every number.
pub fn high_risk_nodes(topology: &Topology, limit: usize) -> Vec<GridNode> {
    let mut nodes: Vec<&GridNode> = topology.nodes().iter().collect();
    nodes.sort_by_key(|node| {
        let score = node.cascade_risk_score;
        Reverse(OrderedFloat(if score.is_nan() { f64::NEG_INFINITY } else { score }))
    });
    nodes.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeType;
    use crate::io::{EdgeRecord, NodeRecord};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(id: &str, risk: Option<f64>, criticality: f64) -> NodeRecord {
        NodeRecord {
            node_id: id.to_string(),
            node_name: None,
            node_type: NodeType::Transformer,
            lat: None,
            lon: None,
            capacity_kw: None,
            voltage_kv: None,
            criticality_score: Some(criticality),
            downstream_transformers: None,
            downstream_capacity_kva: None,
            betweenness_centrality: None,
            pagerank: None,
            cascade_risk_score: risk,
        }
    }

    /// Counts fetches and serves a configurable document.
    struct CountingSource {
        fetches: AtomicUsize,
        document: Mutex<GridDocument>,
    }

    impl CountingSource {
        fn new(document: GridDocument) -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                document: Mutex::new(document),
            }
        }
    }

    impl GridSource for CountingSource {
        fn fetch(&self) -> Result<GridDocument, CascadeError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(5));
            Ok(self.document.lock().clone())
        }
    }

    struct Unreachable;

    impl GridSource for Unreachable {
        fn fetch(&self) -> Result<GridDocument, CascadeError> {
            Err(CascadeError::DataUnavailable("connection refused".to_string()))
        }
    }

    fn two_nodes() -> GridDocument {
        GridDocument {
            name: Some("two".to_string()),
            nodes: vec![record("A", None, 0.5), record("B", None, 0.7)],
            edges: vec![EdgeRecord {
                from_node_id: "A".to_string(),
                to_node_id: "B".to_string(),
                distance_km: Some(1.0),
                edge_type: None,
            }],
        }
    }

    #[test]
    fn high_risk_nodes_are_sorted_stably() {
        let store = TopologyStore::new(GridDocument {
            name: None,
            nodes: vec![
                record("low", Some(0.1), 0.9),
                record("tie-1", Some(0.5), 0.0),
                record("top", None, 0.8),
                record("tie-2", Some(0.5), 0.0),
                record("tie-3", Some(0.5), 0.0),
            ],
            edges: vec![],
        });
        let ids: Vec<String> = store
            .get_high_risk_nodes(10)
            .unwrap()
            .into_iter()
            .map(|n| n.node_id)
            .collect();
        assert_eq!(ids, vec!["top", "tie-1", "tie-2", "tie-3", "low"]);

        let ids: Vec<String> = store
            .get_high_risk_nodes(2)
            .unwrap()
            .into_iter()
            .map(|n| n.node_id)
            .collect();
        assert_eq!(ids, vec!["top", "tie-1"]);
    }

    #[test]
    fn nan_risk_ranks_last() {
        let store = TopologyStore::new(GridDocument {
            name: None,
            nodes: vec![
                record("broken", Some(f64::NAN), 0.0),
                record("low", Some(0.0), 0.0),
                record("high", Some(0.9), 0.0),
            ],
            edges: vec![],
        });
        let ids: Vec<String> = store
            .get_high_risk_nodes(3)
            .unwrap()
            .into_iter()
            .map(|n| n.node_id)
            .collect();
        assert_eq!(ids, vec!["high", "low", "broken"]);
    }

    #[test]
    fn concurrent_loads_fetch_once() {
        let store = TopologyStore::new(CountingSource::new(two_nodes()));
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let topology = store.ensure_loaded().unwrap();
                    assert_eq!(topology.node_count(), 2);
                });
            }
        });
        assert_eq!(store.source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(store.snapshot().unwrap().epoch(), 1);
    }

    #[test]
    fn reload_starts_new_epoch_and_keeps_old_snapshot_alive() {
        let store = TopologyStore::new(CountingSource::new(two_nodes()));
        let first = store.ensure_loaded().unwrap();
        assert_eq!(first.epoch(), 1);

        store.source.document.lock().nodes.push(record("C", None, 0.1));
        let second = store.reload().unwrap();

        assert_eq!(second.epoch(), 2);
        assert_eq!(second.node_count(), 3);
        // The earlier snapshot is untouched.
        assert_eq!(first.node_count(), 2);
        assert_eq!(store.snapshot().unwrap().epoch(), 2);
        assert_eq!(store.source.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unreachable_source() {
        let store = TopologyStore::new(Unreachable);
        assert!(matches!(
            store.ensure_loaded(),
            Err(CascadeError::DataUnavailable(_))
        ));
        assert!(!store.is_loaded());
        assert!(store.get_high_risk_nodes(5).is_err());
    }

    #[test]
    fn empty_source_is_unavailable() {
        let store = TopologyStore::new(GridDocument::default());
        assert!(matches!(
            store.ensure_loaded(),
            Err(CascadeError::DataUnavailable(_))
        ));
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let store = TopologyStore::new(CountingSource::new(two_nodes()));
        store.ensure_loaded().unwrap();
        *store.source.document.lock() = GridDocument::default();
        assert!(store.reload().is_err());
        assert_eq!(store.snapshot().unwrap().epoch(), 1);
    }

    #[test]
    fn file_source_reports_missing_file() {
        let source = JsonFileSource::new("/nonexistent/grid.json");
        assert!(matches!(
            source.fetch(),
            Err(CascadeError::DataUnavailable(_))
        ));
    }
}

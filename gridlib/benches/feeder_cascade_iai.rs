use gridlib::io::{EdgeRecord, GridDocument, NodeRecord};
use gridlib::*;
use iai_callgrind::{black_box, library_benchmark, library_benchmark_group, main};

const HARBOR_FEEDER: &str = include_str!("../../grids/feeder-demo.json");

fn record(node_id: String, node_type: NodeType, criticality: f64, betweenness: f64) -> NodeRecord {
    NodeRecord {
        node_id,
        node_name: None,
        node_type,
        lat: None,
        lon: None,
        capacity_kw: Some(100.0),
        voltage_kv: Some(11.0),
        criticality_score: Some(criticality),
        downstream_transformers: Some(1),
        downstream_capacity_kva: None,
        betweenness_centrality: Some(betweenness),
        pagerank: None,
        cascade_risk_score: None,
    }
}

fn link(a: &str, b: &str, distance_km: f64) -> EdgeRecord {
    EdgeRecord {
        from_node_id: a.to_string(),
        to_node_id: b.to_string(),
        distance_km: Some(distance_km),
        edge_type: None,
    }
}

/// A radial feeder: one substation, `transformers` transformers, each with a chain of
/// `poles` poles that serve two meters apiece.
fn synthetic_feeder(transformers: usize, poles: usize) -> GridDocument {
    let mut nodes = vec![record("SUB".to_string(), NodeType::Substation, 1.0, 0.5)];
    let mut edges = Vec::new();
    for t in 0..transformers {
        let tx = format!("TX-{t}");
        nodes.push(record(tx.clone(), NodeType::Transformer, 0.9, 0.05));
        edges.push(link("SUB", &tx, 0.5));
        let mut previous = tx;
        for p in 0..poles {
            let pole = format!("POLE-{t}-{p}");
            nodes.push(record(pole.clone(), NodeType::Pole, 0.8, 0.01));
            edges.push(link(&previous, &pole, 0.1));
            for m in 0..2 {
                let meter = format!("M-{t}-{p}-{m}");
                nodes.push(record(meter.clone(), NodeType::Meter, 0.1, 0.0));
                edges.push(link(&pole, &meter, 0.02));
            }
            previous = pole;
        }
    }
    GridDocument {
        name: Some("synthetic".to_string()),
        nodes,
        edges,
    }
}

fn setup(document: GridDocument, patient_zero: &str) -> (TopologyStore<GridDocument>, ScenarioParameters) {
    let store = TopologyStore::new(document);
    store.ensure_loaded().unwrap();
    let params = ScenarioParameters {
        failure_threshold: 0.0,
        max_waves: 1000,
        max_nodes: usize::MAX,
        ..ScenarioParameters::new(patient_zero)
    };
    (store, params)
}

fn setup_harbor() -> (TopologyStore<GridDocument>, ScenarioParameters) {
    setup(serde_json::from_str(HARBOR_FEEDER).unwrap(), "SUB-01")
}

fn setup_synthetic() -> (TopologyStore<GridDocument>, ScenarioParameters) {
    setup(synthetic_feeder(100, 20), "SUB")
}

#[library_benchmark]
#[bench::harbor(setup_harbor())]
#[bench::synthetic(setup_synthetic())]
fn full_cascade(input: (TopologyStore<GridDocument>, ScenarioParameters)) {
    let (store, params) = input;
    let engine = CascadeEngine::new(&store, &EngineConfig::default());
    let result = engine.simulate(&params).unwrap();
    black_box(result);
}

library_benchmark_group!(
    name = cascade_group;
    benchmarks = full_cascade
);

main!(library_benchmark_groups = cascade_group);

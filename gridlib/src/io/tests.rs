use super::*;

#[test]
fn basic() {
    let data = r#"
        {
            "name": "Feeder 12",
            "nodes": [
                {
                    "node_id": "SUB-1",
                    "node_name": "Kadikoy Substation",
                    "node_type": "SUBSTATION",
                    "lat": 40.99,
                    "lon": 29.02,
                    "capacity_kw": 25000,
                    "voltage_kv": 34.5,
                    "criticality_score": 0.9,
                    "downstream_transformers": 12,
                    "betweenness_centrality": 0.2,
                    "pagerank": 0.05,
                    "cascade_risk_score": 0.7
                },
                {
                    "node_id": "TX-1",
                    "node_type": "TRANSFORMER"
                },
                {
                    "node_id": "M-1",
                    "node_type": "meter",
                    "downstream_capacity_kva": 15.0
                }
            ],
            "edges": [
                { "from_node_id": "SUB-1", "to_node_id": "TX-1", "distance_km": 1.5, "edge_type": "FEEDS" },
                { "from_node_id": "TX-1", "to_node_id": "M-1", "distance_km": 0.2 }
            ]
        }"#;

    let v: GridDocument = serde_json::from_str(data).unwrap();
    assert_eq!(v.name.as_deref(), Some("Feeder 12"));

    assert_eq!(v.nodes.len(), 3);
    assert_eq!(v.nodes[0].node_type, NodeType::Substation);
    assert_eq!(v.nodes[0].capacity_kw, Some(25000.0));
    assert_eq!(v.nodes[0].downstream_transformers, Some(12));
    assert_eq!(v.nodes[0].betweenness_centrality, Some(0.2));

    assert_eq!(v.nodes[1].node_type, NodeType::Transformer);
    assert_eq!(v.nodes[1].node_name, None);
    assert_eq!(v.nodes[1].betweenness_centrality, None);
    assert_eq!(v.nodes[1].cascade_risk_score, None);

    assert_eq!(v.nodes[2].node_type, NodeType::Meter);

    assert_eq!(v.edges.len(), 2);
    assert_eq!(v.edges[0].from_node_id, "SUB-1");
    assert_eq!(v.edges[0].to_node_id, "TX-1");
    assert_eq!(v.edges[0].edge_type.as_deref(), Some("FEEDS"));
    assert_eq!(v.edges[1].distance_km, Some(0.2));
    assert_eq!(v.edges[1].edge_type, None);
}

#[test]
fn unknown_node_type_is_rejected() {
    let data = r#"{ "nodes": [ { "node_id": "X", "node_type": "GENERATOR" } ] }"#;
    assert!(serde_json::from_str::<GridDocument>(data).is_err());
}

#[test]
fn null_distance_is_accepted() {
    let data = r#"
        {
            "nodes": [
                { "node_id": "A", "node_type": "POLE" },
                { "node_id": "B", "node_type": "POLE" },
                { "node_id": "C", "node_type": "POLE" }
            ],
            "edges": [
                { "from_node_id": "A", "to_node_id": "B", "distance_km": null },
                { "from_node_id": "B", "to_node_id": "C" }
            ]
        }"#;
    let v: GridDocument = serde_json::from_str(data).unwrap();
    assert_eq!(v.edges[0].distance_km, None);
    assert_eq!(v.edges[1].distance_km, None);
}

#[test]
fn downstream_transformers_from_numeric_column() {
    let parse = |value: &str| {
        let data = format!(
            r#"{{ "nodes": [ {{ "node_id": "S", "node_type": "SUBSTATION", "downstream_transformers": {value} }} ] }}"#
        );
        serde_json::from_str::<GridDocument>(&data).map(|doc| doc.nodes[0].downstream_transformers)
    };

    assert_eq!(parse("12.0").unwrap(), Some(12));
    assert_eq!(parse("12").unwrap(), Some(12));
    assert_eq!(parse("null").unwrap(), None);
    assert!(parse("12.5").is_err());
    assert!(parse("-3").is_err());
    assert!(parse("1e12").is_err());
}

#[test]
fn yaml_count_as_float() {
    let data = "nodes:\n  - node_id: S\n    node_type: SUBSTATION\n    downstream_transformers: 4.0\n";
    let v: GridDocument = serde_yaml::from_str(data).unwrap();
    assert_eq!(v.nodes[0].downstream_transformers, Some(4));
}

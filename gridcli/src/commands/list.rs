/// Printing candidate patient zeros.
use super::*;

impl HighRisk {
    pub fn run(self) {
        let HighRisk { grid, limit, json } = self;

        let store = TopologyStore::new(JsonFileSource::new(grid));
        let nodes = match store.get_high_risk_nodes(limit) {
            Ok(x) => x,
            Err(err) => fatal_error!(1, "Cannot load grid: {}", err),
        };

        if json {
            print_json(&nodes);
            return;
        }

        println!(
            "{}",
            format!(
                "{:<16}{:<28}{:<13}{:>8}{:>10}{:>10}",
                "Node", "Name", "Type", "Risk", "Critical", "Between"
            )
            .bold()
        );
        for node in nodes.iter() {
            println!(
                "{:<16}{:<28}{:<13}{:>8.3}{:>10.3}{:>10.4}",
                node.node_id,
                node.name,
                format!("{:?}", node.node_type),
                node.cascade_risk_score,
                node.criticality_score,
                node.betweenness
            );
        }
    }
}

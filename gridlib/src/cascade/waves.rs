use crate::graph::{GridNode, NodeType};
use crate::types::Wave;

use serde::{Deserialize, Serialize};

/// Impact of a single wave of the cascade.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct WaveBreakdown {
    pub wave_number: Wave,
    pub nodes_failed: usize,
    pub capacity_lost_mw: f64,
    pub customers_affected: u64,
    pub substations: usize,
    /// Every failed node that is not a substation, poles and meters included.
    pub transformers: usize,
}

/// Accumulates [`WaveBreakdown`]s while a cascade is traversed.
#[derive(Debug, Clone)]
pub struct WaveAggregator {
    waves: Vec<WaveBreakdown>,
    customers_per_transformer: u32,
}

impl WaveAggregator {
    pub fn new(customers_per_transformer: u32) -> Self {
        Self {
            waves: Vec::new(),
            customers_per_transformer,
        }
    }

    /// Customer estimate for a node with the given number of downstream transformers.
    pub fn customers_for(&self, downstream_transformers: u32) -> u64 {
        downstream_transformers as u64 * self.customers_per_transformer as u64
    }

    /// Count a failed node in the given wave.
    pub fn record(&mut self, wave: Wave, node: &GridNode) {
        while self.waves.len() <= wave {
            let wave_number = self.waves.len();
            self.waves.push(WaveBreakdown {
                wave_number,
                ..Default::default()
            });
        }
        let customers = self.customers_for(node.downstream_transformers);
        let breakdown = &mut self.waves[wave];
        breakdown.nodes_failed += 1;
        breakdown.capacity_lost_mw += node.capacity_kw / 1000.0;
        breakdown.customers_affected += customers;
        if node.node_type == NodeType::Substation {
            breakdown.substations += 1;
        } else {
            breakdown.transformers += 1;
        }
    }

    /// Breakdowns ascending by wave number.
    pub fn finish(self) -> Vec<WaveBreakdown> {
        self.waves
    }
}

//! Failure propagation probability between two adjacent grid components.
//!
//! The model multiplies independent stress factors (distance, the source's criticality, the
//! target's centrality, temperature and load) and caps the product below certainty.
use crate::graph::GridNode;
use crate::types::*;

use serde::{Deserialize, Serialize};

/// Tunable constants of the [`FailureProbabilityModel`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConstants {
    /// Characteristic length of the exponential distance decay.
    pub characteristic_length_km: f64,
    /// Multiplier applied to the target's betweenness centrality.
    pub betweenness_scale: f64,
    /// Vulnerability every target has regardless of its centrality.
    pub vulnerability_floor: f64,
    /// Lower bound of the temperature band without thermal stress.
    pub cold_threshold_c: f64,
    /// Upper bound of the temperature band without thermal stress.
    pub heat_threshold_c: f64,
    /// Degrees below the cold threshold per unit of additional stress.
    pub cold_stress_divisor: f64,
    /// Degrees above the heat threshold per unit of additional stress.
    pub heat_stress_divisor: f64,
    /// Calibrates the product of factors into a probability range.
    pub base_scale: f64,
    /// Upper bound of any propagation probability.
    pub max_probability: Probability,
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            characteristic_length_km: 5.0,
            betweenness_scale: 100.0,
            vulnerability_floor: 0.1,
            cold_threshold_c: 0.0,
            heat_threshold_c: 35.0,
            cold_stress_divisor: 20.0,
            heat_stress_divisor: 15.0,
            base_scale: 0.5,
            max_probability: 0.95,
        }
    }
}

/// Maps a (source, target, distance, environment) tuple to a propagation probability.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FailureProbabilityModel {
    pub constants: ModelConstants,
}

impl FailureProbabilityModel {
    pub fn new(constants: ModelConstants) -> Self {
        Self { constants }
    }

    pub fn distance_factor(&self, distance_km: Kilometers) -> f64 {
        (-distance_km / self.constants.characteristic_length_km).exp()
    }

    pub fn target_vulnerability(&self, target: &GridNode) -> f64 {
        target.betweenness * self.constants.betweenness_scale + self.constants.vulnerability_floor
    }

    /// Thermal stress multiplier, 1.0 inside the comfortable band.
    pub fn temperature_stress(&self, temperature_c: f64) -> f64 {
        let c = &self.constants;
        if temperature_c < c.cold_threshold_c {
            // Measured from 0 °C, not from the threshold.
            1.0 + temperature_c.abs() / c.cold_stress_divisor
        } else if temperature_c > c.heat_threshold_c {
            1.0 + (temperature_c - c.heat_threshold_c) / c.heat_stress_divisor
        } else {
            1.0
        }
    }

    /// Probability that a failure of `source` propagates to `target` over a branch of the
    /// given length.
    ///
    /// Always within `[0, max_probability]`; degenerate inputs yielding NaN map to 0.
    pub fn compute(
        &self,
        source: &GridNode,
        target: &GridNode,
        distance_km: Kilometers,
        temperature_c: f64,
        load_multiplier: f64,
    ) -> Probability {
        let p = self.distance_factor(distance_km)
            * source.criticality_score
            * self.target_vulnerability(target)
            * self.temperature_stress(temperature_c)
            * load_multiplier
            * self.constants.base_scale;
        if p.is_nan() {
            return 0.0;
        }
        p.max(0.0).min(self.constants.max_probability)
    }
}

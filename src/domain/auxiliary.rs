// Auxiliary sensor samples
use serde::Deserialize;

/// Percentages travel multiplied by this factor
pub const PERCENTAGE_SCALE: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuxSample {
    pub timestamp: String,
    pub percentage: f64,
}

impl AuxSample {
    pub fn percent(&self) -> f64 {
        self.percentage / PERCENTAGE_SCALE
    }
}

/// Chart points as (position, percent)
pub fn aux_series(samples: &[AuxSample]) -> Vec<(usize, f64)> {
    samples
        .iter()
        .enumerate()
        .map(|(i, s)| (i, s.percent()))
        .collect()
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyState {
    pub current: f64,
    pub max: f64,
    pub base_regen: f64,
}

impl EnergyState {
    pub fn full(max: f64, base_regen: f64) -> Self {
        Self {
            current: max,
            max,
            base_regen,
        }
    }
}

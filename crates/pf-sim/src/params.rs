//! Process constants for the tick.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Rates and alarm thresholds used by [`crate::Plant::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsParams {
    /// Heater rate (degrees per second)
    pub heating_rate: f64,
    /// Passive cooling rate (degrees per second), slower than heating
    pub cooling_rate: f64,
    /// Transfer rate at full pump speed (volume units per second)
    pub base_flow_rate: f64,
    /// High level alarm when fill exceeds this percentage
    pub high_level_pct: f64,
    /// Low level alarm when fill is below this percentage
    pub low_level_pct: f64,
    /// Over-temperature alarm threshold (degrees)
    pub hot_temperature: f64,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            heating_rate: 0.8,
            cooling_rate: 0.3,
            base_flow_rate: 20.0,
            high_level_pct: 80.0,
            low_level_pct: 5.0,
            hot_temperature: 80.0,
        }
    }
}

impl PhysicsParams {
    pub fn validate(&self) -> SimResult<()> {
        let all = [
            self.heating_rate,
            self.cooling_rate,
            self.base_flow_rate,
            self.high_level_pct,
            self.low_level_pct,
            self.hot_temperature,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "physics parameters must be finite",
            });
        }
        if self.cooling_rate < 0.0 || self.base_flow_rate < 0.0 {
            return Err(SimError::InvalidArg {
                what: "rates cannot be negative",
            });
        }
        if self.heating_rate <= self.cooling_rate {
            return Err(SimError::InvalidArg {
                what: "heating rate must exceed cooling rate",
            });
        }
        if !(0.0..=100.0).contains(&self.low_level_pct)
            || !(0.0..=100.0).contains(&self.high_level_pct)
            || self.low_level_pct >= self.high_level_pct
        {
            return Err(SimError::InvalidArg {
                what: "level thresholds must satisfy 0 <= low < high <= 100",
            });
        }
        Ok(())
    }
}

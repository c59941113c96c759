//! Timed linear fill/drain.

use serde::{Deserialize, Serialize};

/// Linear, one-shot transition of a value over simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampAction {
    /// Simulation time the ramp started (seconds)
    pub start_time: f64,
    /// Duration (seconds); non-positive means "jump to target"
    pub duration: f64,
    pub start_value: f64,
    pub target_value: f64,
}

impl RampAction {
    pub fn new(start_time: f64, duration: f64, start_value: f64, target_value: f64) -> Self {
        Self {
            start_time,
            duration,
            start_value,
            target_value,
        }
    }

    /// Interpolated value at `now`, held at the endpoints outside the ramp.
    pub fn value_at(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return self.target_value;
        }
        let t = (now - self.start_time) / self.duration;
        if t <= 0.0 {
            self.start_value
        } else if t >= 1.0 {
            self.target_value
        } else {
            self.start_value + (self.target_value - self.start_value) * t
        }
    }

    pub fn finished(&self, now: f64) -> bool {
        now - self.start_time >= self.duration
    }
}

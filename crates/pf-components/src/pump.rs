//! Variable-speed pump.

use crate::common::EPSILON_SPEED;
use pf_core::{LogSink, clamp_unit, notify};

/// Pump driving one pipe segment.
///
/// `speed` is a fraction of full flow in `[0, 1]`; `running` is the on/off
/// switch. The two are independent here: the segment control protocol
/// decides when stopping also zeroes the speed.
#[derive(Debug, Clone)]
pub struct Pump {
    id: String,
    speed: f64,
    running: bool,
}

impl Pump {
    /// Create a stopped pump at zero speed.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            speed: 0.0,
            running: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Speed as seen by the process: zero while stopped.
    pub fn effective_speed(&self) -> f64 {
        if self.running { self.speed } else { 0.0 }
    }

    /// Set speed (clamped to `[0, 1]`). Returns `true` if the speed changed.
    pub fn set_speed(&mut self, speed: f64, sink: &dyn LogSink) -> bool {
        let speed = clamp_unit(speed);
        if (self.speed - speed).abs() < EPSILON_SPEED {
            return false;
        }
        self.speed = speed;
        let pct = (self.speed * 100.0) as u32;
        notify(sink, &format!("Pump {} speed: {}%", self.id, pct));
        true
    }

    /// Switch the pump on or off. Returns `true` if the state changed.
    pub fn set_running(&mut self, running: bool, sink: &dyn LogSink) -> bool {
        if self.running == running {
            return false;
        }
        self.running = running;
        let state = if running { "on" } else { "off" };
        notify(sink, &format!("Pump {} {}", self.id, state));
        true
    }

    /// Switch off and zero the speed.
    pub fn stop(&mut self, sink: &dyn LogSink) {
        self.set_running(false, sink);
        self.set_speed(0.0, sink);
    }
}

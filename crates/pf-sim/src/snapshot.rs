//! Read-only view of the plant for renderers and recorders.

use crate::alarm::AlarmLatch;
use crate::layout::TankLayout;
use pf_components::{FlowDirection, Point};
use pf_core::{SegmentId, TankId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSnapshot {
    /// Simulation time (seconds)
    pub time_s: f64,
    pub tanks: Vec<TankSnapshot>,
    pub segments: Vec<SegmentSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankSnapshot {
    pub id: TankId,
    pub name: String,
    pub layout: TankLayout,
    pub capacity: f64,
    pub volume: f64,
    /// 0..1
    pub fill_ratio: f64,
    pub temperature: f64,
    pub target_temperature: f64,
    pub alarms: AlarmLatch,
    pub ramp_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveSnapshot {
    pub id: String,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSnapshot {
    pub id: SegmentId,
    pub name: String,
    pub source: TankId,
    pub dest: TankId,
    pub points: Vec<Point>,
    pub flowing: bool,
    pub direction: FlowDirection,
    pub valve_a: ValveSnapshot,
    pub valve_b: ValveSnapshot,
    pub pump_id: String,
    pub pump_running: bool,
    /// Commanded speed while running, 0 otherwise
    pub pump_speed: f64,
}

impl PlantSnapshot {
    pub fn tank(&self, name: &str) -> Option<&TankSnapshot> {
        self.tanks.iter().find(|t| t.name == name)
    }

    pub fn total_volume(&self) -> f64 {
        self.tanks.iter().map(|t| t.volume).sum()
    }
}

//! Edge-triggered tank alarms.

use crate::params::PhysicsParams;
use pf_components::Tank;
use serde::{Deserialize, Serialize};

/// Alarm conditions tracked per tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlarmKind {
    HighLevel,
    LowLevel,
    HighTemperature,
}

impl AlarmKind {
    pub const ALL: [AlarmKind; 3] = [
        AlarmKind::HighLevel,
        AlarmKind::LowLevel,
        AlarmKind::HighTemperature,
    ];

    /// Operator message for this alarm on `tank`.
    pub fn message(self, tank: &str, params: &PhysicsParams) -> String {
        match self {
            AlarmKind::HighLevel => format!("ALARM: {tank} level > {}%", params.high_level_pct),
            AlarmKind::LowLevel => format!("ALARM: {tank} level < {}%", params.low_level_pct),
            AlarmKind::HighTemperature => {
                format!("ALARM: {tank} temperature > {}C", params.hot_temperature)
            }
        }
    }
}

/// Condition values observed on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlarmLatch {
    pub high: bool,
    pub low: bool,
    pub hot: bool,
}

impl AlarmLatch {
    /// Level-triggered evaluation of the current tank state.
    pub fn observe(tank: &Tank, params: &PhysicsParams) -> Self {
        let level_pct = tank.fill_ratio() * 100.0;
        Self {
            high: level_pct > params.high_level_pct,
            low: level_pct < params.low_level_pct,
            hot: tank.temperature() > params.hot_temperature,
        }
    }

    pub fn get(&self, kind: AlarmKind) -> bool {
        match kind {
            AlarmKind::HighLevel => self.high,
            AlarmKind::LowLevel => self.low,
            AlarmKind::HighTemperature => self.hot,
        }
    }

    /// Conditions true now that were false in `previous`.
    pub fn rising_edges(&self, previous: &AlarmLatch) -> impl Iterator<Item = AlarmKind> + '_ {
        let previous = *previous;
        AlarmKind::ALL
            .into_iter()
            .filter(move |&kind| self.get(kind) && !previous.get(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observes_thresholds() {
        let params = PhysicsParams::default();
        let mut tank = Tank::new("T1", 100.0, 20.0).unwrap().with_volume(81.0);
        let latch = AlarmLatch::observe(&tank, &params);
        assert!(latch.high && !latch.low && !latch.hot);

        tank.set_volume(80.0);
        assert!(!AlarmLatch::observe(&tank, &params).high);

        tank.set_volume(4.0);
        tank.set_temperature(80.5);
        let latch = AlarmLatch::observe(&tank, &params);
        assert!(latch.low && latch.hot && !latch.high);
    }

    #[test]
    fn only_rising_edges_are_reported() {
        let before = AlarmLatch {
            high: true,
            low: false,
            hot: false,
        };
        let now = AlarmLatch {
            high: true,
            low: false,
            hot: true,
        };
        let edges: Vec<_> = now.rising_edges(&before).collect();
        assert_eq!(edges, vec![AlarmKind::HighTemperature]);

        // Falling edge reports nothing.
        let edges: Vec<_> = AlarmLatch::default().rising_edges(&now).collect();
        assert!(edges.is_empty());
    }

    #[test]
    fn messages_use_thresholds() {
        let params = PhysicsParams::default();
        assert_eq!(
            AlarmKind::HighLevel.message("T1", &params),
            "ALARM: T1 level > 80%"
        );
        assert_eq!(
            AlarmKind::LowLevel.message("T2", &params),
            "ALARM: T2 level < 5%"
        );
        assert_eq!(
            AlarmKind::HighTemperature.message("T3", &params),
            "ALARM: T3 temperature > 80C"
        );
    }
}

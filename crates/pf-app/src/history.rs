//! Bounded per-tank level and temperature history.

use pf_sim::PlantSnapshot;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct TankSeries {
    pub name: String,
    /// Percent full
    pub level_pct: VecDeque<f64>,
    pub temperature: VecDeque<f64>,
}

/// Rolling time series fed from snapshots.
///
/// Samples older than `window_s` behind the newest one are dropped, and at
/// most `max_len` samples are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    window_s: f64,
    max_len: usize,
    times: VecDeque<f64>,
    tanks: Vec<TankSeries>,
}

impl Default for History {
    /// One minute at 20 samples per second.
    fn default() -> Self {
        Self::new(60.0, 1200)
    }
}

impl History {
    pub fn new(window_s: f64, max_len: usize) -> Self {
        Self {
            window_s: if window_s.is_finite() && window_s > 0.0 {
                window_s
            } else {
                f64::INFINITY
            },
            max_len: max_len.max(1),
            times: VecDeque::new(),
            tanks: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &VecDeque<f64> {
        &self.times
    }

    pub fn tanks(&self) -> &[TankSeries] {
        &self.tanks
    }

    pub fn tank(&self, name: &str) -> Option<&TankSeries> {
        self.tanks.iter().find(|t| t.name == name)
    }

    pub fn record(&mut self, snapshot: &PlantSnapshot) {
        if self.tanks.len() != snapshot.tanks.len()
            || self.tanks.iter().zip(&snapshot.tanks).any(|(a, b)| a.name != b.name)
        {
            // Different plant: start over.
            self.times.clear();
            self.tanks = snapshot
                .tanks
                .iter()
                .map(|t| TankSeries {
                    name: t.name.clone(),
                    level_pct: VecDeque::new(),
                    temperature: VecDeque::new(),
                })
                .collect();
        }

        self.times.push_back(snapshot.time_s);
        for (series, tank) in self.tanks.iter_mut().zip(&snapshot.tanks) {
            series.level_pct.push_back(tank.fill_ratio * 100.0);
            series.temperature.push_back(tank.temperature);
        }
        self.trim(snapshot.time_s);
    }

    fn trim(&mut self, now: f64) {
        while let Some(&oldest) = self.times.front() {
            if self.times.len() <= self.max_len && now - oldest <= self.window_s {
                break;
            }
            self.times.pop_front();
            for series in &mut self.tanks {
                series.level_pct.pop_front();
                series.temperature.pop_front();
            }
        }
    }

    /// `time_s,<tank>_level_pct,<tank>_temperature,...`, one row per sample.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("time_s");
        for t in &self.tanks {
            csv.push_str(&format!(",{0}_level_pct,{0}_temperature", t.name));
        }
        csv.push('\n');

        for (i, time) in self.times.iter().enumerate() {
            csv.push_str(&format!("{time}"));
            for t in &self.tanks {
                csv.push_str(&format!(",{},{}", t.level_pct[i], t.temperature[i]));
            }
            csv.push('\n');
        }
        csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::{NullSink, SegmentId};
    use pf_sim::Plant;

    #[test]
    fn records_level_and_temperature() {
        let mut plant = Plant::standard(NullSink).unwrap();
        let mut history = History::default();
        history.record(&plant.snapshot());

        let s0 = SegmentId::from_index(0);
        plant.force_open_valves(s0).unwrap();
        plant.set_pump_speed(s0, 1.0).unwrap();
        plant.tick(1.0);
        history.record(&plant.snapshot());

        let t2 = history.tank("T2").unwrap();
        assert_eq!(t2.level_pct, VecDeque::from(vec![0.0, 20.0]));
        assert_eq!(t2.temperature, VecDeque::from(vec![20.0, 20.0]));
        assert_eq!(history.times(), &VecDeque::from(vec![0.0, 1.0]));
    }

    #[test]
    fn max_len_bounds_samples() {
        let mut plant = Plant::standard(NullSink).unwrap();
        let mut history = History::new(1000.0, 3);
        for _ in 0..10 {
            plant.tick(1.0);
            history.record(&plant.snapshot());
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.times().front(), Some(&8.0));
        assert_eq!(history.tank("T1").unwrap().level_pct.len(), 3);
    }

    #[test]
    fn window_drops_old_samples() {
        let mut plant = Plant::standard(NullSink).unwrap();
        let mut history = History::new(2.0, 100);
        for _ in 0..10 {
            plant.tick(1.0);
            history.record(&plant.snapshot());
        }
        assert_eq!(history.times(), &VecDeque::from(vec![8.0, 9.0, 10.0]));
    }

    #[test]
    fn csv_layout() {
        let plant = Plant::standard(NullSink).unwrap();
        let mut history = History::default();
        history.record(&plant.snapshot());

        let csv = history.to_csv();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some(
                "time_s,T1_level_pct,T1_temperature,T2_level_pct,T2_temperature,\
                 T3_level_pct,T3_temperature,T4_level_pct,T4_temperature"
            )
        );
        assert_eq!(lines.next(), Some("0,50,20,0,20,0,20,0,20"));
        assert_eq!(lines.next(), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn series_stay_aligned_and_bounded(
                window in 0.5f64..20.0,
                max_len in 1usize..50,
                steps in prop::collection::vec(0.0f64..2.0, 0..120),
            ) {
                let mut plant = Plant::standard(NullSink).unwrap();
                let mut history = History::new(window, max_len);
                for dt in steps {
                    plant.tick(dt);
                    history.record(&plant.snapshot());

                    prop_assert!(history.len() <= max_len);
                    for series in history.tanks() {
                        prop_assert_eq!(series.level_pct.len(), history.len());
                        prop_assert_eq!(series.temperature.len(), history.len());
                    }
                    let newest = *history.times().back().unwrap();
                    let oldest = *history.times().front().unwrap();
                    prop_assert!(newest - oldest <= window);
                }
            }
        }
    }
}

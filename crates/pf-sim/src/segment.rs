//! Pipe segment: two tanks, one pipe, one pump, two valves.
//!
//! The interlock is strict but asymmetric:
//! - commanding the pump on opens both valves,
//! - closing a valve while the pump runs stops the pump,
//! - the pump can never be started while a valve is closed.

use crate::error::{SimError, SimResult};
use pf_components::{Pipe, Pump, Valve};
use pf_core::{LogSink, TankId, clamp_unit, notify};
use serde::{Deserialize, Serialize};

/// Which of the two segment valves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValveSide {
    /// Source-tank end
    A,
    /// Destination-tank end
    B,
}

/// One pipe run. Owns its pipe, pump and valves; refers to tanks by handle.
#[derive(Debug, Clone)]
pub struct Segment {
    name: String,
    source: TankId,
    dest: TankId,
    pipe: Pipe,
    pump: Pump,
    valve_a: Valve,
    valve_b: Valve,
}

impl Segment {
    pub fn new(
        name: impl Into<String>,
        source: TankId,
        dest: TankId,
        pipe: Pipe,
        pump: Pump,
        valve_a: Valve,
        valve_b: Valve,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            dest,
            pipe,
            pump,
            valve_a,
            valve_b,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> TankId {
        self.source
    }

    pub fn dest(&self) -> TankId {
        self.dest
    }

    pub fn pipe(&self) -> &Pipe {
        &self.pipe
    }

    pub fn pump(&self) -> &Pump {
        &self.pump
    }

    pub fn valve(&self, side: ValveSide) -> &Valve {
        match side {
            ValveSide::A => &self.valve_a,
            ValveSide::B => &self.valve_b,
        }
    }

    /// Both valves open.
    pub fn interlock_open(&self) -> bool {
        self.valve_a.is_open() && self.valve_b.is_open()
    }

    /// Ids of the valves currently closed, A first.
    pub fn closed_valves(&self) -> Vec<String> {
        [&self.valve_a, &self.valve_b]
            .into_iter()
            .filter(|v| !v.is_open())
            .map(|v| v.id().to_owned())
            .collect()
    }

    /// Open or close one valve. Stops a running pump if the interlock breaks.
    pub fn set_valve(&mut self, side: ValveSide, open: bool, sink: &dyn LogSink) {
        let valve = match side {
            ValveSide::A => &mut self.valve_a,
            ValveSide::B => &mut self.valve_b,
        };
        valve.set(open, sink);

        if self.pump.is_running() && !self.interlock_open() {
            self.pump.stop(sink);
            notify(
                sink,
                &format!("Pump {}: stopped (closed valve)", self.pump.id()),
            );
        }
    }

    /// Command the pump.
    ///
    /// Zero (or less) shuts the segment down, closing both valves if the
    /// pump was running. A positive speed starts the pump and opens both
    /// valves, unless a valve is closed, in which case nothing changes and
    /// [`SimError::Interlock`] names the closed valves.
    pub fn set_pump_speed(&mut self, speed: f64, sink: &dyn LogSink) -> SimResult<()> {
        let speed = clamp_unit(speed);

        if speed <= 0.0 {
            self.pump.set_speed(0.0, sink);
            if self.pump.is_running() {
                self.pump.set_running(false, sink);
                self.valve_a.set(false, sink);
                self.valve_b.set(false, sink);
            }
            return Ok(());
        }

        if !self.interlock_open() {
            return Err(SimError::Interlock {
                segment: self.name.clone(),
                closed: self.closed_valves(),
            });
        }

        self.pump.set_running(true, sink);
        self.pump.set_speed(speed, sink);
        self.force_open_valves(sink);
        Ok(())
    }

    /// Open both valves without touching the pump.
    pub fn force_open_valves(&mut self, sink: &dyn LogSink) {
        self.valve_a.set(true, sink);
        self.valve_b.set(true, sink);
    }

    /// Automatic shutdown when the source runs dry.
    pub(crate) fn stop_for_empty_source(&mut self, sink: &dyn LogSink) {
        notify(
            sink,
            &format!("{}: no fluid in source, stopping pump", self.name),
        );
        self.pump.stop(sink);
    }

    pub(crate) fn pipe_mut(&mut self) -> &mut Pipe {
        &mut self.pipe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_components::Point;
    use pf_core::MemorySink;

    fn segment() -> Segment {
        let pipe = Pipe::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]).unwrap();
        Segment::new(
            "T1-T2",
            TankId::from_index(0),
            TankId::from_index(1),
            pipe,
            Pump::new("P12"),
            Valve::new("T1 (T1-T2)", "pipe T1-T2"),
            Valve::new("T2 (T1-T2)", "pipe T1-T2"),
        )
    }

    #[test]
    fn start_refused_with_closed_valves() {
        let sink = MemorySink::new();
        let mut seg = segment();

        let err = seg.set_pump_speed(0.5, &sink).unwrap_err();
        assert_eq!(
            err,
            SimError::Interlock {
                segment: "T1-T2".into(),
                closed: vec!["T1 (T1-T2)".into(), "T2 (T1-T2)".into()],
            }
        );
        assert!(!seg.pump().is_running());
        assert_eq!(seg.pump().speed(), 0.0);
        assert!(sink.is_empty());
    }

    #[test]
    fn start_refused_names_only_closed_valve() {
        let sink = MemorySink::new();
        let mut seg = segment();
        seg.set_valve(ValveSide::A, true, &sink);

        let err = seg.set_pump_speed(1.0, &sink).unwrap_err();
        assert_eq!(err.to_string(), "Open valve: T2 (T1-T2)");
    }

    #[test]
    fn start_with_open_valves_runs_pump() {
        let sink = MemorySink::new();
        let mut seg = segment();
        seg.force_open_valves(&sink);
        sink.take();

        seg.set_pump_speed(1.0, &sink).unwrap();
        assert!(seg.pump().is_running());
        assert_eq!(seg.pump().speed(), 1.0);
        assert!(seg.interlock_open());
        // Valves already open: only pump messages.
        assert_eq!(sink.lines(), vec!["Pump P12 on", "Pump P12 speed: 100%"]);
    }

    #[test]
    fn closing_valve_stops_running_pump() {
        let sink = MemorySink::new();
        let mut seg = segment();
        seg.force_open_valves(&sink);
        seg.set_pump_speed(0.6, &sink).unwrap();
        sink.take();

        seg.set_valve(ValveSide::B, false, &sink);
        assert!(!seg.pump().is_running());
        assert_eq!(seg.pump().speed(), 0.0);
        assert!(seg.valve(ValveSide::A).is_open());
        assert_eq!(
            sink.lines(),
            vec![
                "Valve T2 (T1-T2) closed (pipe T1-T2)",
                "Pump P12 off",
                "Pump P12 speed: 0%",
                "Pump P12: stopped (closed valve)",
            ]
        );
    }

    #[test]
    fn zero_speed_shuts_down_and_closes_valves() {
        let sink = MemorySink::new();
        let mut seg = segment();
        seg.force_open_valves(&sink);
        seg.set_pump_speed(0.4, &sink).unwrap();

        seg.set_pump_speed(0.0, &sink).unwrap();
        assert!(!seg.pump().is_running());
        assert_eq!(seg.pump().speed(), 0.0);
        assert!(!seg.valve(ValveSide::A).is_open());
        assert!(!seg.valve(ValveSide::B).is_open());
    }

    #[test]
    fn zero_speed_on_idle_pump_leaves_valves() {
        let sink = MemorySink::new();
        let mut seg = segment();
        seg.force_open_valves(&sink);
        sink.take();

        seg.set_pump_speed(-1.0, &sink).unwrap();
        assert!(seg.interlock_open());
        assert!(sink.is_empty());
    }

    #[test]
    fn speed_change_while_running_is_single_message() {
        let sink = MemorySink::new();
        let mut seg = segment();
        seg.force_open_valves(&sink);
        seg.set_pump_speed(0.5, &sink).unwrap();
        sink.take();

        seg.set_pump_speed(0.75, &sink).unwrap();
        assert_eq!(sink.lines(), vec!["Pump P12 speed: 75%"]);
    }
}

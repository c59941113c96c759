//! The plant: tanks, segments and the fixed-order tick.

use crate::alarm::AlarmLatch;
use crate::error::{SimError, SimResult};
use crate::layout::{TankLayout, route_pipe};
use crate::params::PhysicsParams;
use crate::ramp::RampAction;
use crate::segment::{Segment, ValveSide};
use crate::snapshot::{PlantSnapshot, SegmentSnapshot, TankSnapshot, ValveSnapshot};
use pf_components::{FlowDirection, Pipe, Point, Pump, Tank, Valve};
use pf_core::{LogSink, SegmentId, TankId, non_negative, notify};
use std::collections::HashSet;
use std::fmt;

/// Construction parameters for one tank.
#[derive(Debug, Clone, PartialEq)]
pub struct TankSpec {
    pub name: String,
    pub layout: TankLayout,
    pub capacity: f64,
    pub initial_volume: f64,
    pub temperature: f64,
    /// Defaults to `temperature`
    pub target_temperature: Option<f64>,
}

impl TankSpec {
    /// Empty tank at 20 degrees.
    pub fn new(name: impl Into<String>, layout: TankLayout, capacity: f64) -> Self {
        Self {
            name: name.into(),
            layout,
            capacity,
            initial_volume: 0.0,
            temperature: 20.0,
            target_temperature: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.initial_volume = volume;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValveSpec {
    pub id: String,
    pub description: String,
}

/// Construction parameters for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSpec {
    pub name: String,
    pub source: TankId,
    pub dest: TankId,
    pub pump_id: String,
    pub valve_a: ValveSpec,
    pub valve_b: ValveSpec,
    /// Explicit polyline; routed from the tank layouts when `None`
    pub route: Option<Vec<Point>>,
}

impl SegmentSpec {
    /// Segment named `"<src>-<dst>"` with valves `"<src> (<name>)"` and
    /// `"<dst> (<name>)"`, both described as `"pipe <name>"`.
    pub fn between(
        source: (TankId, &str),
        dest: (TankId, &str),
        pump_id: impl Into<String>,
    ) -> Self {
        let name = format!("{}-{}", source.1, dest.1);
        let description = format!("pipe {name}");
        Self {
            valve_a: ValveSpec {
                id: format!("{} ({name})", source.1),
                description: description.clone(),
            },
            valve_b: ValveSpec {
                id: format!("{} ({name})", dest.1),
                description,
            },
            name,
            source: source.0,
            dest: dest.0,
            pump_id: pump_id.into(),
            route: None,
        }
    }
}

/// Incremental plant builder.
///
/// Add tanks first (their handles are needed by segments), then call
/// [`PlantBuilder::build`] to validate and freeze the topology.
#[derive(Debug, Clone, Default)]
pub struct PlantBuilder {
    tanks: Vec<TankSpec>,
    segments: Vec<SegmentSpec>,
    params: PhysicsParams,
}

impl PlantBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Four tanks in a row, T1 holding 50 of 100, chained T1-T2, T2-T3, T3-T4.
    pub fn standard() -> Self {
        let mut builder = Self::new();
        let ids: Vec<(TankId, String)> = (0..4)
            .map(|i| {
                let name = format!("T{}", i + 1);
                let layout = TankLayout::new(80.0 + 200.0 * i as f64, 260.0, 100.0, 140.0);
                let mut spec = TankSpec::new(name.clone(), layout, 100.0);
                if i == 0 {
                    spec = spec.with_volume(50.0);
                }
                (builder.add_tank(spec), name)
            })
            .collect();

        for pair in ids.windows(2) {
            let (src, src_name) = &pair[0];
            let (dst, dst_name) = &pair[1];
            let pump_id = format!("P{}{}", src.index() + 1, dst.index() + 1);
            builder.add_segment(SegmentSpec::between(
                (*src, src_name.as_str()),
                (*dst, dst_name.as_str()),
                pump_id,
            ));
        }
        builder
    }

    pub fn add_tank(&mut self, spec: TankSpec) -> TankId {
        let id = TankId::from_index(self.tanks.len() as u32);
        self.tanks.push(spec);
        id
    }

    pub fn add_segment(&mut self, spec: SegmentSpec) -> SegmentId {
        let id = SegmentId::from_index(self.segments.len() as u32);
        self.segments.push(spec);
        id
    }

    pub fn params(mut self, params: PhysicsParams) -> Self {
        self.params = params;
        self
    }

    /// Validate and build. The plant keeps `sink` for its whole lifetime.
    pub fn build(self, sink: impl LogSink + 'static) -> SimResult<Plant> {
        self.params.validate()?;

        let mut names = HashSet::new();
        let mut tanks = Vec::with_capacity(self.tanks.len());
        let mut layouts = Vec::with_capacity(self.tanks.len());
        for spec in &self.tanks {
            if !names.insert(spec.name.as_str()) {
                return Err(SimError::InvalidArg {
                    what: "duplicate tank name",
                });
            }
            let mut tank = Tank::new(spec.name.clone(), spec.capacity, spec.temperature)?
                .with_volume(spec.initial_volume);
            if let Some(target) = spec.target_temperature {
                tank.set_target_temperature(target);
            }
            tanks.push(tank);
            layouts.push(spec.layout);
        }

        let mut segments = Vec::with_capacity(self.segments.len());
        for spec in self.segments {
            for id in [spec.source, spec.dest] {
                if id.index() >= tanks.len() {
                    return Err(SimError::UnknownTank { id });
                }
            }
            if spec.source == spec.dest {
                return Err(SimError::InvalidArg {
                    what: "segment must connect two different tanks",
                });
            }
            let points = spec.route.unwrap_or_else(|| {
                route_pipe(&layouts[spec.source.index()], &layouts[spec.dest.index()])
            });
            segments.push(Segment::new(
                spec.name,
                spec.source,
                spec.dest,
                Pipe::new(points)?,
                Pump::new(spec.pump_id),
                Valve::new(spec.valve_a.id, spec.valve_a.description),
                Valve::new(spec.valve_b.id, spec.valve_b.description),
            ));
        }

        let n = tanks.len();
        Ok(Plant {
            tanks,
            layouts,
            segments,
            ramps: vec![None; n],
            alarms: vec![AlarmLatch::default(); n],
            params: self.params,
            time: 0.0,
            sink: Box::new(sink),
        })
    }
}

/// Process simulation of the whole plant.
///
/// Single-threaded and synchronous: every call runs to completion. Hosts
/// that share a plant across threads must serialise access themselves.
pub struct Plant {
    tanks: Vec<Tank>,
    layouts: Vec<TankLayout>,
    segments: Vec<Segment>,
    ramps: Vec<Option<RampAction>>,
    alarms: Vec<AlarmLatch>,
    params: PhysicsParams,
    /// Simulation clock (seconds)
    time: f64,
    sink: Box<dyn LogSink>,
}

impl fmt::Debug for Plant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plant")
            .field("time", &self.time)
            .field("tanks", &self.tanks)
            .field("segments", &self.segments)
            .field("ramps", &self.ramps)
            .field("alarms", &self.alarms)
            .finish_non_exhaustive()
    }
}

impl Plant {
    /// The stock four-tank plant.
    pub fn standard(sink: impl LogSink + 'static) -> SimResult<Self> {
        PlantBuilder::standard().build(sink)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    pub fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn tank_ids(&self) -> impl Iterator<Item = TankId> + '_ {
        (0..self.tanks.len()).map(|i| TankId::from_index(i as u32))
    }

    pub fn segment_ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        (0..self.segments.len()).map(|i| SegmentId::from_index(i as u32))
    }

    /// Look a tank up by name.
    pub fn tank_id(&self, name: &str) -> SimResult<TankId> {
        self.tanks
            .iter()
            .position(|t| t.name() == name)
            .map(|i| TankId::from_index(i as u32))
            .ok_or_else(|| SimError::UnknownTankName {
                name: name.to_owned(),
            })
    }

    pub fn tank(&self, id: TankId) -> SimResult<&Tank> {
        Ok(&self.tanks[self.tank_index(id)?])
    }

    pub fn layout(&self, id: TankId) -> SimResult<&TankLayout> {
        Ok(&self.layouts[self.tank_index(id)?])
    }

    pub fn segment(&self, id: SegmentId) -> SimResult<&Segment> {
        Ok(&self.segments[self.segment_index(id)?])
    }

    /// Active fill/drain on a tank, if any.
    pub fn ramp(&self, id: TankId) -> SimResult<Option<&RampAction>> {
        Ok(self.ramps[self.tank_index(id)?].as_ref())
    }

    /// Alarm conditions observed on the last tick.
    pub fn alarms(&self, id: TankId) -> SimResult<AlarmLatch> {
        Ok(self.alarms[self.tank_index(id)?])
    }

    pub fn total_volume(&self) -> f64 {
        self.tanks.iter().map(Tank::volume).sum()
    }

    // ---- Tank control ----

    /// Ramp the tank to full over `duration_s` seconds.
    pub fn fill(&mut self, tank: TankId, duration_s: f64) -> SimResult<()> {
        let idx = self.tank_index(tank)?;
        let target = self.tanks[idx].capacity();
        self.start_ramp(idx, duration_s, target, "filling")
    }

    /// Ramp the tank to empty over `duration_s` seconds.
    pub fn drain(&mut self, tank: TankId, duration_s: f64) -> SimResult<()> {
        let idx = self.tank_index(tank)?;
        self.start_ramp(idx, duration_s, 0.0, "draining")
    }

    pub fn set_target_temperature(&mut self, tank: TankId, temperature: f64) -> SimResult<()> {
        let idx = self.tank_index(tank)?;
        if !temperature.is_finite() {
            tracing::warn!(tank = %tank, temperature, "ignoring non-finite target temperature");
            return Ok(());
        }
        let t = &mut self.tanks[idx];
        t.set_target_temperature(temperature);
        notify(
            self.sink.as_ref(),
            &format!("{}: target temperature = {:.1}C", t.name(), temperature),
        );
        Ok(())
    }

    // ---- Segment control ----

    pub fn set_valve(&mut self, segment: SegmentId, side: ValveSide, open: bool) -> SimResult<()> {
        let idx = self.segment_index(segment)?;
        self.segments[idx].set_valve(side, open, self.sink.as_ref());
        Ok(())
    }

    /// See [`Segment::set_pump_speed`]. An interlock rejection leaves the plant unchanged.
    pub fn set_pump_speed(&mut self, segment: SegmentId, speed: f64) -> SimResult<()> {
        let idx = self.segment_index(segment)?;
        let result = self.segments[idx].set_pump_speed(speed, self.sink.as_ref());
        if let Err(err) = &result {
            tracing::warn!(segment = %segment, %err, "pump start refused");
        }
        result
    }

    pub fn force_open_valves(&mut self, segment: SegmentId) -> SimResult<()> {
        let idx = self.segment_index(segment)?;
        self.segments[idx].force_open_valves(self.sink.as_ref());
        Ok(())
    }

    // ---- Tick ----

    /// Advance the plant by `dt` seconds.
    ///
    /// Phases run in a fixed order, each seeing the results of the previous:
    /// ramps, temperatures, inter-tank flow, alarms.
    pub fn tick(&mut self, dt: f64) {
        let dt = non_negative(dt);
        self.time += dt;
        tracing::trace!(time = self.time, dt, "tick");

        self.advance_ramps();
        self.approach_temperatures(dt);
        self.transfer(dt);
        self.evaluate_alarms();
    }

    /// Read-only projection for rendering.
    pub fn snapshot(&self) -> PlantSnapshot {
        let tanks = self
            .tanks
            .iter()
            .enumerate()
            .map(|(i, t)| TankSnapshot {
                id: TankId::from_index(i as u32),
                name: t.name().to_owned(),
                layout: self.layouts[i],
                capacity: t.capacity(),
                volume: t.volume(),
                fill_ratio: t.fill_ratio(),
                temperature: t.temperature(),
                target_temperature: t.target_temperature(),
                alarms: self.alarms[i],
                ramp_active: self.ramps[i].is_some(),
            })
            .collect();

        let segments = self
            .segments
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let valve = |side| {
                    let v = s.valve(side);
                    ValveSnapshot {
                        id: v.id().to_owned(),
                        open: v.is_open(),
                    }
                };
                SegmentSnapshot {
                    id: SegmentId::from_index(i as u32),
                    name: s.name().to_owned(),
                    source: s.source(),
                    dest: s.dest(),
                    points: s.pipe().points().to_vec(),
                    flowing: s.pipe().is_flowing(),
                    direction: s.pipe().direction(),
                    valve_a: valve(ValveSide::A),
                    valve_b: valve(ValveSide::B),
                    pump_id: s.pump().id().to_owned(),
                    pump_running: s.pump().is_running(),
                    pump_speed: s.pump().effective_speed(),
                }
            })
            .collect();

        PlantSnapshot {
            time_s: self.time,
            tanks,
            segments,
        }
    }

    fn start_ramp(&mut self, idx: usize, duration_s: f64, target: f64, verb: &str) -> SimResult<()> {
        let duration = non_negative(duration_s);
        let tank = &self.tanks[idx];
        self.ramps[idx] = Some(RampAction::new(self.time, duration, tank.volume(), target));
        notify(
            self.sink.as_ref(),
            &format!("{}: {verb} over {}s", tank.name(), duration as u64),
        );
        Ok(())
    }

    fn advance_ramps(&mut self) {
        let now = self.time;
        for (tank, slot) in self.tanks.iter_mut().zip(self.ramps.iter_mut()) {
            let Some(ramp) = *slot else { continue };
            // The ramp target already lies within bounds; set_volume clamps anyway.
            tank.set_volume(ramp.value_at(now));
            if ramp.finished(now) {
                *slot = None;
            }
        }
    }

    fn approach_temperatures(&mut self, dt: f64) {
        let PhysicsParams {
            heating_rate,
            cooling_rate,
            ..
        } = self.params;
        for tank in &mut self.tanks {
            let t = tank.temperature();
            let target = tank.target_temperature();
            if t < target {
                tank.set_temperature((t + heating_rate * dt).min(target));
            } else if t > target {
                tank.set_temperature((t - cooling_rate * dt).max(target));
            }
        }
    }

    fn transfer(&mut self, dt: f64) {
        let sink = self.sink.as_ref();
        for seg in &mut self.segments {
            seg.pipe_mut().set_flow(false, FlowDirection::Forward);

            if !(seg.pump().is_running() && seg.interlock_open()) {
                continue;
            }

            let Some((src, dst)) =
                pair_mut(&mut self.tanks, seg.source().index(), seg.dest().index())
            else {
                continue;
            };

            if src.is_empty() {
                seg.stop_for_empty_source(sink);
                continue;
            }
            if dst.is_full() {
                // Back-pressure: pump keeps running, nothing moves.
                continue;
            }

            let amount = self.params.base_flow_rate * seg.pump().speed() * dt;
            let removed = src.remove(amount);
            let added = dst.add(removed);
            if added < removed {
                src.add(removed - added);
            }
            if removed > 0.0 {
                seg.pipe_mut().set_flow(true, FlowDirection::Forward);
            }
        }
    }

    fn evaluate_alarms(&mut self) {
        let sink = self.sink.as_ref();
        for (tank, latch) in self.tanks.iter().zip(self.alarms.iter_mut()) {
            let now = AlarmLatch::observe(tank, &self.params);
            for kind in now.rising_edges(latch) {
                notify(sink, &kind.message(tank.name(), &self.params));
            }
            *latch = now;
        }
    }

    fn tank_index(&self, id: TankId) -> SimResult<usize> {
        let idx = id.index();
        if idx < self.tanks.len() {
            Ok(idx)
        } else {
            Err(SimError::UnknownTank { id })
        }
    }

    fn segment_index(&self, id: SegmentId) -> SimResult<usize> {
        let idx = id.index();
        if idx < self.segments.len() {
            Ok(idx)
        } else {
            Err(SimError::UnknownSegment { id })
        }
    }
}

/// Two distinct mutable elements of one slice.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> Option<(&mut T, &mut T)> {
    if a == b || a >= items.len() || b >= items.len() {
        return None;
    }
    if a < b {
        let (lo, hi) = items.split_at_mut(b);
        Some((&mut lo[a], &mut hi[0]))
    } else {
        let (lo, hi) = items.split_at_mut(a);
        Some((&mut hi[0], &mut lo[b]))
    }
}

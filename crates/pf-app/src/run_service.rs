//! Scenario execution.

use crate::error::{AppError, AppResult};
use crate::history::History;
use pf_core::{LogSink, SegmentId, notify};
use pf_project::{CommandDef, Scenario, ValveSideDef, validate_scenario};
use pf_sim::{Plant, PlantSnapshot, SimError, ValveSide};

/// Tolerance when comparing command times with the simulation clock.
const TIME_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Default)]
pub struct RunProgress {
    pub sim_time_s: f64,
    pub t_end_s: f64,
    pub fraction_complete: f64,
    pub step: usize,
    pub total_steps: usize,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub steps: usize,
    pub commands_applied: usize,
    /// Commands refused by the pump interlock
    pub commands_refused: usize,
    /// Commands scheduled after `t_end_s`
    pub commands_skipped: usize,
    pub final_snapshot: PlantSnapshot,
}

fn valve_side(side: ValveSideDef) -> ValveSide {
    match side {
        ValveSideDef::A => ValveSide::A,
        ValveSideDef::B => ValveSide::B,
    }
}

/// Apply one scripted command to the plant.
pub fn apply_command(plant: &mut Plant, command: &CommandDef) -> Result<(), SimError> {
    let segment = |i: usize| SegmentId::from_index(i as u32);
    match command {
        CommandDef::Fill { tank, duration_s } => {
            let id = plant.tank_id(tank)?;
            plant.fill(id, *duration_s)
        }
        CommandDef::Drain { tank, duration_s } => {
            let id = plant.tank_id(tank)?;
            plant.drain(id, *duration_s)
        }
        CommandDef::SetTargetTemperature { tank, temperature } => {
            let id = plant.tank_id(tank)?;
            plant.set_target_temperature(id, *temperature)
        }
        CommandDef::SetValve {
            segment: s,
            side,
            open,
        } => plant.set_valve(segment(*s), valve_side(*side), *open),
        CommandDef::SetPumpSpeed { segment: s, speed } => {
            plant.set_pump_speed(segment(*s), *speed)
        }
        CommandDef::ForceOpenValves { segment: s } => plant.force_open_valves(segment(*s)),
    }
}

pub fn run_scenario(
    plant: &mut Plant,
    scenario: &Scenario,
    sink: &dyn LogSink,
    history: Option<&mut History>,
) -> AppResult<RunReport> {
    run_scenario_with_progress(plant, scenario, sink, history, None)
}

/// Drive `plant` with fixed `dt_s` steps up to `t_end_s`.
///
/// Commands fire on the first step boundary at or after their `at_s`,
/// measured from the plant clock at the start of the run. Interlock
/// refusals are written to `sink` and the run continues; any other
/// command error aborts.
pub fn run_scenario_with_progress(
    plant: &mut Plant,
    scenario: &Scenario,
    sink: &dyn LogSink,
    mut history: Option<&mut History>,
    mut progress: Option<&mut dyn FnMut(RunProgress)>,
) -> AppResult<RunReport> {
    validate_scenario(scenario)?;

    let dt = scenario.dt_s;
    let total_steps = (scenario.t_end_s / dt - TIME_EPS).ceil().max(0.0) as usize;
    let start = plant.time();
    let commands = scenario.ordered_commands();
    let mut pending = commands.iter().peekable();

    let mut report = RunReport {
        steps: 0,
        commands_applied: 0,
        commands_refused: 0,
        commands_skipped: 0,
        final_snapshot: plant.snapshot(),
    };

    tracing::info!(
        scenario = %scenario.name,
        dt_s = dt,
        t_end_s = scenario.t_end_s,
        commands = commands.len(),
        "scenario started"
    );

    if let Some(h) = history.as_deref_mut() {
        h.record(&report.final_snapshot);
    }

    for step in 0..total_steps {
        let elapsed = plant.time() - start;
        while let Some(cmd) = pending.next_if(|c| c.at_s <= elapsed + TIME_EPS) {
            match apply_command(plant, &cmd.command) {
                Ok(()) => report.commands_applied += 1,
                Err(err @ SimError::Interlock { .. }) => {
                    notify(sink, &err.to_string());
                    report.commands_refused += 1;
                }
                Err(err) => {
                    return Err(AppError::Simulation(format!(
                        "command at {}s failed: {err}",
                        cmd.at_s
                    )));
                }
            }
        }

        plant.tick(dt);
        report.steps = step + 1;

        if let Some(h) = history.as_deref_mut() {
            h.record(&plant.snapshot());
        }
        if let Some(cb) = progress.as_deref_mut() {
            let sim_time_s = plant.time() - start;
            cb(RunProgress {
                sim_time_s,
                t_end_s: scenario.t_end_s,
                fraction_complete: report.steps as f64 / total_steps as f64,
                step: report.steps,
                total_steps,
            });
        }
    }

    report.commands_skipped = pending.count();
    report.final_snapshot = plant.snapshot();
    tracing::info!(
        steps = report.steps,
        applied = report.commands_applied,
        refused = report.commands_refused,
        skipped = report.commands_skipped,
        "scenario finished"
    );
    Ok(report)
}

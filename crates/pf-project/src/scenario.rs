//! Scripted operator scenarios.

use pf_core::Real;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub name: String,
    /// Fixed tick length (seconds)
    pub dt_s: Real,
    /// Run until simulation time reaches this (seconds)
    pub t_end_s: Real,
    #[serde(default)]
    pub commands: Vec<TimedCommand>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimedCommand {
    /// Applied on the first tick boundary at or after this time
    pub at_s: Real,
    pub command: CommandDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValveSideDef {
    A,
    B,
}

/// Operator command. Tanks by name, segments by position in the config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CommandDef {
    Fill {
        tank: String,
        duration_s: Real,
    },
    Drain {
        tank: String,
        duration_s: Real,
    },
    SetTargetTemperature {
        tank: String,
        temperature: Real,
    },
    SetValve {
        segment: usize,
        side: ValveSideDef,
        open: bool,
    },
    SetPumpSpeed {
        segment: usize,
        speed: Real,
    },
    ForceOpenValves {
        segment: usize,
    },
}

impl CommandDef {
    pub fn tank(&self) -> Option<&str> {
        match self {
            CommandDef::Fill { tank, .. }
            | CommandDef::Drain { tank, .. }
            | CommandDef::SetTargetTemperature { tank, .. } => Some(tank),
            _ => None,
        }
    }

    pub fn segment(&self) -> Option<usize> {
        match self {
            CommandDef::SetValve { segment, .. }
            | CommandDef::SetPumpSpeed { segment, .. }
            | CommandDef::ForceOpenValves { segment } => Some(*segment),
            _ => None,
        }
    }
}

impl Scenario {
    /// Commands sorted by time, stable for equal times.
    pub fn ordered_commands(&self) -> Vec<TimedCommand> {
        let mut commands = self.commands.clone();
        commands.sort_by(|a, b| a.at_s.total_cmp(&b.at_s));
        commands
    }
}

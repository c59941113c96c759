//! Config and scenario validation.

use crate::scenario::Scenario;
use crate::schema::{CURRENT_VERSION, PhysicsDef, PlantConfig, SegmentDef, TankDef};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_config(config: &PlantConfig) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > CURRENT_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    let mut names = HashSet::new();
    for tank in &config.tanks {
        if !names.insert(tank.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: tank.name.clone(),
                context: "tanks".to_string(),
            });
        }
        validate_tank(tank)?;
    }

    let mut pumps = HashSet::new();
    let mut segment_names = HashSet::new();
    for segment in &config.segments {
        validate_segment(segment, &names)?;
        if !pumps.insert(segment.pump.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: segment.pump.clone(),
                context: "segment pumps".to_string(),
            });
        }
        if !segment_names.insert(segment.name()) {
            return Err(ValidationError::DuplicateId {
                id: segment.name(),
                context: "segments".to_string(),
            });
        }
    }

    validate_physics(&config.physics)
}

fn validate_tank(tank: &TankDef) -> Result<(), ValidationError> {
    let field = |f: &str| format!("tank '{}' {f}", tank.name);

    if tank.name.trim().is_empty() {
        return Err(invalid("tank name", "\"\"", "must not be empty"));
    }
    if !(tank.capacity.is_finite() && tank.capacity > 0.0) {
        return Err(invalid(field("capacity"), tank.capacity, "must be positive"));
    }
    if !(tank.initial_volume.is_finite()
        && tank.initial_volume >= 0.0
        && tank.initial_volume <= tank.capacity)
    {
        return Err(invalid(
            field("initial_volume"),
            tank.initial_volume,
            "must lie within 0..=capacity",
        ));
    }
    if !tank.temperature.is_finite() {
        return Err(invalid(field("temperature"), tank.temperature, "must be finite"));
    }
    if let Some(t) = tank.target_temperature.filter(|t| !t.is_finite()) {
        return Err(invalid(field("target_temperature"), t, "must be finite"));
    }

    let l = &tank.layout;
    if ![l.x, l.y, l.width, l.height].iter().all(|v| v.is_finite()) {
        return Err(invalid(field("layout"), "non-finite", "must be finite"));
    }
    if l.width <= 0.0 || l.height <= 0.0 {
        return Err(invalid(
            field("layout"),
            format!("{}x{}", l.width, l.height),
            "size must be positive",
        ));
    }
    Ok(())
}

fn validate_segment(segment: &SegmentDef, tanks: &HashSet<&str>) -> Result<(), ValidationError> {
    let context = format!("segment '{}'", segment.name());
    for name in [&segment.source, &segment.dest] {
        if !tanks.contains(name.as_str()) {
            return Err(ValidationError::MissingReference {
                id: name.clone(),
                context,
            });
        }
    }
    if segment.source == segment.dest {
        return Err(invalid(
            format!("{context} dest"),
            &segment.dest,
            "must differ from source",
        ));
    }
    if segment.pump.trim().is_empty() {
        return Err(invalid(format!("{context} pump"), "\"\"", "must not be empty"));
    }
    if let Some(route) = &segment.route {
        if route.len() < 2 {
            return Err(invalid(
                format!("{context} route"),
                route.len(),
                "needs at least two points",
            ));
        }
        if !route.iter().flatten().all(|v| v.is_finite()) {
            return Err(invalid(format!("{context} route"), "non-finite", "must be finite"));
        }
    }
    Ok(())
}

fn validate_physics(p: &PhysicsDef) -> Result<(), ValidationError> {
    let fields = [
        ("heating_rate", p.heating_rate),
        ("cooling_rate", p.cooling_rate),
        ("base_flow_rate", p.base_flow_rate),
        ("high_level_pct", p.high_level_pct),
        ("low_level_pct", p.low_level_pct),
        ("hot_temperature", p.hot_temperature),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(invalid(format!("physics {name}"), value, "must be finite"));
        }
    }
    for (name, value) in &fields[..3] {
        if *value < 0.0 {
            return Err(invalid(format!("physics {name}"), value, "must be non-negative"));
        }
    }
    if p.heating_rate <= p.cooling_rate {
        return Err(invalid(
            "physics heating_rate",
            p.heating_rate,
            "must exceed cooling_rate",
        ));
    }
    if !(0.0 <= p.low_level_pct && p.low_level_pct < p.high_level_pct && p.high_level_pct <= 100.0)
    {
        return Err(invalid(
            "physics level thresholds",
            format!("{}..{}", p.low_level_pct, p.high_level_pct),
            "need 0 <= low < high <= 100",
        ));
    }
    Ok(())
}

/// Checks that do not need the plant.
pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if !(scenario.dt_s.is_finite() && scenario.dt_s > 0.0) {
        return Err(invalid("dt_s", scenario.dt_s, "must be positive"));
    }
    if !(scenario.t_end_s.is_finite() && scenario.t_end_s >= 0.0) {
        return Err(invalid("t_end_s", scenario.t_end_s, "must be non-negative"));
    }
    for (i, cmd) in scenario.commands.iter().enumerate() {
        if !(cmd.at_s.is_finite() && cmd.at_s >= 0.0) {
            return Err(invalid(
                format!("commands[{i}].at_s"),
                cmd.at_s,
                "must be non-negative",
            ));
        }
    }
    Ok(())
}

/// Checks the tank names and segment indices a scenario refers to.
pub fn validate_scenario_refs(
    scenario: &Scenario,
    config: &PlantConfig,
) -> Result<(), ValidationError> {
    for (i, cmd) in scenario.commands.iter().enumerate() {
        let context = format!("commands[{i}]");
        if let Some(tank) = cmd.command.tank().filter(|t| config.tank(t).is_none()) {
            return Err(ValidationError::MissingReference {
                id: tank.to_string(),
                context,
            });
        }
        if let Some(segment) = cmd.command.segment().filter(|&s| s >= config.segments.len()) {
            return Err(ValidationError::MissingReference {
                id: format!("segment {segment}"),
                context,
            });
        }
    }
    Ok(())
}

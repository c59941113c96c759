//! Build a running [`Plant`] from a [`PlantConfig`].

use crate::error::{AppError, AppResult};
use pf_components::Point;
use pf_core::{LogSink, TankId};
use pf_project::{PhysicsDef, PlantConfig, validate_config};
use pf_sim::{PhysicsParams, Plant, PlantBuilder, SegmentSpec, TankLayout, TankSpec};
use std::collections::HashMap;

pub fn physics_params(def: &PhysicsDef) -> PhysicsParams {
    PhysicsParams {
        heating_rate: def.heating_rate,
        cooling_rate: def.cooling_rate,
        base_flow_rate: def.base_flow_rate,
        high_level_pct: def.high_level_pct,
        low_level_pct: def.low_level_pct,
        hot_temperature: def.hot_temperature,
    }
}

/// Validate `config` and build the plant. The plant keeps `sink` for its lifetime.
pub fn compile_plant(config: &PlantConfig, sink: impl LogSink + 'static) -> AppResult<Plant> {
    validate_config(config)?;

    let mut builder = PlantBuilder::new().params(physics_params(&config.physics));
    let mut ids: HashMap<&str, TankId> = HashMap::new();

    for tank in &config.tanks {
        let l = tank.layout;
        let mut spec = TankSpec::new(
            tank.name.clone(),
            TankLayout::new(l.x, l.y, l.width, l.height),
            tank.capacity,
        )
        .with_volume(tank.initial_volume)
        .with_temperature(tank.temperature);
        spec.target_temperature = tank.target_temperature;
        ids.insert(tank.name.as_str(), builder.add_tank(spec));
    }

    let lookup = |name: &str| {
        ids.get(name)
            .copied()
            .ok_or_else(|| AppError::Compile(format!("unknown tank '{name}'")))
    };

    for segment in &config.segments {
        let source = lookup(&segment.source)?;
        let dest = lookup(&segment.dest)?;
        let mut spec = SegmentSpec::between(
            (source, segment.source.as_str()),
            (dest, segment.dest.as_str()),
            segment.pump.clone(),
        );
        spec.route = segment
            .route
            .as_ref()
            .map(|pts| pts.iter().map(|&[x, y]| Point::new(x, y)).collect());
        builder.add_segment(spec);
    }

    let plant = builder
        .build(sink)
        .map_err(|e| AppError::Compile(e.to_string()))?;
    tracing::debug!(
        name = %config.name,
        tanks = plant.tanks().len(),
        segments = plant.segments().len(),
        "plant compiled"
    );
    Ok(plant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::NullSink;

    #[test]
    fn standard_config_matches_builtin_plant() {
        let from_config = compile_plant(&PlantConfig::standard(), NullSink).unwrap();
        let builtin = Plant::standard(NullSink).unwrap();
        assert_eq!(from_config.snapshot(), builtin.snapshot());
        assert_eq!(from_config.params(), builtin.params());
    }

    #[test]
    fn explicit_route_is_used() {
        let mut config = PlantConfig::standard();
        config.segments[0].route = Some(vec![[0.0, 0.0], [5.0, 5.0]]);
        let plant = compile_plant(&config, NullSink).unwrap();
        let points = plant.segments()[0].pipe().points();
        assert_eq!(points, &[Point::new(0.0, 0.0), Point::new(5.0, 5.0)]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = PlantConfig::standard();
        config.segments[1].source = "nope".into();
        let err = compile_plant(&config, NullSink).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn physics_and_targets_carry_over() {
        let mut config = PlantConfig::standard();
        config.physics.base_flow_rate = 5.0;
        config.tanks[2].target_temperature = Some(50.0);
        let plant = compile_plant(&config, NullSink).unwrap();
        assert_eq!(plant.params().base_flow_rate, 5.0);
        let t3 = plant.tank_id("T3").unwrap();
        assert_eq!(plant.tank(t3).unwrap().target_temperature(), 50.0);
    }
}

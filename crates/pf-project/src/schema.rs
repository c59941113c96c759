//! Plant configuration schema.

use pf_core::Real;
use serde::{Deserialize, Serialize};

pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantConfig {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub tanks: Vec<TankDef>,
    #[serde(default)]
    pub segments: Vec<SegmentDef>,
    #[serde(default)]
    pub physics: PhysicsDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TankDef {
    pub name: String,
    pub capacity: Real,
    #[serde(default)]
    pub initial_volume: Real,
    #[serde(default = "default_temperature")]
    pub temperature: Real,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_temperature: Option<Real>,
    #[serde(default)]
    pub layout: LayoutDef,
}

fn default_temperature() -> Real {
    20.0
}

/// Screen rectangle of a tank; pipes are routed from it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LayoutDef {
    pub x: Real,
    pub y: Real,
    #[serde(default = "default_tank_width")]
    pub width: Real,
    #[serde(default = "default_tank_height")]
    pub height: Real,
}

fn default_tank_width() -> Real {
    100.0
}

fn default_tank_height() -> Real {
    140.0
}

impl Default for LayoutDef {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: default_tank_width(),
            height: default_tank_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentDef {
    /// Source tank name
    pub source: String,
    /// Destination tank name
    pub dest: String,
    pub pump: String,
    /// Explicit pipe polyline as `[x, y]` pairs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Vec<[Real; 2]>>,
}

impl SegmentDef {
    /// `"<source>-<dest>"`
    pub fn name(&self) -> String {
        format!("{}-{}", self.source, self.dest)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsDef {
    /// Degrees per second
    pub heating_rate: Real,
    /// Degrees per second
    pub cooling_rate: Real,
    /// Volume per second at full pump speed
    pub base_flow_rate: Real,
    /// Percent
    pub high_level_pct: Real,
    /// Percent
    pub low_level_pct: Real,
    pub hot_temperature: Real,
}

impl Default for PhysicsDef {
    fn default() -> Self {
        Self {
            heating_rate: 0.8,
            cooling_rate: 0.3,
            base_flow_rate: 20.0,
            high_level_pct: 80.0,
            low_level_pct: 5.0,
            hot_temperature: 80.0,
        }
    }
}

impl PlantConfig {
    /// The stock four-tank plant: T1..T4 in a row, T1 half full, chained by P12, P23, P34.
    pub fn standard() -> Self {
        let tanks: Vec<TankDef> = (0..4)
            .map(|i| TankDef {
                name: format!("T{}", i + 1),
                capacity: 100.0,
                initial_volume: if i == 0 { 50.0 } else { 0.0 },
                temperature: default_temperature(),
                target_temperature: None,
                layout: LayoutDef {
                    x: 80.0 + 200.0 * i as Real,
                    y: 260.0,
                    ..LayoutDef::default()
                },
            })
            .collect();

        let segments = tanks
            .windows(2)
            .enumerate()
            .map(|(i, pair)| SegmentDef {
                source: pair[0].name.clone(),
                dest: pair[1].name.clone(),
                pump: format!("P{}{}", i + 1, i + 2),
                route: None,
            })
            .collect();

        Self {
            version: CURRENT_VERSION,
            name: "Standard plant".to_string(),
            tanks,
            segments,
            physics: PhysicsDef::default(),
        }
    }

    pub fn tank(&self, name: &str) -> Option<&TankDef> {
        self.tanks.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_matches_stock_plant() {
        let cfg = PlantConfig::standard();
        assert_eq!(cfg.tanks.len(), 4);
        assert_eq!(cfg.tanks[3].layout.x, 680.0);
        assert_eq!(cfg.tank("T1").unwrap().initial_volume, 50.0);
        let pumps: Vec<_> = cfg.segments.iter().map(|s| s.pump.as_str()).collect();
        assert_eq!(pumps, vec!["P12", "P23", "P34"]);
        assert_eq!(cfg.segments[1].name(), "T2-T3");
    }

    #[test]
    fn minimal_yaml_uses_defaults() {
        let yaml = r#"
version: 1
name: tiny
tanks:
  - name: A
    capacity: 10
"#;
        let cfg: PlantConfig = serde_yaml::from_str(yaml).unwrap();
        let a = &cfg.tanks[0];
        assert_eq!(a.temperature, 20.0);
        assert_eq!(a.initial_volume, 0.0);
        assert_eq!(a.layout.width, 100.0);
        assert_eq!(cfg.physics, PhysicsDef::default());
        assert!(cfg.segments.is_empty());
    }

    #[test]
    fn partial_physics_keeps_other_defaults() {
        let yaml = "version: 1\nname: x\nphysics:\n  base_flow_rate: 5\n";
        let cfg: PlantConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.physics.base_flow_rate, 5.0);
        assert_eq!(cfg.physics.heating_rate, 0.8);
    }
}

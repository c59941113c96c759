use pf_project::*;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pf_project_{}_{name}", std::process::id()))
}

#[test]
fn roundtrip_yaml_standard() {
    let config = PlantConfig::standard();
    let path = temp_path("standard.yaml");

    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn roundtrip_json_with_route() {
    let mut config = PlantConfig::standard();
    config.segments[2].route = Some(vec![[10.0, 20.0], [10.0, 80.0], [300.0, 80.0]]);
    config.tanks[1].target_temperature = Some(60.0);
    let path = temp_path("routed.json");

    save_json(&path, &config).unwrap();
    let loaded = load_config(&path).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn save_refuses_invalid_config() {
    let mut config = PlantConfig::standard();
    config.tanks[0].capacity = -5.0;
    let path = temp_path("invalid.yaml");

    let err = save_yaml(&path, &config).unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
}

#[test]
fn unknown_extension_is_rejected() {
    let err = load_config(std::path::Path::new("plant.toml")).unwrap_err();
    assert!(matches!(err, ProjectError::UnsupportedFormat { .. }));
}

#[test]
fn scenario_roundtrip() {
    let scenario = Scenario {
        name: "pump test".into(),
        dt_s: 0.1,
        t_end_s: 3.0,
        commands: vec![
            TimedCommand {
                at_s: 0.0,
                command: CommandDef::ForceOpenValves { segment: 0 },
            },
            TimedCommand {
                at_s: 0.5,
                command: CommandDef::SetValve {
                    segment: 0,
                    side: ValveSideDef::B,
                    open: false,
                },
            },
        ],
    };
    let path = temp_path("scenario.yaml");

    save_scenario(&path, &scenario).unwrap();
    assert_eq!(load_scenario(&path).unwrap(), scenario);
}

mod generated {
    use super::*;
    use proptest::prelude::*;

    /// Quarter steps keep every value exactly representable in text.
    fn quarters(range: std::ops::Range<i32>) -> impl Strategy<Value = f64> {
        range.prop_map(|q| q as f64 * 0.25)
    }

    fn tank_def() -> impl Strategy<Value = TankDef> {
        (1u32..4000)
            .prop_flat_map(|cap| (Just(cap), 0..=cap))
            .prop_flat_map(|(cap, vol)| {
                (
                    Just(cap as f64 * 0.25),
                    Just(vol as f64 * 0.25),
                    quarters(-160..400),
                    prop::option::of(quarters(0..400)),
                    quarters(0..4000),
                    quarters(0..2000),
                    quarters(4..800),
                )
            })
            .prop_map(|(capacity, initial_volume, temperature, target, x, y, width)| TankDef {
                name: String::new(),
                capacity,
                initial_volume,
                temperature,
                target_temperature: target,
                layout: LayoutDef {
                    x,
                    y,
                    width,
                    height: 140.0,
                },
            })
    }

    /// Tanks chained in order, each pair joined by one pump.
    fn chain_config() -> impl Strategy<Value = PlantConfig> {
        prop::collection::vec(tank_def(), 1..6).prop_map(|mut tanks| {
            for (i, tank) in tanks.iter_mut().enumerate() {
                tank.name = format!("T{}", i + 1);
            }
            let segments = (1..tanks.len())
                .map(|i| SegmentDef {
                    source: format!("T{i}"),
                    dest: format!("T{}", i + 1),
                    pump: format!("P{i}{}", i + 1),
                    route: None,
                })
                .collect();
            PlantConfig {
                version: CURRENT_VERSION,
                name: "generated".into(),
                tanks,
                segments,
                physics: PhysicsDef::default(),
            }
        })
    }

    proptest! {
        #[test]
        fn configs_survive_yaml_and_json(config in chain_config()) {
            let yaml = temp_path("generated.yaml");
            save_yaml(&yaml, &config).unwrap();
            prop_assert_eq!(&load_yaml(&yaml).unwrap(), &config);

            let json = temp_path("generated.json");
            save_json(&json, &config).unwrap();
            prop_assert_eq!(&load_json(&json).unwrap(), &config);
        }
    }
}

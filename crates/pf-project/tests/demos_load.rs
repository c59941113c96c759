use std::path::{Path, PathBuf};

fn demos() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

#[test]
fn demo_plant_equals_standard() {
    let config = pf_project::load_yaml(&demos().join("standard_plant.yaml"))
        .unwrap_or_else(|e| panic!("Failed to load demo plant: {e}"));
    assert_eq!(config, pf_project::PlantConfig::standard());
}

#[test]
fn demo_scenario_references_resolve() {
    let config = pf_project::PlantConfig::standard();
    let scenario = pf_project::load_scenario(&demos().join("fill_and_transfer.yaml"))
        .unwrap_or_else(|e| panic!("Failed to load demo scenario: {e}"));
    pf_project::validate_scenario_refs(&scenario, &config).unwrap();
    assert!(scenario.dt_s > 0.0);
    assert!(!scenario.commands.is_empty());
}

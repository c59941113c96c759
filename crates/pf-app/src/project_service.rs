//! Config and scenario loading, validation, and introspection.

use crate::error::{AppError, AppResult};
use pf_project::{PlantConfig, Scenario};
use std::path::Path;

/// Summary of a plant config for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantSummary {
    pub name: String,
    pub version: u32,
    pub tank_count: usize,
    pub segment_count: usize,
    pub total_capacity: f64,
    pub initial_volume: f64,
}

/// Load and validate a config (YAML or JSON by extension).
pub fn load_config(path: &Path) -> AppResult<PlantConfig> {
    let config = pf_project::load_config(path)?;
    tracing::debug!(path = %path.display(), name = %config.name, "config loaded");
    Ok(config)
}

/// Save a config (YAML or JSON by extension).
pub fn save_config(path: &Path, config: &PlantConfig) -> AppResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => pf_project::save_json(path, config)?,
        Some("yaml" | "yml") => pf_project::save_yaml(path, config)?,
        _ => {
            return Err(AppError::InvalidInput(format!(
                "unsupported config extension: {}",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Load a scenario and check its references against `config`.
pub fn load_scenario(path: &Path, config: &PlantConfig) -> AppResult<Scenario> {
    let scenario = pf_project::load_scenario(path)?;
    pf_project::validate_scenario_refs(&scenario, config)?;
    Ok(scenario)
}

pub fn summarize(config: &PlantConfig) -> PlantSummary {
    PlantSummary {
        name: config.name.clone(),
        version: config.version,
        tank_count: config.tanks.len(),
        segment_count: config.segments.len(),
        total_capacity: config.tanks.iter().map(|t| t.capacity).sum(),
        initial_volume: config.tanks.iter().map(|t| t.initial_volume).sum(),
    }
}

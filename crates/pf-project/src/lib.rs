//! pf-project: plant configuration and scenario file formats, with validation.

pub mod scenario;
pub mod schema;
pub mod validate;

pub use scenario::{CommandDef, Scenario, TimedCommand, ValveSideDef};
pub use schema::*;
pub use validate::{ValidationError, validate_config, validate_scenario, validate_scenario_refs};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported file format: {path}")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> ProjectResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(ProjectError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

fn read<T: DeserializeOwned>(path: &Path, format: Format) -> ProjectResult<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(match format {
        Format::Yaml => serde_yaml::from_str(&content)?,
        Format::Json => serde_json::from_str(&content)?,
    })
}

fn write<T: Serialize>(path: &Path, value: &T, format: Format) -> ProjectResult<()> {
    let content = match format {
        Format::Yaml => serde_yaml::to_string(value)?,
        Format::Json => serde_json::to_string_pretty(value)?,
    };
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_yaml(path: &Path) -> ProjectResult<PlantConfig> {
    let config: PlantConfig = read(path, Format::Yaml)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &PlantConfig) -> ProjectResult<()> {
    validate_config(config)?;
    write(path, config, Format::Yaml)
}

pub fn load_json(path: &Path) -> ProjectResult<PlantConfig> {
    let config: PlantConfig = read(path, Format::Json)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_json(path: &Path, config: &PlantConfig) -> ProjectResult<()> {
    validate_config(config)?;
    write(path, config, Format::Json)
}

/// Load a config, picking YAML or JSON from the file extension.
pub fn load_config(path: &Path) -> ProjectResult<PlantConfig> {
    match format_of(path)? {
        Format::Yaml => load_yaml(path),
        Format::Json => load_json(path),
    }
}

/// Load a scenario (YAML or JSON by extension). Plant references are not checked here.
pub fn load_scenario(path: &Path) -> ProjectResult<Scenario> {
    let scenario: Scenario = read(path, format_of(path)?)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_scenario(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    write(path, scenario, format_of(path)?)
}

//! Error types for the pf-app service layer.

use std::path::PathBuf;

/// Unified error for the CLI and other hosts.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Config validation failed: {0}")]
    Validation(String),

    #[error("Plant compilation failed: {0}")]
    Compile(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Plant lock poisoned")]
    LockPoisoned,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to write {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pf-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<pf_project::ProjectError> for AppError {
    fn from(err: pf_project::ProjectError) -> Self {
        match err {
            pf_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<pf_project::ValidationError> for AppError {
    fn from(err: pf_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<pf_sim::SimError> for AppError {
    fn from(err: pf_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

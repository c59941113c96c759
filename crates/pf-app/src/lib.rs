//! Shared application service layer for plantflow.
//!
//! Sits between the simulation engine and its hosts: config and scenario
//! loading, plant compilation, the timestamped event bus, a lock-guarded
//! plant for multi-threaded hosts, history recording and scenario runs.

pub mod bus;
pub mod error;
pub mod history;
pub mod project_service;
pub mod run_service;
pub mod runtime_compile;
pub mod shared;

// Re-export key types for convenience
pub use bus::{EventBus, EventLog, LogEvent, SubscriptionId};
pub use error::{AppError, AppResult};
pub use history::{History, TankSeries};
pub use project_service::{PlantSummary, load_config, load_scenario, save_config, summarize};
pub use run_service::{
    RunProgress, RunReport, apply_command, run_scenario, run_scenario_with_progress,
};
pub use runtime_compile::{compile_plant, physics_params};
pub use shared::{SharedPlant, Ticker};

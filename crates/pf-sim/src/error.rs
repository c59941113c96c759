//! Error types for plant operations.

use pf_components::ComponentError;
use pf_core::{SegmentId, TankId};
use thiserror::Error;

/// Errors reported by the plant.
///
/// `Interlock` is the only one expected during normal operation. The rest
/// mean the caller passed something it did not get from the plant itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Pump start refused because at least one valve of the segment is closed.
    #[error("Open valve: {}", .closed.join(", "))]
    Interlock { segment: String, closed: Vec<String> },

    #[error("Unknown tank: {id}")]
    UnknownTank { id: TankId },

    #[error("Unknown tank name: {name}")]
    UnknownTankName { name: String },

    #[error("Unknown segment: {id}")]
    UnknownSegment { id: SegmentId },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),
}

pub type SimResult<T> = Result<T, SimError>;

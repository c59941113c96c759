//! Error types for component construction.

use pf_core::error::PfError;
use thiserror::Error;

/// Errors that can occur while building components.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<PfError> for ComponentError {
    fn from(e: PfError) -> Self {
        match e {
            PfError::NonFinite { what, .. } => ComponentError::NonPhysical { what },
            PfError::InvalidArg { what } => ComponentError::InvalidArg { what },
            PfError::IndexOob { what, .. } => ComponentError::InvalidArg { what },
        }
    }
}

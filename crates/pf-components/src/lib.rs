//! pf-components: the physical parts of a plant.
//!
//! Provides:
//! - Valves (binary open/closed)
//! - Pumps (speed and on/off)
//! - Pipes (polyline geometry plus a derived flow indicator)
//! - Tanks (bounded reservoirs with temperature)
//!
//! Every state change that an operator should see is reported through a
//! [`pf_core::LogSink`] passed to the mutating call. Components never fail on
//! numeric input; they clamp it. Only constructors validate.

pub mod common;
pub mod error;
pub mod pipe;
pub mod pump;
pub mod tank;
pub mod valve;

// Re-exports
pub use error::{ComponentError, ComponentResult};
pub use pipe::{FlowDirection, Pipe, Point};
pub use pump::Pump;
pub use tank::Tank;
pub use valve::Valve;

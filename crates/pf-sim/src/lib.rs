//! Process simulation engine for a tank plant.
//!
//! Provides:
//! - Segments with the pump/valve interlock
//! - Timed linear fill/drain ramps on an explicit simulation clock
//! - Edge-triggered level and temperature alarms
//! - The fixed-order `tick(dt)`: ramps, temperatures, flow, alarms
//! - Read-only snapshots for renderers
//!
//! The engine talks to the outside world through two channels only: the
//! [`pf_core::LogSink`] injected at construction and [`Plant::snapshot`].

pub mod alarm;
pub mod error;
pub mod layout;
pub mod params;
pub mod plant;
pub mod ramp;
pub mod segment;
pub mod snapshot;

// Re-exports for public API
pub use alarm::{AlarmKind, AlarmLatch};
pub use error::{SimError, SimResult};
pub use layout::{TankLayout, route_pipe};
pub use params::PhysicsParams;
pub use plant::{Plant, PlantBuilder, SegmentSpec, TankSpec, ValveSpec};
pub use ramp::RampAction;
pub use segment::{Segment, ValveSide};
pub use snapshot::{PlantSnapshot, SegmentSnapshot, TankSnapshot, ValveSnapshot};

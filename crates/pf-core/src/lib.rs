//! pf-core: stable foundation for plantflow.
//!
//! Contains:
//! - ids (typed handles for tanks and segments)
//! - numeric (Real + tolerances + sanitising helpers)
//! - sink (the operator log stream contract)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod sink;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PfError, PfResult};
pub use ids::*;
pub use numeric::*;
pub use sink::{LogSink, MemorySink, NullSink, SinkError, guarded, notify};

//! Operator log stream.
//!
//! Every state change the plant wants a human to see is delivered as one
//! line to a [`LogSink`]. Delivery is best-effort: [`notify`] is the single
//! place where sink failures are observed, and it drops them. A sink that
//! panics is treated like one that returned an error.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Reasons a sink may refuse a message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("Sink closed")]
    Closed,

    #[error("Sink lock poisoned")]
    Poisoned,

    #[error("Sink failure: {message}")]
    Other { message: String },
}

impl SinkError {
    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panicked".to_owned()
        };
        SinkError::Other { message }
    }
}

/// Receiver of human-readable log and alarm lines.
///
/// Implementations must not block. Closures `Fn(&str)` are sinks too.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str) -> Result<(), SinkError>;
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) -> Result<(), SinkError> {
        self(message);
        Ok(())
    }
}

/// Deliver `message` to `sink`, mirroring it to `tracing`.
///
/// Sink errors and panics are traced at debug level and dropped.
pub fn notify(sink: &dyn LogSink, message: &str) {
    tracing::info!(target: "plantflow::events", "{message}");
    if let Err(err) = guarded(|| sink.log(message)) {
        tracing::debug!(target: "plantflow::events", %err, "log sink dropped message");
    }
}

/// Run one delivery attempt, turning a panic into [`SinkError::Other`].
pub fn guarded<F>(deliver: F) -> Result<(), SinkError>
where
    F: FnOnce() -> Result<(), SinkError>,
{
    catch_unwind(AssertUnwindSafe(deliver))
        .unwrap_or_else(|payload| Err(SinkError::from_panic(payload)))
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _message: &str) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that keeps every line in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all lines received so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Remove and return all lines received so far.
    pub fn take(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|mut l| std::mem::take(&mut *l))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of received lines containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines
            .lock()
            .map(|l| l.iter().filter(|line| line.contains(needle)).count())
            .unwrap_or(0)
    }
}

impl LogSink for MemorySink {
    fn log(&self, message: &str) -> Result<(), SinkError> {
        let mut lines = self.lines.lock().map_err(|_| SinkError::Poisoned)?;
        lines.push(message.to_owned());
        Ok(())
    }
}

//! Two-state (open/closed) valve.

use pf_core::{LogSink, notify};

/// Binary valve at one end of a pipe segment.
///
/// State only changes through [`Valve::set`], and each real change is
/// reported exactly once.
#[derive(Debug, Clone)]
pub struct Valve {
    id: String,
    description: String,
    open: bool,
}

impl Valve {
    /// Create a closed valve.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            open: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open or close the valve. Returns `true` if the state changed.
    pub fn set(&mut self, open: bool, sink: &dyn LogSink) -> bool {
        if self.open == open {
            return false;
        }
        self.open = open;
        let state = if open { "opened" } else { "closed" };
        notify(
            sink,
            &format!("Valve {} {} ({})", self.id, state, self.description),
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::MemorySink;

    #[test]
    fn starts_closed() {
        let v = Valve::new("T1 (T1-T2)", "pipe T1-T2");
        assert!(!v.is_open());
        assert_eq!(v.id(), "T1 (T1-T2)");
        assert_eq!(v.description(), "pipe T1-T2");
    }

    #[test]
    fn transitions_emit_one_message_each() {
        let sink = MemorySink::new();
        let mut v = Valve::new("T1 (T1-T2)", "pipe T1-T2");

        assert!(v.set(true, &sink));
        assert!(v.is_open());
        assert!(v.set(false, &sink));
        assert!(!v.is_open());

        assert_eq!(
            sink.lines(),
            vec![
                "Valve T1 (T1-T2) opened (pipe T1-T2)",
                "Valve T1 (T1-T2) closed (pipe T1-T2)",
            ]
        );
    }

    #[test]
    fn unchanged_set_is_silent() {
        let sink = MemorySink::new();
        let mut v = Valve::new("V", "d");
        assert!(!v.set(false, &sink));
        v.set(true, &sink);
        assert!(!v.set(true, &sink));
        assert_eq!(sink.len(), 1);
    }
}

//! Timestamped fan-out of the operator log stream.

use chrono::{DateTime, Local};
use pf_core::{LogSink, SinkError, guarded};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// One operator log line with its wall-clock time.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(Local::now(), message)
    }

    pub fn at(timestamp: DateTime<Local>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEvent {
    /// `[HH:MM:SS] message`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

type Subscriber = Arc<dyn Fn(&LogEvent) -> Result<(), SinkError> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct BusInner {
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_id: AtomicU64,
}

/// Fan-out log sink. Clones share the subscriber list.
///
/// Subscribers run on the publishing thread, outside the bus lock, so they
/// may subscribe or unsubscribe from inside a callback.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&LogEvent) -> Result<(), SinkError> + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut subs) = self.inner.subscribers.lock() {
            subs.push((id, Arc::new(subscriber)));
        }
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Ok(mut subs) = self.inner.subscribers.lock() else {
            return false;
        };
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Stamp `message` and hand it to every subscriber.
    ///
    /// Returns how many subscribers accepted it.
    pub fn publish(&self, message: &str) -> usize {
        self.publish_event(&LogEvent::new(message))
    }

    pub fn publish_event(&self, event: &LogEvent) -> usize {
        let subscribers: Vec<Subscriber> = match self.inner.subscribers.lock() {
            Ok(subs) => subs.iter().map(|(_, s)| Arc::clone(s)).collect(),
            Err(_) => return 0,
        };

        let mut delivered = 0;
        for subscriber in subscribers {
            match guarded(|| subscriber(event)) {
                Ok(()) => delivered += 1,
                Err(err) => tracing::debug!(%err, "log subscriber failed"),
            }
        }
        delivered
    }

    /// Subscribe an in-memory recorder.
    pub fn record(&self) -> EventLog {
        let log = EventLog::default();
        let events = Arc::clone(&log.events);
        self.subscribe(move |event| {
            events
                .lock()
                .map(|mut e| e.push(event.clone()))
                .map_err(|_| SinkError::Poisoned)
        });
        log
    }
}

impl LogSink for EventBus {
    fn log(&self, message: &str) -> Result<(), SinkError> {
        self.publish(message);
        Ok(())
    }
}

/// Events captured by [`EventBus::record`].
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl EventLog {
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .map(|e| e.iter().map(|ev| ev.message.clone()).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn display_format() {
        let ts = Local.with_ymd_and_hms(2024, 5, 1, 9, 5, 7).unwrap();
        let event = LogEvent::at(ts, "Pump P12 on");
        assert_eq!(event.to_string(), "[09:05:07] Pump P12 on");
    }

    #[test]
    fn failing_subscriber_does_not_block_others() {
        let bus = EventBus::new();
        bus.subscribe(|_| Err(SinkError::Closed));
        let log = bus.record();

        assert_eq!(bus.publish("hello"), 1);
        assert_eq!(log.messages(), vec!["hello"]);
    }

    #[test]
    fn panicking_subscriber_does_not_block_others() {
        let bus = EventBus::new();
        bus.subscribe(|event| {
            if event.message.starts_with("ALARM") {
                panic!("subscriber bug");
            }
            Ok(())
        });
        let log = bus.record();

        assert_eq!(bus.publish("ALARM: T1 high level"), 1);
        assert_eq!(bus.publish("Pump P12 on"), 2);
        assert_eq!(log.messages(), vec!["ALARM: T1 high level", "Pump P12 on"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let id = bus.subscribe(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        bus.publish("a");
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish("b");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn clones_share_subscribers() {
        let bus = EventBus::new();
        let log = bus.record();
        let sink: Box<dyn LogSink> = Box::new(bus.clone());
        pf_core::notify(sink.as_ref(), "via sink");
        assert_eq!(log.messages(), vec!["via sink"]);
    }

    #[test]
    fn subscriber_may_resubscribe_during_publish() {
        let bus = EventBus::new();
        let inner = bus.clone();
        bus.subscribe(move |_| {
            inner.subscribe(|_| Ok(()));
            Ok(())
        });
        assert_eq!(bus.publish("x"), 1);
        assert_eq!(bus.subscriber_count(), 2);
    }
}

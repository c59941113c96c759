//! Thread-shared plant for hosts with a UI thread and a timer.

use crate::error::{AppError, AppResult};
use pf_core::{LogSink, MemorySink, SegmentId, TankId, guarded};
use pf_sim::{Plant, PlantSnapshot, SimResult, ValveSide};
use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// `Arc<Mutex<Plant>>`: every command, tick and snapshot runs under the lock.
///
/// With [`SharedPlant::new`] the plant's own sink runs under the lock too, so
/// it must not call back into the same `SharedPlant`. Build with
/// [`SharedPlant::deferred`] when it needs to (an [`EventBus`](crate::EventBus)
/// subscriber that issues commands, say).
#[derive(Debug, Clone)]
pub struct SharedPlant {
    inner: Arc<Mutex<Plant>>,
    outbox: Option<Outbox>,
}

/// Lines buffered under the lock, delivered to `sink` after release.
#[derive(Clone)]
struct Outbox {
    buffer: MemorySink,
    sink: Arc<dyn LogSink>,
}

impl fmt::Debug for Outbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outbox")
            .field("pending", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

impl SharedPlant {
    pub fn new(plant: Plant) -> Self {
        Self {
            inner: Arc::new(Mutex::new(plant)),
            outbox: None,
        }
    }

    /// Build the plant around a buffer and hand its lines to `sink` only once
    /// the lock is released.
    ///
    /// Each call's lines stay in order. Calls racing on several threads may
    /// have their batches delivered in either order.
    pub fn deferred(
        sink: impl LogSink + 'static,
        build: impl FnOnce(MemorySink) -> AppResult<Plant>,
    ) -> AppResult<Self> {
        let buffer = MemorySink::new();
        let plant = build(buffer.clone())?;
        Ok(Self {
            inner: Arc::new(Mutex::new(plant)),
            outbox: Some(Outbox {
                buffer,
                sink: Arc::new(sink),
            }),
        })
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut Plant) -> R) -> AppResult<R> {
        let (result, pending) = {
            let mut plant = self.inner.lock().map_err(|_| AppError::LockPoisoned)?;
            let result = f(&mut plant);
            let pending = self
                .outbox
                .as_ref()
                .map(|o| o.buffer.take())
                .unwrap_or_default();
            (result, pending)
        };

        if let Some(outbox) = &self.outbox {
            for line in pending {
                if let Err(err) = guarded(|| outbox.sink.log(&line)) {
                    tracing::debug!(%err, "log sink dropped message");
                }
            }
        }
        Ok(result)
    }

    /// Like [`SharedPlant::with`] for plant calls that can fail.
    fn command(&self, f: impl FnOnce(&mut Plant) -> SimResult<()>) -> AppResult<()> {
        self.with(f)?.map_err(AppError::from)
    }

    pub fn tick(&self, dt: f64) -> AppResult<()> {
        self.with(|p| p.tick(dt))
    }

    pub fn snapshot(&self) -> AppResult<PlantSnapshot> {
        self.with(|p| p.snapshot())
    }

    pub fn fill(&self, tank: TankId, duration_s: f64) -> AppResult<()> {
        self.command(|p| p.fill(tank, duration_s))
    }

    pub fn drain(&self, tank: TankId, duration_s: f64) -> AppResult<()> {
        self.command(|p| p.drain(tank, duration_s))
    }

    pub fn set_target_temperature(&self, tank: TankId, temperature: f64) -> AppResult<()> {
        self.command(|p| p.set_target_temperature(tank, temperature))
    }

    pub fn set_valve(&self, segment: SegmentId, side: ValveSide, open: bool) -> AppResult<()> {
        self.command(|p| p.set_valve(segment, side, open))
    }

    pub fn set_pump_speed(&self, segment: SegmentId, speed: f64) -> AppResult<()> {
        self.command(|p| p.set_pump_speed(segment, speed))
    }

    pub fn force_open_valves(&self, segment: SegmentId) -> AppResult<()> {
        self.command(|p| p.force_open_valves(segment))
    }

    /// Tick on a background thread every `period`, advancing by `dt` each time.
    pub fn spawn_ticker(&self, period: Duration, dt: f64) -> Ticker {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let plant = self.clone();

        let handle = thread::spawn(move || {
            let mut ticks = 0u64;
            loop {
                match stop_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                if let Err(err) = plant.tick(dt) {
                    tracing::error!(%err, "ticker stopped");
                    break;
                }
                ticks += 1;
            }
            ticks
        });

        Ticker {
            stop_tx,
            handle: Some(handle),
        }
    }
}

/// Handle to a running ticker thread. Dropping it stops the thread.
#[derive(Debug)]
pub struct Ticker {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<u64>>,
}

impl Ticker {
    /// Stop and join. Returns the number of ticks performed.
    pub fn stop(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        let _ = self.stop_tx.send(());
        self.handle
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or(0)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//! Bounded fluid reservoir.

use crate::common::EPSILON_VOLUME;
use crate::error::{ComponentError, ComponentResult};
use pf_core::{ensure_finite, non_negative};

/// Tank with fixed capacity, current volume and temperature.
///
/// Invariants:
/// - `0 <= volume <= capacity`
/// - `fill_ratio == volume / capacity`, refreshed on every volume change
#[derive(Debug, Clone)]
pub struct Tank {
    name: String,
    capacity: f64,
    volume: f64,
    fill_ratio: f64,
    temperature: f64,
    target_temperature: f64,
}

impl Tank {
    /// Create an empty tank at `temperature`, with the target equal to it.
    ///
    /// # Errors
    /// Returns error if capacity is not a positive finite number or the
    /// temperature is not finite.
    pub fn new(name: impl Into<String>, capacity: f64, temperature: f64) -> ComponentResult<Self> {
        let capacity = ensure_finite(capacity, "tank capacity")?;
        if capacity <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "tank capacity must be positive",
            });
        }
        let temperature = ensure_finite(temperature, "tank temperature")?;
        Ok(Self {
            name: name.into(),
            capacity,
            volume: 0.0,
            fill_ratio: 0.0,
            temperature,
            target_temperature: temperature,
        })
    }

    /// Start with `volume` already in the tank (clamped to capacity).
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.set_volume(volume);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// `volume / capacity`, in `[0, 1]`.
    pub fn fill_ratio(&self) -> f64 {
        self.fill_ratio
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn target_temperature(&self) -> f64 {
        self.target_temperature
    }

    /// Free volume left before the tank is full.
    pub fn headroom(&self) -> f64 {
        self.capacity - self.volume
    }

    /// Add up to `amount`, capped at the remaining headroom. Returns what was added.
    pub fn add(&mut self, amount: f64) -> f64 {
        let added = non_negative(amount).min(self.headroom());
        self.set_volume(self.volume + added);
        added
    }

    /// Remove up to `amount`, capped at the current volume. Returns what was removed.
    pub fn remove(&mut self, amount: f64) -> f64 {
        let removed = non_negative(amount).min(self.volume);
        self.set_volume(self.volume - removed);
        removed
    }

    /// Overwrite the volume, clamped into `[0, capacity]`.
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, self.capacity)
        };
        self.fill_ratio = self.volume / self.capacity;
    }

    pub fn set_temperature(&mut self, temperature: f64) {
        if temperature.is_finite() {
            self.temperature = temperature;
        }
    }

    pub fn set_target_temperature(&mut self, target: f64) {
        if target.is_finite() {
            self.target_temperature = target;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.volume <= EPSILON_VOLUME
    }

    pub fn is_full(&self) -> bool {
        self.volume >= self.capacity - EPSILON_VOLUME
    }
}

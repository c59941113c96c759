//! Common thresholds for component state.

/// Volume at or below which a tank counts as empty
pub const EPSILON_VOLUME: f64 = 1e-4;

/// Speed change must be strictly smaller than this to be ignored
pub const EPSILON_SPEED: f64 = 1e-6;

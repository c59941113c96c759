//! Pipe geometry and flow indicator.

use crate::error::{ComponentError, ComponentResult};
use serde::{Deserialize, Serialize};

/// 2D layout coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Direction of flow along the polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlowDirection {
    /// First point towards last point (source to destination)
    #[default]
    Forward,
    /// Last point towards first point
    Reverse,
}

impl FlowDirection {
    /// `+1` for forward, `-1` for reverse.
    pub fn sign(self) -> i8 {
        match self {
            FlowDirection::Forward => 1,
            FlowDirection::Reverse => -1,
        }
    }
}

/// Pipe run between two tanks.
///
/// Carries no fluid of its own. `flowing` and `direction` are rewritten by
/// the plant on every tick.
#[derive(Debug, Clone)]
pub struct Pipe {
    points: Vec<Point>,
    flowing: bool,
    direction: FlowDirection,
}

impl Pipe {
    /// Create a pipe from its polyline. Needs at least two finite points.
    pub fn new(points: Vec<Point>) -> ComponentResult<Self> {
        if points.len() < 2 {
            return Err(ComponentError::InvalidArg {
                what: "pipe needs at least two points",
            });
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(ComponentError::NonPhysical {
                what: "pipe point coordinates",
            });
        }
        Ok(Self {
            points,
            flowing: false,
            direction: FlowDirection::Forward,
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_flowing(&self) -> bool {
        self.flowing
    }

    pub fn direction(&self) -> FlowDirection {
        self.direction
    }

    /// Update the flow indicator.
    pub fn set_flow(&mut self, flowing: bool, direction: FlowDirection) {
        self.flowing = flowing;
        self.direction = direction;
    }

    /// Total polyline length.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
            .sum()
    }
}

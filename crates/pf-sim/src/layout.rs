//! Static plant layout and pipe routing.

use pf_components::Point;
use serde::{Deserialize, Serialize};

/// Drop below the source tank before the horizontal run.
pub const PIPE_DROP: f64 = 60.0;

/// Tank rectangle in layout coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for TankLayout {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 140.0,
        }
    }
}

impl TankLayout {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top_center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y)
    }

    pub fn bottom_center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height)
    }
}

/// Route a pipe from the bottom of `from` to the top of `to`.
///
/// Down from the source outlet, across to the midpoint, up to the
/// destination's top edge, across to its inlet. Every bend is 90 degrees.
pub fn route_pipe(from: &TankLayout, to: &TankLayout) -> Vec<Point> {
    let start = from.bottom_center();
    let end = to.top_center();
    let y_low = start.y + PIPE_DROP;
    let x_mid = (start.x + end.x) / 2.0;

    vec![
        start,
        Point::new(start.x, y_low),
        Point::new(x_mid, y_low),
        Point::new(x_mid, end.y),
        end,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_points() {
        let l = TankLayout::new(80.0, 260.0, 100.0, 140.0);
        assert_eq!(l.top_center(), Point::new(130.0, 260.0));
        assert_eq!(l.bottom_center(), Point::new(130.0, 400.0));
    }

    #[test]
    fn route_has_right_angle_bends() {
        let a = TankLayout::new(80.0, 260.0, 100.0, 140.0);
        let b = TankLayout::new(280.0, 260.0, 100.0, 140.0);
        let pts = route_pipe(&a, &b);

        assert_eq!(
            pts,
            vec![
                Point::new(130.0, 400.0),
                Point::new(130.0, 460.0),
                Point::new(230.0, 460.0),
                Point::new(230.0, 260.0),
                Point::new(330.0, 260.0),
            ]
        );
        for w in pts.windows(2) {
            let axis_aligned = w[0].x == w[1].x || w[0].y == w[1].y;
            assert!(axis_aligned);
        }
    }
}

//! Geometry shared by hit-testing and selection.

use serde::Serialize;

/// A pixel point in the calendar's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// A point at `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A pixel rectangle, as measured by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    /// Top edge.
    pub top: f64,
    /// Left edge.
    pub left: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Right edge.
    pub right: f64,
}

impl Bounds {
    /// A rectangle from its four edges.
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        (self.bottom - self.top).abs()
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        (self.right - self.left).abs()
    }

    /// Whether `point` lies inside (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.y >= self.top && point.y <= self.bottom && point.x >= self.left && point.x <= self.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_absolute() {
        let b = Bounds::new(100.0, 10.0, 40.0, 70.0);
        assert_eq!(b.height(), 60.0);
        assert_eq!(b.width(), 60.0);
    }

    #[test]
    fn contains_includes_edges() {
        let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(b.contains(Point::new(10.0, 0.0)));
        assert!(!b.contains(Point::new(10.1, 5.0)));
    }
}

//! Geometric primitives used by pointer input.

use std::ops::{Add, Sub};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Largest per-axis distance to `other`.
    ///
    /// Slop checks in the arena are axis-aligned: a gesture crosses a
    /// threshold as soon as either axis does.
    pub fn max_axis_distance(&self, other: Point) -> f32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Divides both coordinates by `density`, converting pixels to
    /// density-independent units.
    pub fn to_dp(self, density: f32) -> Point {
        if density <= 0.0 || !density.is_finite() {
            return self;
        }
        Point::new(self.x / density, self.y / density)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_axis_distance_uses_largest_axis() {
        let a = Point::new(0.0, 0.0);
        assert_eq!(a.max_axis_distance(Point::new(3.0, -12.0)), 12.0);
        assert_eq!(a.max_axis_distance(Point::new(-7.0, 2.0)), 7.0);
    }

    #[test]
    fn to_dp_ignores_invalid_density() {
        let p = Point::new(20.0, 10.0);
        assert_eq!(p.to_dp(2.0), Point::new(10.0, 5.0));
        assert_eq!(p.to_dp(0.0), p);
        assert_eq!(p.to_dp(f32::NAN), p);
    }
}

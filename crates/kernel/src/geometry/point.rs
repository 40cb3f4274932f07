use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::Sub;

use super::vector::Vec3;

/// A point in the XY plane, the input of the planar triangulators.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Embed in 3D on the `z = 0` plane.
    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, 0.0)
    }

    /// Orthogonal projection onto the XY plane (drops `z`).
    pub fn from_vec3(v: &Vec3) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Lexicographic order: `x` first, ties broken by `y` ascending.
    pub fn lex_cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

impl From<(f64, f64)> for Point2d {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Difference of two points, as a 2D displacement `(dx, dy)`.
impl Sub for Point2d {
    type Output = (f64, f64);
    fn sub(self, rhs: Self) -> Self::Output {
        (self.x - rhs.x, self.y - rhs.y)
    }
}

//! Geometry primitives and the triangle mesh model for surfmesh.

pub mod error;
pub mod geometry;
pub mod mesh;
pub mod traits;

pub use error::{MeshError, MeshResult};
pub use geometry::point::Point2d;
pub use geometry::vector::Vec3;
pub use mesh::{Edge, Mesh, Triangle};
pub use traits::{ImplicitFunction, IsosurfaceExtractor, ParametricSurface};

/// Tolerance configuration for the floating-point predicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Lengths at or below this are treated as zero. Face normals use it
    /// on the cross product, see [`Triangle::normal_with`].
    pub coincidence: f64,
    /// Circumcircle determinants at or below this fraction of the squared
    /// triangle scale mark the triangle as collinear.
    pub collinear: f64,
    /// Triangles with area at or below this are degenerate.
    pub area: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-12,
            collinear: 1e-12,
            area: 1e-14,
        }
    }
}

impl Tolerance {
    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() <= self.coincidence
    }

    pub fn is_degenerate(&self, triangle: &Triangle) -> bool {
        triangle.is_degenerate(self.area)
    }
}

/// Tolerance used where callers cannot pass one, such as the STL writers.
pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}

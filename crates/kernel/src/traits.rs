//! Capability traits for the surfaces the tessellators consume.
//!
//! Plain closures satisfy [`ParametricSurface`] and [`ImplicitFunction`]
//! through blanket impls, so callers rarely need a named type.

use crate::error::MeshResult;
use crate::geometry::vector::Vec3;
use crate::mesh::Mesh;

/// A map `(u, v) -> (x, y, z)`.
pub trait ParametricSurface {
    fn evaluate(&self, u: f64, v: f64) -> Vec3;
}

impl<F> ParametricSurface for F
where
    F: Fn(f64, f64) -> Vec3,
{
    fn evaluate(&self, u: f64, v: f64) -> Vec3 {
        self(u, v)
    }
}

/// A scalar field whose zero level set is the surface.
pub trait ImplicitFunction {
    fn evaluate(&self, point: Vec3) -> f64;
}

impl<F> ImplicitFunction for F
where
    F: Fn(Vec3) -> f64,
{
    fn evaluate(&self, point: Vec3) -> f64 {
        self(point)
    }
}

/// Turns an implicit function into triangles (marching cubes or similar).
///
/// Implementations live outside this workspace; the tessellation crate only
/// consumes the triangles they return.
pub trait IsosurfaceExtractor {
    /// Sample `function` over the box `[lower, upper]` on a grid of
    /// `resolution` cells per axis and return the zero level set.
    fn extract(
        &self,
        function: &dyn ImplicitFunction,
        lower: Vec3,
        upper: Vec3,
        resolution: [usize; 3],
    ) -> MeshResult<Mesh>;
}

//! Parametric surface tessellation on a regular UV grid.

use std::mem;

use surfmesh_kernel::{Mesh, MeshError, MeshResult, ParametricSurface, Triangle, Vec3};
use tracing::{info, instrument};

/// Sampling domain for [`tessellate_parametric`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParametricDomain {
    /// `(u0, u1)`; `u1 < u0` is allowed and samples backwards.
    pub u_range: (f64, f64),
    /// `(v0, v1)`.
    pub v_range: (f64, f64),
    /// Number of cells along `u` (`Nu >= 1`).
    pub u_divisions: usize,
    /// Number of cells along `v` (`Nv >= 1`).
    pub v_divisions: usize,
}

impl ParametricDomain {
    pub fn new(
        u_range: (f64, f64),
        v_range: (f64, f64),
        u_divisions: usize,
        v_divisions: usize,
    ) -> Self {
        Self {
            u_range,
            v_range,
            u_divisions,
            v_divisions,
        }
    }

    /// The unit square `[0, 1] x [0, 1]`.
    pub fn unit(u_divisions: usize, v_divisions: usize) -> Self {
        Self::new((0.0, 1.0), (0.0, 1.0), u_divisions, v_divisions)
    }

    /// Exact number of triangles a tessellation of this domain produces,
    /// saturating at `usize::MAX` for domains [`validate`](Self::validate)
    /// rejects.
    pub fn triangle_count(&self) -> usize {
        self.u_divisions
            .saturating_mul(self.v_divisions)
            .saturating_mul(2)
    }

    /// `(vertices, triangles)` of the tessellation, or `None` when either
    /// count, or the memory it needs, does not fit the address space.
    fn grid_sizes(&self) -> Option<(usize, usize)> {
        let vertices = self
            .u_divisions
            .checked_add(1)?
            .checked_mul(self.v_divisions.checked_add(1)?)?;
        let triangles = self
            .u_divisions
            .checked_mul(self.v_divisions)?
            .checked_mul(2)?;
        let limit = isize::MAX as usize;
        let vertex_bytes = vertices.checked_mul(mem::size_of::<Vec3>())?;
        let triangle_bytes = triangles.checked_mul(mem::size_of::<Triangle>())?;
        (vertex_bytes <= limit && triangle_bytes <= limit).then_some((vertices, triangles))
    }

    /// Reject zero division counts, non-finite ranges and grids too large
    /// to allocate.
    pub fn validate(&self) -> MeshResult<()> {
        if self.u_divisions == 0 || self.v_divisions == 0 {
            return Err(MeshError::Division {
                u_divisions: self.u_divisions,
                v_divisions: self.v_divisions,
            });
        }
        let bounds = [self.u_range.0, self.u_range.1, self.v_range.0, self.v_range.1];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(MeshError::Precondition(format!(
                "parameter ranges must be finite (u = {:?}, v = {:?})",
                self.u_range, self.v_range
            )));
        }
        if self.grid_sizes().is_none() {
            return Err(MeshError::Precondition(format!(
                "{} x {} divisions overflow the address space",
                self.u_divisions, self.v_divisions
            )));
        }
        Ok(())
    }

    fn u_at(&self, i: usize) -> f64 {
        let step = (self.u_range.1 - self.u_range.0) / self.u_divisions as f64;
        self.u_range.0 + i as f64 * step
    }

    fn v_at(&self, j: usize) -> f64 {
        let step = (self.v_range.1 - self.v_range.0) / self.v_divisions as f64;
        self.v_range.0 + j as f64 * step
    }
}

/// Tessellate a parametric surface by sampling on a UV grid.
///
/// Every grid cell `(i, j)` is split along the same diagonal into
/// `(V[i,j], V[i+1,j], V[i,j+1])` and `(V[i+1,j], V[i+1,j+1], V[i,j+1])`.
/// The split never adapts to curvature, so strongly twisted parametrizations
/// can show folded-looking quads.
///
/// Returns exactly `2 * Nu * Nv` triangles. The domain is validated before
/// the surface is evaluated even once.
#[instrument(skip(surface))]
pub fn tessellate_parametric<S>(surface: &S, domain: &ParametricDomain) -> MeshResult<Mesh>
where
    S: ParametricSurface + ?Sized,
{
    domain.validate()?;

    let (nu, nv) = (domain.u_divisions, domain.v_divisions);
    let stride = nv + 1;

    // Row-major grid: vertex (i, j) lives at i * (nv + 1) + j.
    let mut grid: Vec<Vec3> = Vec::with_capacity((nu + 1) * stride);
    for i in 0..=nu {
        let u = domain.u_at(i);
        for j in 0..=nv {
            grid.push(surface.evaluate(u, domain.v_at(j)));
        }
    }

    let at = |i: usize, j: usize| grid[i * stride + j];
    let mut mesh = Mesh::with_capacity(domain.triangle_count());
    for i in 0..nu {
        for j in 0..nv {
            mesh.push(Triangle::new(at(i, j), at(i + 1, j), at(i, j + 1)));
            mesh.push(Triangle::new(at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)));
        }
    }

    info!(
        u_divisions = nu,
        v_divisions = nv,
        triangles = mesh.triangle_count(),
        "tessellated parametric surface"
    );
    Ok(mesh)
}

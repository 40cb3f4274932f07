//! Summary statistics for a finished mesh.

use std::fmt;

use surfmesh_kernel::{Mesh, Tolerance, Vec3};

/// Counts, area and bounds of a mesh, for logs and demo output.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshReport {
    pub triangle_count: usize,
    /// Triangles whose area is at or below [`Tolerance::area`].
    pub degenerate_count: usize,
    pub surface_area: f64,
    /// `(min, max)` corners, `None` for an empty mesh.
    pub bounds: Option<(Vec3, Vec3)>,
}

impl MeshReport {
    pub fn from_mesh(mesh: &Mesh, tol: &Tolerance) -> Self {
        Self {
            triangle_count: mesh.triangle_count(),
            degenerate_count: mesh.iter().filter(|t| tol.is_degenerate(t)).count(),
            surface_area: mesh.surface_area(),
            bounds: mesh.bounds(),
        }
    }

    /// True when the mesh has triangles and none of them are degenerate.
    pub fn is_clean(&self) -> bool {
        self.triangle_count > 0 && self.degenerate_count == 0
    }
}

impl fmt::Display for MeshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} triangles ({} degenerate), area {:.4}",
            self.triangle_count, self.degenerate_count, self.surface_area
        )?;
        if let Some((lo, hi)) = self.bounds {
            write!(
                f,
                ", bounds [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
                lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
            )?;
        }
        Ok(())
    }
}

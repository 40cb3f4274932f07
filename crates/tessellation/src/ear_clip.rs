//! Ear-clipping triangulation of simple polygons.

use surfmesh_kernel::geometry::predicates::{point_in_triangle_closed, signed_area, turn};
use surfmesh_kernel::{Mesh, MeshError, MeshResult, Point2d, Triangle};
use tracing::{debug, info, instrument};

/// Triangulate a simple polygon given as an ordered vertex ring.
///
/// The ring is implicitly closed (do not repeat the first vertex). Either
/// winding is accepted; clockwise rings are reversed first, so every emitted
/// triangle winds counter-clockwise and has a `+z` normal.
///
/// A simple polygon with `n` vertices yields exactly `n - 2` triangles whose
/// areas sum to the polygon area. Simplicity is not checked up front. If a
/// scan over the remaining ring finds no ear, the input was not simple and
/// [`MeshError::Precondition`] is returned.
#[instrument(skip(polygon), fields(vertices = polygon.len()))]
pub fn triangulate_polygon(polygon: &[Point2d]) -> MeshResult<Mesh> {
    if polygon.len() < 3 {
        return Err(MeshError::Precondition(format!(
            "ear clipping needs at least 3 vertices, got {}",
            polygon.len()
        )));
    }
    if let Some(bad) = polygon.iter().find(|p| !p.is_finite()) {
        return Err(MeshError::Precondition(format!(
            "non-finite polygon vertex ({}, {})",
            bad.x, bad.y
        )));
    }

    let mut ring = polygon.to_vec();
    if signed_area(&ring) < 0.0 {
        debug!("reversing clockwise ring");
        ring.reverse();
    }

    let mut mesh = Mesh::with_capacity(polygon.len() - 2);
    while ring.len() > 3 {
        let ear = find_ear(&ring).ok_or_else(|| {
            MeshError::Precondition(format!(
                "no ear among {} remaining vertices; polygon is not simple",
                ring.len()
            ))
        })?;
        let (prev, next) = neighbours(ring.len(), ear);
        mesh.push(Triangle::from_points_2d(&ring[prev], &ring[ear], &ring[next]));
        ring.remove(ear);
    }
    mesh.push(Triangle::from_points_2d(&ring[0], &ring[1], &ring[2]));

    info!(triangles = mesh.triangle_count(), "clipped polygon");
    Ok(mesh)
}

fn neighbours(len: usize, i: usize) -> (usize, usize) {
    ((i + len - 1) % len, (i + 1) % len)
}

/// Index of the first ear of a counter-clockwise ring, if any.
fn find_ear(ring: &[Point2d]) -> Option<usize> {
    (0..ring.len()).find(|&i| is_ear(ring, i))
}

fn is_ear(ring: &[Point2d], i: usize) -> bool {
    let (prev, next) = neighbours(ring.len(), i);
    let (a, b, c) = (&ring[prev], &ring[i], &ring[next]);
    if turn(a, b, c) < 0.0 {
        return false;
    }
    ring.iter()
        .enumerate()
        .filter(|(j, p)| *j != prev && *j != i && *j != next && **p != *a && **p != *b && **p != *c)
        .all(|(_, p)| !point_in_triangle_closed(p, a, b, c))
}

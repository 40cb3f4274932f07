//! Marching tetrahedra, a small isosurface extractor for the demo scenes.
//!
//! Each grid cube is split into six tetrahedra around its main diagonal.
//! Neighbouring cubes then cut their shared face along the same diagonal,
//! so the surface closes up without the ambiguous cases of marching cubes.

use surfmesh_kernel::{
    ImplicitFunction, IsosurfaceExtractor, Mesh, MeshError, MeshResult, Triangle, Vec3,
};

/// Corners of a cube indexed by bits: 1 is `+x`, 2 is `+y`, 4 is `+z`.
const CUBE_TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 1, 3, 7],
    [0, 3, 2, 7],
    [0, 2, 6, 7],
    [0, 6, 4, 7],
    [0, 4, 5, 7],
    [0, 5, 1, 7],
];

/// A lattice corner and the field value there.
type Sample = (Vec3, f64);

/// Extracts the zero level set, with triangles wound so their normals
/// point towards positive values (outward for a signed distance).
#[derive(Debug, Clone, Copy, Default)]
pub struct MarchingTetrahedra;

impl IsosurfaceExtractor for MarchingTetrahedra {
    fn extract(
        &self,
        function: &dyn ImplicitFunction,
        lower: Vec3,
        upper: Vec3,
        resolution: [usize; 3],
    ) -> MeshResult<Mesh> {
        let [nx, ny, nz] = resolution;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(MeshError::Precondition(format!(
                "resolution {:?} has an empty axis",
                resolution
            )));
        }
        let step = Vec3::new(
            (upper.x - lower.x) / nx as f64,
            (upper.y - lower.y) / ny as f64,
            (upper.z - lower.z) / nz as f64,
        );
        let position = |i: usize, j: usize, k: usize| {
            Vec3::new(
                lower.x + i as f64 * step.x,
                lower.y + j as f64 * step.y,
                lower.z + k as f64 * step.z,
            )
        };

        // Every corner is sampled once, so shared edges interpolate the
        // same values on both sides.
        let index = |i: usize, j: usize, k: usize| (i * (ny + 1) + j) * (nz + 1) + k;
        let mut values = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
        for i in 0..=nx {
            for j in 0..=ny {
                for k in 0..=nz {
                    let p = position(i, j, k);
                    let value = function.evaluate(p);
                    if !value.is_finite() {
                        return Err(MeshError::Extractor(format!(
                            "field is {} at ({}, {}, {})",
                            value, p.x, p.y, p.z
                        )));
                    }
                    values.push(value);
                }
            }
        }

        let mut mesh = Mesh::new();
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    let cube: [Sample; 8] = std::array::from_fn(|corner| {
                        let ci = i + (corner & 1);
                        let cj = j + ((corner >> 1) & 1);
                        let ck = k + (corner >> 2);
                        (position(ci, cj, ck), values[index(ci, cj, ck)])
                    });
                    for tet in CUBE_TETRAHEDRA {
                        polygonize(&mut mesh, tet.map(|c| cube[c]));
                    }
                }
            }
        }
        Ok(mesh)
    }
}

/// Emit the piece of surface crossing one tetrahedron. Zero counts as
/// outside, which keeps every interpolation well defined.
fn polygonize(mesh: &mut Mesh, tet: [Sample; 4]) {
    let (inside, outside): (Vec<Sample>, Vec<Sample>) =
        tet.into_iter().partition(|&(_, value)| value < 0.0);
    if inside.is_empty() || outside.is_empty() {
        return;
    }

    let outward = centroid(&outside) - centroid(&inside);
    let mut emit = |a: Vec3, b: Vec3, c: Vec3| {
        let triangle = Triangle::new(a, b, c);
        if triangle.cross().dot(&outward) < 0.0 {
            mesh.push(triangle.flipped());
        } else {
            mesh.push(triangle);
        }
    };

    match (inside.as_slice(), outside.as_slice()) {
        ([n], [p0, p1, p2]) => emit(cut(n, p0), cut(n, p1), cut(n, p2)),
        ([n0, n1, n2], [p]) => emit(cut(n0, p), cut(n1, p), cut(n2, p)),
        ([n0, n1], [p0, p1]) => {
            let quad = [cut(n0, p0), cut(n0, p1), cut(n1, p1), cut(n1, p0)];
            emit(quad[0], quad[1], quad[2]);
            emit(quad[0], quad[2], quad[3]);
        }
        _ => {}
    }
}

/// Zero crossing on the edge from an inside sample to an outside one.
fn cut(inside: &Sample, outside: &Sample) -> Vec3 {
    let (a, va) = *inside;
    let (b, vb) = *outside;
    a + (b - a) * (va / (va - vb))
}

fn centroid(samples: &[Sample]) -> Vec3 {
    let sum = samples.iter().fold(Vec3::ZERO, |acc, (p, _)| acc + *p);
    sum / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::f64::consts::PI;
    use surfmesh_kernel::Edge;

    use crate::surfaces::{sphere_field, torus_field};

    fn unit_sphere(resolution: usize) -> Mesh {
        let bound = Vec3::new(1.3, 1.3, 1.3);
        MarchingTetrahedra
            .extract(&sphere_field(1.0), -bound, bound, [resolution; 3])
            .unwrap()
    }

    #[test]
    fn test_sphere_vertices_sit_on_surface() {
        let mesh = unit_sphere(24);
        assert!(!mesh.is_empty());
        for t in &mesh {
            for v in t.vertices() {
                assert!((v.length() - 1.0).abs() < 1e-2, "vertex {:?} off the sphere", v);
            }
        }
        let area = mesh.surface_area();
        assert!((area - 4.0 * PI).abs() / (4.0 * PI) < 0.1, "area {}", area);
    }

    #[test]
    fn test_sphere_normals_point_outward() {
        for t in &unit_sphere(16) {
            let centroid = t.vertices().iter().fold(Vec3::ZERO, |acc, v| acc + *v) / 3.0;
            assert!(t.area() < 1e-12 || t.cross().dot(&centroid) > 0.0, "{:?} faces inward", t);
        }
    }

    #[test]
    fn test_torus_is_closed() {
        let field = torus_field(1.0, 0.4);
        let lower = Vec3::new(-1.55, -1.55, -0.55);
        let upper = Vec3::new(1.55, 1.55, 0.55);
        let mesh = MarchingTetrahedra
            .extract(&field, lower, upper, [30, 30, 11])
            .unwrap();

        let mut uses: HashMap<Edge, usize> = HashMap::new();
        for t in &mesh {
            for edge in t.edges() {
                *uses.entry(edge).or_default() += 1;
            }
        }
        assert!(uses.values().all(|&n| n == 2), "surface has open or shared edges");
    }

    #[test]
    fn test_box_without_crossing_is_empty() {
        let mesh = MarchingTetrahedra
            .extract(&sphere_field(1.0), Vec3::new(2.0, 2.0, 2.0), Vec3::new(3.0, 3.0, 3.0), [4; 3])
            .unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_rejects_empty_axis_and_bad_values() {
        let lower = -Vec3::new(1.0, 1.0, 1.0);
        let upper = Vec3::new(1.0, 1.0, 1.0);
        let err = MarchingTetrahedra
            .extract(&sphere_field(0.5), lower, upper, [4, 0, 4])
            .unwrap_err();
        assert!(matches!(err, MeshError::Precondition(_)));

        let hole = |p: Vec3| 1.0 / p.length() - 2.0;
        let err = MarchingTetrahedra.extract(&hole, lower, upper, [4; 3]).unwrap_err();
        assert!(matches!(err, MeshError::Extractor(_)));
    }
}

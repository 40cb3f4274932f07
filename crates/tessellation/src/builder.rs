//! MeshBuilder: chain several tessellations into one mesh.
//!
//! Each step appends its triangles in call order. The first failing step is
//! remembered and every later step is skipped, so a chain can be written
//! without checking each call and the error surfaces once at [`MeshBuilder::build`].

use surfmesh_kernel::{
    ImplicitFunction, IsosurfaceExtractor, Mesh, MeshError, MeshResult, ParametricSurface, Point2d,
    Vec3,
};
use tracing::{debug, warn};

use crate::delaunay::triangulate_points;
use crate::ear_clip::triangulate_polygon;
use crate::parametric::{tessellate_parametric, ParametricDomain};

/// A fluent accumulator for meshes from several sources.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    mesh: Mesh,
    error: Option<MeshError>,
    steps: usize,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tessellated parametric surface.
    pub fn parametric<S>(self, surface: &S, domain: &ParametricDomain) -> Self
    where
        S: ParametricSurface + ?Sized,
    {
        self.step("parametric", || tessellate_parametric(surface, domain))
    }

    /// Append the Delaunay triangulation of a point set.
    pub fn points(self, points: &[Point2d]) -> Self {
        self.step("delaunay", || triangulate_points(points))
    }

    /// Append the ear-clipped triangulation of a simple polygon.
    pub fn polygon(self, polygon: &[Point2d]) -> Self {
        self.step("ear clipping", || triangulate_polygon(polygon))
    }

    /// Append the zero level set of `function` inside the box `[lower, upper]`,
    /// extracted by `extractor` on a `resolution` grid.
    ///
    /// The box and resolution are checked before the extractor runs.
    pub fn implicit(
        self,
        extractor: &dyn IsosurfaceExtractor,
        function: &dyn ImplicitFunction,
        lower: Vec3,
        upper: Vec3,
        resolution: [usize; 3],
    ) -> Self {
        self.step("implicit", || {
            check_extraction_box(lower, upper, resolution)?;
            extractor.extract(function, lower, upper, resolution)
        })
    }

    /// Append an already built mesh.
    pub fn append(self, mesh: Mesh) -> Self {
        self.step("append", || Ok(mesh))
    }

    /// The first error met, if any.
    pub fn error(&self) -> Option<&MeshError> {
        self.error.as_ref()
    }

    /// Triangles accumulated so far.
    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Finish the chain: the accumulated mesh, or the first error.
    pub fn build(self) -> MeshResult<Mesh> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.mesh),
        }
    }

    fn step(mut self, kind: &str, run: impl FnOnce() -> MeshResult<Mesh>) -> Self {
        if self.error.is_some() {
            debug!(kind, "skipping step after earlier failure");
            return self;
        }
        self.steps += 1;
        match run() {
            Ok(mesh) => {
                debug!(kind, step = self.steps, triangles = mesh.triangle_count(), "appended");
                self.mesh.append(mesh);
            }
            Err(err) => {
                warn!(kind, step = self.steps, error = %err, "mesh builder step failed");
                self.error = Some(err);
            }
        }
        self
    }
}

fn check_extraction_box(lower: Vec3, upper: Vec3, resolution: [usize; 3]) -> MeshResult<()> {
    if resolution.contains(&0) {
        return Err(MeshError::Precondition(format!(
            "extraction resolution must be at least 1 per axis, got {:?}",
            resolution
        )));
    }
    let ordered = lower.is_finite()
        && upper.is_finite()
        && lower.x < upper.x
        && lower.y < upper.y
        && lower.z < upper.z;
    if !ordered {
        return Err(MeshError::Precondition(format!(
            "extraction box must satisfy lower < upper on every axis (lower = {:?}, upper = {:?})",
            lower, upper
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use surfmesh_kernel::Triangle;

    /// Emits one triangle spanning the box diagonal face and counts calls.
    struct CountingExtractor {
        calls: Cell<usize>,
    }

    impl CountingExtractor {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl IsosurfaceExtractor for CountingExtractor {
        fn extract(
            &self,
            function: &dyn ImplicitFunction,
            lower: Vec3,
            upper: Vec3,
            _resolution: [usize; 3],
        ) -> MeshResult<Mesh> {
            self.calls.set(self.calls.get() + 1);
            if function.evaluate(lower) * function.evaluate(upper) > 0.0 {
                return Err(MeshError::Extractor("no sign change in box".into()));
            }
            let corner = Vec3::new(upper.x, lower.y, lower.z);
            Ok(Mesh::from_triangles(vec![Triangle::new(lower, corner, upper)]))
        }
    }

    fn square() -> Vec<Point2d> {
        vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(1.0, 1.0),
            Point2d::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_chain_appends_in_order() {
        let plane = |u: f64, v: f64| Vec3::new(u, v, 1.0);
        let mesh = MeshBuilder::new()
            .parametric(&plane, &ParametricDomain::unit(2, 2))
            .points(&square())
            .polygon(&square())
            .build()
            .unwrap();
        assert_eq!(mesh.triangle_count(), 8 + 2 + 2);
        // Parametric triangles come first and sit on z = 1.
        assert!(mesh.triangles()[..8].iter().all(|t| t.vertex(0).z == 1.0));
        assert!(mesh.triangles()[8..].iter().all(|t| t.vertex(0).z == 0.0));
    }

    #[test]
    fn test_first_error_is_latched() {
        let plane = |u: f64, v: f64| Vec3::new(u, v, 0.0);
        let extractor = CountingExtractor::new();
        let sphere = |p: Vec3| p.length() - 1.0;
        let builder = MeshBuilder::new()
            .polygon(&square())
            .parametric(&plane, &ParametricDomain::unit(0, 4))
            .points(&[])
            .implicit(&extractor, &sphere, Vec3::new(-2.0, -2.0, -2.0), Vec3::ZERO, [4, 4, 4]);
        assert_eq!(extractor.calls.get(), 0);
        assert_eq!(builder.triangle_count(), 2);
        assert_eq!(
            builder.build().unwrap_err(),
            MeshError::Division {
                u_divisions: 0,
                v_divisions: 4
            }
        );
    }

    #[test]
    fn test_implicit_delegates_to_extractor() {
        let extractor = CountingExtractor::new();
        let sphere = |p: Vec3| p.length() - 1.0;
        let mesh = MeshBuilder::new()
            .implicit(&extractor, &sphere, Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0), [8, 8, 8])
            .build()
            .unwrap();
        assert_eq!(extractor.calls.get(), 1);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_implicit_surfaces_extractor_failure() {
        let extractor = CountingExtractor::new();
        let far = |p: Vec3| p.length() + 1.0;
        let err = MeshBuilder::new()
            .implicit(&extractor, &far, Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0), [2, 2, 2])
            .build()
            .unwrap_err();
        assert!(matches!(err, MeshError::Extractor(_)));
    }

    #[test]
    fn test_implicit_checks_box_before_extracting() {
        let extractor = CountingExtractor::new();
        let sphere = |p: Vec3| p.length() - 1.0;

        let zero_res = MeshBuilder::new()
            .implicit(&extractor, &sphere, Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0), [4, 0, 4])
            .build();
        assert!(matches!(zero_res, Err(MeshError::Precondition(_))));

        let inverted = MeshBuilder::new()
            .implicit(&extractor, &sphere, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 1.0), [4, 4, 4])
            .build();
        assert!(matches!(inverted, Err(MeshError::Precondition(_))));

        assert_eq!(extractor.calls.get(), 0);
    }

    #[test]
    fn test_empty_builder_is_empty_mesh() {
        let mesh = MeshBuilder::new().build().unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_append_existing_mesh() {
        let part = crate::ear_clip::triangulate_polygon(&square()).unwrap();
        let mesh = MeshBuilder::new().append(part.clone()).append(part).build().unwrap();
        assert_eq!(mesh.triangle_count(), 4);
    }
}

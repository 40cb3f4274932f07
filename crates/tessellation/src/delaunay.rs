//! Incremental Delaunay triangulation of planar point sets.
//!
//! Bowyer–Watson with a sweep in `x`: points are inserted in lexicographic
//! order, so a triangle whose circumcircle lies entirely to the left of the
//! current point can never be invalidated again and is finalized early.
//!
//! The cavity for each point is grown through edge adjacency from the
//! triangle containing it, so it is always one connected region whose
//! boundary every new triangle can see. Testing every circumcircle in
//! isolation is not enough: on cocircular input rounding decides those
//! tests inconsistently and the new fan overlaps kept triangles.

use std::collections::{HashMap, HashSet};

use surfmesh_kernel::geometry::predicates::{circumcircle, turn, Circle};
use surfmesh_kernel::{Edge, Mesh, MeshError, MeshResult, Point2d, Tolerance, Triangle, Vec3};
use tracing::{debug, info, instrument, warn};

/// Super-triangle vertices sit this many margins away from the center of
/// the input bounding box. Large enough that no super vertex falls inside
/// the circumcircle of a triangle on the convex hull of typical input.
const SUPER_TRIANGLE_REACH: f64 = 40.0;

/// Extra margin added to the bounding-box span, which also keeps the super
/// triangle non-degenerate when every input point coincides.
const SUPER_TRIANGLE_MARGIN: f64 = 2.0;

/// Triangulate a planar point set with the default [`Tolerance`].
///
/// See [`triangulate_points_with`].
pub fn triangulate_points(points: &[Point2d]) -> MeshResult<Mesh> {
    triangulate_points_with(points, &Tolerance::default())
}

/// Triangulate a planar point set.
///
/// Output triangles lie on `z = 0`, wind counter-clockwise (normal `+z`) and
/// have no input point strictly inside their circumcircle, up to
/// floating-point error. Input edges are not preserved. Points sharing one
/// circle are fine: the result is one of the valid Delaunay triangulations
/// and never overlaps itself.
///
/// Exact duplicates are accepted and collapsed to a single point. Triangles
/// whose circumcircle is undefined (collinear corners) never absorb a point
/// and are dropped before returning.
///
/// # Known limitation
///
/// The super triangle has a fixed size relative to the input bounds. When
/// a hull edge and a nearby input point are almost collinear, their
/// circumcircle can be large enough to swallow a super vertex, and the thin
/// sliver between that edge and the point is then left uncovered. The
/// missing area is tiny next to the hull area, but the output is not
/// guaranteed to cover the convex hull exactly in that case.
///
/// # Errors
///
/// - [`MeshError::Precondition`] for fewer than three points or non-finite
///   coordinates.
/// - [`MeshError::DegenerateGeometry`] when no proper triangle exists, i.e.
///   all points are collinear or coincident.
#[instrument(skip(points, tol), fields(points = points.len()))]
pub fn triangulate_points_with(points: &[Point2d], tol: &Tolerance) -> MeshResult<Mesh> {
    if points.len() < 3 {
        return Err(MeshError::Precondition(format!(
            "Delaunay triangulation needs at least 3 points, got {}",
            points.len()
        )));
    }
    if let Some(p) = points.iter().find(|p| !p.is_finite()) {
        return Err(MeshError::Precondition(format!(
            "point ({}, {}) is not finite",
            p.x, p.y
        )));
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(Point2d::lex_cmp);
    sorted.dedup();
    if sorted.len() < points.len() {
        debug!(duplicates = points.len() - sorted.len(), "ignoring duplicate points");
    }
    if sorted.len() < 3 {
        return Err(MeshError::DegenerateGeometry(format!(
            "only {} distinct points; no triangle can be formed",
            sorted.len()
        )));
    }

    let bounds = Bounds::from_points(&sorted);
    let mut sweep = Sweep::new(bounds.super_triangle(), tol);
    for p in &sorted {
        sweep.insert(p)?;
    }
    debug!(
        finalized_early = sweep.finalized_early,
        widened = sweep.widened,
        "sweep complete, trimming super triangle"
    );

    let mut degenerate = 0usize;
    let mesh: Mesh = sweep
        .into_candidates()
        .filter(|c| bounds.contains_triangle(&c.triangle))
        .filter(|c| {
            let keep = c.circle.is_some() && !tol.is_degenerate(&c.triangle);
            if !keep {
                degenerate += 1;
            }
            keep
        })
        .map(|c| c.triangle)
        .collect();

    if degenerate > 0 {
        warn!(degenerate, "dropped degenerate triangles");
    }
    if mesh.is_empty() {
        return Err(MeshError::DegenerateGeometry(
            "point set is collinear or coincident; no triangle can be formed".into(),
        ));
    }

    info!(triangles = mesh.triangle_count(), "Delaunay triangulation complete");
    Ok(mesh)
}

/// A working triangle with its circumcircle computed once.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    triangle: Triangle,
    circle: Option<Circle>,
}

impl Candidate {
    fn new(triangle: Triangle, tol: &Tolerance) -> Self {
        let [a, b, c] = triangle.points_2d();
        Self {
            triangle,
            circle: circumcircle(&a, &b, &c, tol),
        }
    }

    /// Smallest signed distance from `p` to the triangle's edge lines,
    /// positive inside. The triangle containing `p` maximizes it.
    fn containment(&self, p: &Point2d) -> f64 {
        let [a, b, c] = self.triangle.points_2d();
        [(a, b), (b, c), (c, a)]
            .iter()
            .map(|(from, to)| turn(from, to, p) / from.distance_to(to))
            .fold(f64::INFINITY, f64::min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Still in the sweep; may be removed by a later point.
    Active,
    /// Circumcircle lies left of the sweep line.
    Finalized,
    Removed,
}

/// Triangulation under construction.
///
/// Triangles are never moved, only marked, so their indices stay valid in
/// the edge adjacency map. Finalized triangles keep their adjacency: a
/// cavity may still need to widen into one (see [`Sweep::cavity`]).
struct Sweep<'t> {
    tol: &'t Tolerance,
    slots: Vec<(Candidate, State)>,
    /// Indices of active slots, in creation order.
    active: Vec<usize>,
    /// Triangles on either side of each edge.
    adjacency: HashMap<Edge, Vec<usize>>,
    finalized_early: usize,
    widened: usize,
}

impl<'t> Sweep<'t> {
    fn new(super_triangle: Triangle, tol: &'t Tolerance) -> Self {
        let mut sweep = Self {
            tol,
            slots: Vec::new(),
            active: Vec::new(),
            adjacency: HashMap::new(),
            finalized_early: 0,
            widened: 0,
        };
        sweep.add(super_triangle);
        sweep
    }

    fn add(&mut self, triangle: Triangle) {
        let id = self.slots.len();
        for edge in triangle.edges() {
            self.adjacency.entry(edge).or_default().push(id);
        }
        self.slots.push((Candidate::new(triangle, self.tol), State::Active));
        self.active.push(id);
    }

    fn remove(&mut self, id: usize) {
        self.slots[id].1 = State::Removed;
        for edge in self.slots[id].0.triangle.edges() {
            if let Some(owners) = self.adjacency.get_mut(&edge) {
                owners.retain(|&owner| owner != id);
                if owners.is_empty() {
                    self.adjacency.remove(&edge);
                }
            }
        }
    }

    /// The triangle across `edge` from `id`, if any.
    fn neighbour(&self, id: usize, edge: &Edge) -> Option<usize> {
        self.adjacency
            .get(edge)?
            .iter()
            .copied()
            .find(|&owner| owner != id)
    }

    fn insert(&mut self, p: &Point2d) -> MeshResult<()> {
        let mut still_active = Vec::with_capacity(self.active.len());
        for id in self.active.drain(..) {
            match self.slots[id].0.circle {
                Some(circle) if p.x > circle.max_x() => {
                    self.slots[id].1 = State::Finalized;
                    self.finalized_early += 1;
                }
                _ => still_active.push(id),
            }
        }
        self.active = still_active;

        let cavity = self.cavity(p)?;
        let boundary = cavity_boundary(&self.edges_of(&cavity));
        for &id in &cavity {
            self.remove(id);
        }
        self.active.retain(|&id| self.slots[id].1 == State::Active);

        let apex = p.to_vec3();
        for edge in boundary {
            let (a, b) = edge.endpoints();
            self.add(Triangle::new(a, b, apex));
        }
        Ok(())
    }

    /// Triangles to remove before inserting `p`.
    ///
    /// Flood fill from the active triangle containing `p`, crossing an edge
    /// only when the triangle behind it has `p` strictly inside its
    /// circumcircle. The region is then widened across any boundary edge
    /// that does not face `p`, so every new triangle winds counter-clockwise
    /// with positive area.
    fn cavity(&mut self, p: &Point2d) -> MeshResult<Vec<usize>> {
        let seed = self
            .active
            .iter()
            .copied()
            .map(|id| (id, self.slots[id].0.containment(p)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
            .ok_or_else(|| {
                MeshError::DegenerateGeometry(format!(
                    "no open triangle left for point ({}, {})",
                    p.x, p.y
                ))
            })?;

        let mut cavity = vec![seed];
        let mut members = HashSet::from([seed]);
        let mut stack = vec![seed];
        while let Some(id) = stack.pop() {
            for edge in self.slots[id].0.triangle.edges() {
                let Some(next) = self.neighbour(id, &edge) else {
                    continue;
                };
                let (candidate, state) = &self.slots[next];
                let absorbs = *state == State::Active
                    && candidate.circle.is_some_and(|c| c.contains_strictly(p));
                if absorbs && members.insert(next) {
                    cavity.push(next);
                    stack.push(next);
                }
            }
        }

        loop {
            let boundary = cavity_boundary(&self.edges_of(&cavity));
            let Some(hidden) = boundary.into_iter().find(|edge| !faces(edge, p)) else {
                break;
            };
            let outside = self
                .adjacency
                .get(&hidden)
                .and_then(|owners| owners.iter().copied().find(|o| !members.contains(o)))
                .ok_or_else(|| {
                    MeshError::DegenerateGeometry(format!(
                        "cavity around ({}, {}) reached the super triangle",
                        p.x, p.y
                    ))
                })?;
            members.insert(outside);
            cavity.push(outside);
            self.widened += 1;
        }

        Ok(cavity)
    }

    fn edges_of(&self, ids: &[usize]) -> Vec<Edge> {
        ids.iter()
            .flat_map(|&id| self.slots[id].0.triangle.edges())
            .collect()
    }

    /// Every triangle still standing, in creation order.
    fn into_candidates(self) -> impl Iterator<Item = Candidate> {
        self.slots
            .into_iter()
            .filter(|(_, state)| *state != State::Removed)
            .map(|(candidate, _)| candidate)
    }
}

/// Whether `p` lies strictly left of the directed edge.
fn faces(edge: &Edge, p: &Point2d) -> bool {
    let (a, b) = edge.endpoints();
    turn(&Point2d::from_vec3(&a), &Point2d::from_vec3(&b), p) > 0.0
}

/// Edges that bound the cavity: those contributed by exactly one removed
/// triangle. Shared edges are interior and cancel out. First-seen order is
/// kept so the output does not depend on hash iteration order.
fn cavity_boundary(bad_edges: &[Edge]) -> Vec<Edge> {
    let mut counts: HashMap<Edge, usize> = HashMap::with_capacity(bad_edges.len());
    for edge in bad_edges {
        *counts.entry(*edge).or_default() += 1;
    }
    bad_edges
        .iter()
        .filter(|e| counts[*e] == 1)
        .copied()
        .collect()
}


/// Axis-aligned bounds of the input points.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: Point2d,
    max: Point2d,
}

impl Bounds {
    fn from_points(points: &[Point2d]) -> Self {
        let mut min = Point2d::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2d::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Self { min, max }
    }

    fn contains(&self, v: &Vec3) -> bool {
        v.x >= self.min.x && v.x <= self.max.x && v.y >= self.min.y && v.y <= self.max.y
    }

    fn contains_triangle(&self, t: &Triangle) -> bool {
        t.vertices().iter().all(|v| self.contains(v))
    }

    /// Counter-clockwise triangle strictly containing the bounds.
    ///
    /// Its incircle is centered on the bounds and has radius
    /// `REACH / 2 * (span + MARGIN)`, which exceeds the half-diagonal.
    fn super_triangle(&self) -> Triangle {
        let cx = 0.5 * (self.min.x + self.max.x);
        let cy = 0.5 * (self.min.y + self.max.y);
        let span = (self.max.x - self.min.x).max(self.max.y - self.min.y) + SUPER_TRIANGLE_MARGIN;
        let reach = SUPER_TRIANGLE_REACH * span;
        let half_sqrt3 = 0.5 * 3.0_f64.sqrt();

        Triangle::new(
            Vec3::new(cx - half_sqrt3 * reach, cy - 0.5 * reach, 0.0),
            Vec3::new(cx + half_sqrt3 * reach, cy - 0.5 * reach, 0.0),
            Vec3::new(cx, cy + reach, 0.0),
        )
    }
}

//! Triangle soup mesh model.
//!
//! Each [`Triangle`] owns copies of its three vertices. Two triangles that
//! share an edge store numerically equal but independent vertex values, so
//! nothing a caller does to one triangle can move a corner of another.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point2d;
use crate::geometry::vector::Vec3;
use crate::Tolerance;

/// Three ordered vertices. Winding `0 -> 1 -> 2` fixes the normal direction
/// by the right-hand rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    vertices: [Vec3; 3],
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Triangle on the `z = 0` plane.
    pub fn from_points_2d(a: &Point2d, b: &Point2d, c: &Point2d) -> Self {
        Self::new(a.to_vec3(), b.to_vec3(), c.to_vec3())
    }

    pub fn vertices(&self) -> &[Vec3; 3] {
        &self.vertices
    }

    /// Vertices projected onto the XY plane.
    pub fn points_2d(&self) -> [Point2d; 3] {
        let [a, b, c] = self.vertices;
        [Point2d::from_vec3(&a), Point2d::from_vec3(&b), Point2d::from_vec3(&c)]
    }

    pub fn vertex(&self, index: usize) -> Vec3 {
        self.vertices[index % 3]
    }

    /// Unnormalized face normal `(v1 - v0) x (v2 - v0)`; its length is twice
    /// the triangle area.
    pub fn cross(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(&(v2 - v0))
    }

    /// Unit face normal, or [`Vec3::ZERO`] when the triangle is degenerate.
    pub fn normal(&self) -> Vec3 {
        self.cross().normalize()
    }

    /// Unit face normal, or [`Vec3::ZERO`] when the cross product is no
    /// longer than `tol.coincidence`. Slivers that are not exactly flat
    /// still get a zero normal instead of a noisy direction.
    pub fn normal_with(&self, tol: &Tolerance) -> Vec3 {
        let cross = self.cross();
        if tol.is_zero_length(cross.length()) {
            Vec3::ZERO
        } else {
            cross.normalize()
        }
    }

    pub fn area(&self) -> f64 {
        0.5 * self.cross().length()
    }

    pub fn is_degenerate(&self, min_area: f64) -> bool {
        self.area() <= min_area
    }

    /// Same triangle with the opposite winding.
    pub fn flipped(&self) -> Self {
        let [a, b, c] = self.vertices;
        Self::new(a, c, b)
    }

    pub fn edges(&self) -> [Edge; 3] {
        let [a, b, c] = self.vertices;
        [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)]
    }

    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(Vec3::is_finite)
    }
}

/// An unordered pair of endpoints.
///
/// `Edge::new(a, b) == Edge::new(b, a)`, and both hash the same, so edges
/// can be counted in a map regardless of the direction they were met in.
/// Endpoints compare by exact bit pattern (with `-0.0` folded into `0.0`).
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    a: Vec3,
    b: Vec3,
}

type VertexKey = [u64; 3];

fn vertex_key(v: &Vec3) -> VertexKey {
    // Adding 0.0 maps -0.0 onto 0.0 so both signs share one key.
    [(v.x + 0.0).to_bits(), (v.y + 0.0).to_bits(), (v.z + 0.0).to_bits()]
}

impl Edge {
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self { a, b }
    }

    pub fn endpoints(&self) -> (Vec3, Vec3) {
        (self.a, self.b)
    }

    fn key(&self) -> (VertexKey, VertexKey) {
        let ka = vertex_key(&self.a);
        let kb = vertex_key(&self.b);
        if ka <= kb {
            (ka, kb)
        } else {
            (kb, ka)
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// An ordered list of triangles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Append every triangle of `other`, keeping both orders.
    pub fn append(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Sum of triangle areas; `+0.0` for an empty mesh.
    pub fn surface_area(&self) -> f64 {
        self.triangles.iter().fold(0.0, |acc, t| acc + t.area())
    }

    /// Axis-aligned bounds `(min, max)` of all vertices, `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut vertices = self.triangles.iter().flat_map(|t| t.vertices().iter());
        let first = *vertices.next()?;
        Some(vertices.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

impl FromIterator<Triangle> for Mesh {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self {
            triangles: iter.into_iter().collect(),
        }
    }
}

impl Extend<Triangle> for Mesh {
    fn extend<I: IntoIterator<Item = Triangle>>(&mut self, iter: I) {
        self.triangles.extend(iter);
    }
}

impl IntoIterator for Mesh {
    type Item = Triangle;
    type IntoIter = std::vec::IntoIter<Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

//! Property-based tests for the vector algebra and mesh model.

use proptest::prelude::*;

use surfmesh_kernel::geometry::predicates::{circumcircle, signed_area, turn};
use surfmesh_kernel::{Edge, Point2d, Tolerance, Triangle, Vec3};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Arbitrary 3D coordinate tuple in a reasonable floating-point range.
fn arb_vec() -> impl Strategy<Value = (f64, f64, f64)> {
    (-1000.0f64..1000.0, -1000.0f64..1000.0, -1000.0f64..1000.0)
}

fn arb_point2() -> impl Strategy<Value = (f64, f64)> {
    (-100.0f64..100.0, -100.0f64..100.0)
}

const TOL: f64 = 1e-6;

// ---------------------------------------------------------------------------
// 1. Cross product anticommutativity: a x b == -(b x a)
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn vector_cross_anticommutativity(a in arb_vec(), b in arb_vec()) {
        let a = Vec3::from(a);
        let b = Vec3::from(b);
        let ab = a.cross(&b);
        let neg_ba = -b.cross(&a);
        prop_assert!((ab.x - neg_ba.x).abs() < TOL, "x component: {} != {}", ab.x, neg_ba.x);
        prop_assert!((ab.y - neg_ba.y).abs() < TOL, "y component: {} != {}", ab.y, neg_ba.y);
        prop_assert!((ab.z - neg_ba.z).abs() < TOL, "z component: {} != {}", ab.z, neg_ba.z);
    }
}

// ---------------------------------------------------------------------------
// 2. Normalize yields unit length or the zero vector, never NaN
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn normalize_is_unit_or_zero(v in arb_vec()) {
        let n = Vec3::from(v).normalize();
        prop_assert!(n.is_finite());
        let len = n.length();
        prop_assert!(len == 0.0 || (len - 1.0).abs() < 1e-9, "length {}", len);
    }
}

// ---------------------------------------------------------------------------
// 3. Triangle normal is orthogonal to both edge vectors
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn triangle_normal_is_orthogonal_to_edges(a in arb_vec(), b in arb_vec(), c in arb_vec()) {
        let (a, b, c) = (Vec3::from(a), Vec3::from(b), Vec3::from(c));
        let tri = Triangle::new(a, b, c);
        prop_assume!(tri.area() > 1.0);
        let n = tri.normal();
        let e1 = (b - a).normalize();
        let e2 = (c - a).normalize();
        prop_assert!(n.dot(&e1).abs() < 1e-6);
        prop_assert!(n.dot(&e2).abs() < 1e-6);
    }
}

// ---------------------------------------------------------------------------
// 4. Edge equality ignores direction
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn edge_equality_is_symmetric(a in arb_vec(), b in arb_vec()) {
        let (a, b) = (Vec3::from(a), Vec3::from(b));
        prop_assert_eq!(Edge::new(a, b), Edge::new(b, a));
    }
}

// ---------------------------------------------------------------------------
// 5. Circumcircle passes through all three corners
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn circumcircle_is_equidistant(a in arb_point2(), b in arb_point2(), c in arb_point2()) {
        let (a, b, c) = (Point2d::from(a), Point2d::from(b), Point2d::from(c));
        prop_assume!(turn(&a, &b, &c).abs() > 100.0);
        let circle = circumcircle(&a, &b, &c, &Tolerance::default()).unwrap();
        for p in [a, b, c] {
            let d = circle.center.distance_to(&p);
            prop_assert!((d - circle.radius).abs() < 1e-6 * circle.radius.max(1.0),
                "corner at distance {} from center, radius {}", d, circle.radius);
        }
    }
}

// ---------------------------------------------------------------------------
// 6. Shoelace area flips sign with orientation
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn shoelace_flips_with_orientation(pts in prop::collection::vec(arb_point2(), 3..12)) {
        let ring: Vec<Point2d> = pts.into_iter().map(Point2d::from).collect();
        let reversed: Vec<Point2d> = ring.iter().rev().copied().collect();
        let fwd = signed_area(&ring);
        let back = signed_area(&reversed);
        prop_assert!((fwd + back).abs() < 1e-6 * fwd.abs().max(1.0));
    }
}

//! Floating-point planar predicates shared by the triangulators.
//!
//! None of these are exact. Callers pick a [`Tolerance`] and live with the
//! usual near-degenerate misclassifications.

use super::point::Point2d;
use crate::Tolerance;

/// Twice the signed area of the turn `a -> b -> c`.
///
/// Computed as `(b - a) x (c - b)`. Positive for a counter-clockwise (left)
/// turn, negative for clockwise, zero for collinear points.
pub fn turn(a: &Point2d, b: &Point2d, c: &Point2d) -> f64 {
    (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x)
}

/// Signed polygon area by the shoelace formula; positive when the ring is
/// counter-clockwise.
pub fn signed_area(ring: &[Point2d]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, p) in ring.iter().enumerate() {
        let q = &ring[(i + 1) % ring.len()];
        twice += p.x * q.y - q.x * p.y;
    }
    0.5 * twice
}

/// True when `p` lies strictly inside triangle `(a, b, c)`, for either
/// winding. Points on an edge or a corner are outside.
pub fn point_in_triangle_strict(p: &Point2d, a: &Point2d, b: &Point2d, c: &Point2d) -> bool {
    let d1 = turn(a, b, p);
    let d2 = turn(b, c, p);
    let d3 = turn(c, a, p);
    (d1 > 0.0 && d2 > 0.0 && d3 > 0.0) || (d1 < 0.0 && d2 < 0.0 && d3 < 0.0)
}

/// True when `p` lies inside triangle `(a, b, c)` or on its boundary, for
/// either winding. Degenerate (zero-area) triangles contain only the points
/// of their segment.
pub fn point_in_triangle_closed(p: &Point2d, a: &Point2d, b: &Point2d, c: &Point2d) -> bool {
    let in_box = p.x >= a.x.min(b.x).min(c.x)
        && p.x <= a.x.max(b.x).max(c.x)
        && p.y >= a.y.min(b.y).min(c.y)
        && p.y <= a.y.max(b.y).max(c.y);
    if !in_box {
        return false;
    }
    let d1 = turn(a, b, p);
    let d2 = turn(b, c, p);
    let d3 = turn(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// The circle through three points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point2d,
    pub radius: f64,
    radius_squared: f64,
}

impl Circle {
    pub fn radius_squared(&self) -> f64 {
        self.radius_squared
    }

    /// Strict containment: points on the circle are outside.
    pub fn contains_strictly(&self, p: &Point2d) -> bool {
        self.center.distance_squared_to(p) < self.radius_squared
    }

    /// Rightmost x reached by the circle.
    pub fn max_x(&self) -> f64 {
        self.center.x + self.radius
    }
}

/// Circumcircle of `(a, b, c)`, or `None` when the points are collinear
/// (or coincident) within `tol.collinear`.
///
/// The determinant is compared against the largest squared edge length, so
/// the threshold does not depend on the coordinate scale.
pub fn circumcircle(a: &Point2d, b: &Point2d, c: &Point2d, tol: &Tolerance) -> Option<Circle> {
    // Translate to `a` to keep the products small.
    let (bx, by) = *b - *a;
    let (cx, cy) = *c - *a;
    let d = 2.0 * (bx * cy - by * cx);

    let scale = (bx * bx + by * by)
        .max(cx * cx + cy * cy)
        .max((cx - bx) * (cx - bx) + (cy - by) * (cy - by));
    if scale == 0.0 || d.abs() <= tol.collinear * scale || !d.is_finite() {
        return None;
    }

    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    let radius_squared = ux * ux + uy * uy;

    Some(Circle {
        center: Point2d::new(a.x + ux, a.y + uy),
        radius: radius_squared.sqrt(),
        radius_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2d {
        Point2d::new(x, y)
    }

    #[test]
    fn test_turn_sign() {
        assert!(turn(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 1.0)) > 0.0);
        assert!(turn(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, -1.0)) < 0.0);
        assert_eq!(turn(&p(0.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0)), 0.0);
    }

    #[test]
    fn test_shoelace_unit_square() {
        let ccw = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert_abs_diff_eq!(signed_area(&ccw), 1.0);
        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert_abs_diff_eq!(signed_area(&cw), -1.0);
    }

    #[test]
    fn test_point_in_triangle_excludes_boundary() {
        let (a, b, c) = (p(0.0, 0.0), p(4.0, 0.0), p(0.0, 4.0));
        assert!(point_in_triangle_strict(&p(1.0, 1.0), &a, &b, &c));
        assert!(point_in_triangle_strict(&p(1.0, 1.0), &a, &c, &b));
        assert!(!point_in_triangle_strict(&p(2.0, 0.0), &a, &b, &c));
        assert!(!point_in_triangle_strict(&a, &a, &b, &c));
        assert!(!point_in_triangle_strict(&p(5.0, 5.0), &a, &b, &c));
    }

    #[test]
    fn test_point_in_triangle_closed_includes_boundary() {
        let (a, b, c) = (p(0.0, 0.0), p(4.0, 0.0), p(0.0, 4.0));
        assert!(point_in_triangle_closed(&p(1.0, 1.0), &a, &b, &c));
        assert!(point_in_triangle_closed(&p(2.0, 2.0), &a, &b, &c));
        assert!(point_in_triangle_closed(&a, &a, &b, &c));
        assert!(!point_in_triangle_closed(&p(3.0, 3.0), &a, &b, &c));
    }

    #[test]
    fn test_point_in_degenerate_triangle() {
        let (a, b, c) = (p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0));
        assert!(point_in_triangle_closed(&p(1.5, 0.0), &a, &b, &c));
        assert!(!point_in_triangle_closed(&p(5.0, 0.0), &a, &b, &c));
    }

    #[test]
    fn test_circumcircle_right_triangle() {
        let tol = Tolerance::default();
        let circle = circumcircle(&p(0.0, 0.0), &p(2.0, 0.0), &p(0.0, 2.0), &tol).unwrap();
        assert_abs_diff_eq!(circle.center.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(circle.center.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(circle.radius, 2.0_f64.sqrt(), epsilon = 1e-12);
        assert!(circle.contains_strictly(&p(1.0, 1.5)));
        // The fourth corner of the square is on the circle, not inside it.
        assert!(!circle.contains_strictly(&p(2.0, 2.0)));
    }

    #[test]
    fn test_circumcircle_far_from_origin() {
        let tol = Tolerance::default();
        let circle = circumcircle(
            &p(1e6, 1e6),
            &p(1e6 + 2.0, 1e6),
            &p(1e6, 1e6 + 2.0),
            &tol,
        )
        .unwrap();
        assert_abs_diff_eq!(circle.center.x, 1e6 + 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(circle.max_x(), 1e6 + 1.0 + 2.0_f64.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_circumcircle_collinear_is_none() {
        let tol = Tolerance::default();
        assert!(circumcircle(&p(0.0, 0.0), &p(1.0, 1.0), &p(3.0, 3.0), &tol).is_none());
        assert!(circumcircle(&p(1.0, 1.0), &p(1.0, 1.0), &p(1.0, 1.0), &tol).is_none());
        assert!(circumcircle(&p(0.0, 0.0), &p(0.0, 0.0), &p(1.0, 0.0), &tol).is_none());
    }
}

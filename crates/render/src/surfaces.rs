//! Sample inputs for the demo exports.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use surfmesh_kernel::{Point2d, Vec3};

/// A spiralling camellia flower over `u in [0, 2]`, `v in [0, 1]`.
///
/// `u` winds the petals around the axis, `v` runs from the centre out to
/// the petal edge. Petals open up as the spiral grows.
pub fn camellia(u: f64, v: f64) -> Vec3 {
    let theta = 4.0 * PI + u * 20.0 * PI;
    let r = v;

    let petal = (3.6 * theta).rem_euclid(TAU);
    let ripple = (15.0 * theta).sin() / 150.0;
    let edge = 1.0 - 0.5 * (1.0 - petal / PI).powi(4) + ripple;

    let curl = 2.0 * (r * r - r).powi(2);
    let opening = FRAC_PI_2 * (-theta / (8.0 * PI)).exp();
    let h = curl * opening.sin();

    let radial = opening.sin() * r + opening.cos() * h;
    let height = opening.cos() * r - opening.sin() * h;
    Vec3::new(
        edge * radial * theta.cos(),
        edge * radial * theta.sin(),
        edge * height,
    )
}

/// Sphere of `radius` over `u in [0, 2pi]` (longitude), `v in [-pi/2, pi/2]`.
pub fn sphere(radius: f64) -> impl Fn(f64, f64) -> Vec3 {
    move |u, v| Vec3::new(radius * v.cos() * u.cos(), radius * v.cos() * u.sin(), radius * v.sin())
}

/// Torus around `z` over `u, v in [0, 2pi]`.
pub fn torus(major: f64, minor: f64) -> impl Fn(f64, f64) -> Vec3 {
    move |u, v| {
        let ring = major + minor * v.cos();
        Vec3::new(ring * u.cos(), ring * u.sin(), minor * v.sin())
    }
}

/// Signed distance to a sphere of `radius` around the origin.
pub fn sphere_field(radius: f64) -> impl Fn(Vec3) -> f64 {
    move |p| p.length() - radius
}

/// Implicit torus around `z` matching [`torus`]: negative inside the tube.
pub fn torus_field(major: f64, minor: f64) -> impl Fn(Vec3) -> f64 {
    move |p| {
        let ring = (p.x * p.x + p.y * p.y).sqrt() - major;
        ring * ring + p.z * p.z - minor * minor
    }
}

/// `count` points on a sunflower (golden-angle) spiral filling a disc.
pub fn sunflower(count: usize, radius: f64) -> Vec<Point2d> {
    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
    (0..count)
        .map(|k| {
            let r = radius * ((k as f64 + 0.5) / count as f64).sqrt();
            let angle = k as f64 * golden_angle;
            Point2d::new(r * angle.cos(), r * angle.sin())
        })
        .collect()
}

/// Counter-clockwise star with `tips` points alternating between the outer
/// and inner radius.
pub fn star(tips: usize, outer: f64, inner: f64) -> Vec<Point2d> {
    (0..2 * tips)
        .map(|k| {
            let angle = k as f64 * PI / tips as f64;
            let r = if k % 2 == 0 { outer } else { inner };
            Point2d::new(r * angle.cos(), r * angle.sin())
        })
        .collect()
}

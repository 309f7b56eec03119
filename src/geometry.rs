//! Vector and angle helpers on the unit sphere.
//!
//! Azimuth `theta` runs around the vertical (y) axis, polar angle `phi` is
//! measured from +y. The viewer looks down the -z axis, so +z points toward
//! the viewer.

use glam::DVec3;
use rand::Rng;
use std::f64::consts::{PI, TAU};

pub fn spherical_to_cartesian(theta: f64, phi: f64) -> DVec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    DVec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta)
}

/// Inverse of [`spherical_to_cartesian`]. `theta` is in `(-PI, PI]`, `phi` in `[0, PI]`.
pub fn cartesian_to_spherical(v: DVec3) -> (f64, f64) {
    let v = normalize_or(v, DVec3::Y);
    let theta = v.z.atan2(v.x);
    let phi = v.y.clamp(-1.0, 1.0).acos();
    (theta, phi)
}

/// Great-circle angle between two unit vectors.
pub fn angular_distance(a: DVec3, b: DVec3) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos()
}

pub fn normalize_or(v: DVec3, fallback: DVec3) -> DVec3 {
    let len = v.length();
    if len > 1e-12 && len.is_finite() {
        v / len
    } else {
        fallback
    }
}

/// Uniform direction over the sphere surface (not uniform over `(theta, phi)`).
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> DVec3 {
    let u: f64 = rng.gen_range(0.0..1.0);
    let v: f64 = rng.gen_range(0.0..1.0);
    let theta = TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    spherical_to_cartesian(theta, phi)
}

/// Adds `angle` to the azimuth of `v`.
pub fn rotate_azimuth(v: DVec3, angle: f64) -> DVec3 {
    let (s, c) = angle.sin_cos();
    DVec3::new(c * v.x - s * v.z, v.y, s * v.x + c * v.z)
}

/// Some unit vector orthogonal to `v`.
pub fn any_perpendicular(v: DVec3) -> DVec3 {
    let axis = if v.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
    normalize_or(v.cross(axis), DVec3::Z)
}

/// Wraps an angle into `[0, TAU)`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub const HALF_PI: f64 = PI / 2.0;

use crate::geometry::spherical_to_cartesian;
use glam::DVec3;
use std::f64::consts::PI;

/// `n` directions on a golden-angle spiral from the top of the sphere down.
pub(super) fn spiral_directions(n: usize) -> Vec<DVec3> {
    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
    (0..n)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
            let phi = y.clamp(-1.0, 1.0).acos();
            let theta = golden_angle * i as f64;
            spherical_to_cartesian(theta, phi)
        })
        .collect()
}

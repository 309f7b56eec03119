use crate::config::PlacementConfig;
use crate::geometry::{angular_distance, any_perpendicular, normalize_or};
use glam::DVec3;

/// Pairwise repulsion on the sphere. Only pairs closer than their required gap
/// move; there is no attraction term. Returns the number of rounds run.
pub(super) fn relax(positions: &mut [DVec3], normalized: &[f64], config: &PlacementConfig) -> usize {
    debug_assert_eq!(positions.len(), normalized.len());
    let n = positions.len();
    if n < 2 {
        return 0;
    }

    let mut rounds = 0;
    for _ in 0..config.relax_iterations {
        rounds += 1;
        let mut moved = false;
        for i in 0..n {
            for j in (i + 1)..n {
                let required = config.required_gap(normalized[i], normalized[j]);
                let distance = angular_distance(positions[i], positions[j]);
                if distance >= required {
                    continue;
                }
                let chord = positions[i] - positions[j];
                let dir = if chord.length_squared() > 1e-18 {
                    chord.normalize()
                } else {
                    any_perpendicular(positions[i])
                };
                let push = (required - distance) * config.relax_step;
                positions[i] = normalize_or(positions[i] + dir * push, positions[i]);
                positions[j] = normalize_or(positions[j] - dir * push, positions[j]);
                moved = true;
            }
        }
        if !moved {
            break;
        }
    }
    rounds
}

/// Largest `required_gap - distance` over all pairs; `<= 0` when every pair is clear.
pub fn worst_violation(positions: &[DVec3], normalized: &[f64], config: &PlacementConfig) -> f64 {
    let mut worst = f64::NEG_INFINITY;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let required = config.required_gap(normalized[i], normalized[j]);
            worst = worst.max(required - angular_distance(positions[i], positions[j]));
        }
    }
    worst
}

// Randomized initial placement: rejection sampling against the weighted gap
// rule, falling back to the best max-min candidate when the budget runs out.

use crate::config::PlacementConfig;
use crate::geometry::{angular_distance, random_unit_vector};
use glam::DVec3;
use rand::Rng;

/// Placed so far: direction plus normalized weight.
pub(super) type Anchor = (DVec3, f64);

pub(super) enum Sampled {
    Accepted(DVec3),
    Fallback(DVec3),
}

/// Smallest `distance - required_gap` over every placed anchor.
/// Positive means the candidate clears all of them.
fn min_slack(candidate: DVec3, normalized: f64, placed: &[Anchor], config: &PlacementConfig) -> f64 {
    placed
        .iter()
        .map(|(pos, wn)| angular_distance(candidate, *pos) - config.required_gap(normalized, *wn))
        .fold(f64::INFINITY, f64::min)
}

pub(super) fn sample_direction<R: Rng + ?Sized>(
    normalized: f64,
    placed: &[Anchor],
    config: &PlacementConfig,
    rng: &mut R,
) -> Sampled {
    if placed.is_empty() {
        return Sampled::Accepted(random_unit_vector(rng));
    }

    for _ in 0..config.tries_per_word {
        let candidate = random_unit_vector(rng);
        if min_slack(candidate, normalized, placed, config) >= 0.0 {
            return Sampled::Accepted(candidate);
        }
    }

    let batch = config.tries_per_word.max(1);
    let mut best = random_unit_vector(rng);
    let mut best_slack = min_slack(best, normalized, placed, config);
    for _ in 1..batch {
        let candidate = random_unit_vector(rng);
        let slack = min_slack(candidate, normalized, placed, config);
        if slack > best_slack {
            best = candidate;
            best_slack = slack;
        }
    }
    Sampled::Fallback(best)
}

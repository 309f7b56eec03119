//! Label placement on the unit sphere.
//!
//! Heavier labels are placed first, while the sphere is still empty, and demand
//! more clearance from their neighbours. The scatter strategy is randomized;
//! relaxation afterwards is deterministic.

mod relax;
mod sampling;
mod spiral;
pub(crate) mod types;
pub use relax::worst_violation;
pub use types::*;

use crate::config::{PlacementConfig, PlacementStrategy};
use crate::ir::{Keyword, weigh_keywords};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::Rng;
use sampling::{Anchor, Sampled, sample_direction};

/// Places `keywords` using the configured strategy and seed.
pub fn place_labels(keywords: &[Keyword], config: &PlacementConfig) -> Placement {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    place_labels_with_rng(keywords, config, &mut rng)
}

pub fn place_labels_with_rng<R: Rng + ?Sized>(
    keywords: &[Keyword],
    config: &PlacementConfig,
    rng: &mut R,
) -> Placement {
    let words = weigh_keywords(keywords);
    if words.is_empty() {
        return Placement::default();
    }

    let normalized: Vec<f64> = words.iter().map(|w| w.normalized).collect();
    let mut stats = PlacementStats::default();

    let mut positions = match config.strategy {
        PlacementStrategy::Scatter => {
            let mut anchors: Vec<Anchor> = Vec::with_capacity(words.len());
            for wn in &normalized {
                let direction = match sample_direction(*wn, &anchors, config, rng) {
                    Sampled::Accepted(dir) => {
                        stats.accepted += 1;
                        dir
                    }
                    Sampled::Fallback(dir) => {
                        stats.fallbacks += 1;
                        dir
                    }
                };
                anchors.push((direction, *wn));
            }
            anchors.into_iter().map(|(dir, _)| dir).collect()
        }
        PlacementStrategy::Spiral => spiral::spiral_directions(words.len()),
    };

    stats.relax_rounds = relax::relax(&mut positions, &normalized, config);

    debug!(
        "placed {} labels ({:?}): {} accepted, {} fallback, {} relax rounds",
        words.len(),
        config.strategy,
        stats.accepted,
        stats.fallbacks,
        stats.relax_rounds
    );

    let labels = words
        .into_iter()
        .zip(positions)
        .map(|(word, position)| PlacedLabel {
            word: word.word,
            weight: word.weight,
            normalized: word.normalized,
            position,
        })
        .collect();

    Placement { labels, stats }
}

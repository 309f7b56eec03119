use crate::geometry::cartesian_to_spherical;
use glam::DVec3;

/// A keyword fixed to a direction on the unit sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    pub word: String,
    /// Raw weight, clamped to `[0, 1]`.
    pub weight: f64,
    /// Weight normalized against the current keyword set.
    pub normalized: f64,
    /// Unit direction.
    pub position: DVec3,
}

impl PlacedLabel {
    /// Azimuth around the vertical axis.
    pub fn theta(&self) -> f64 {
        cartesian_to_spherical(self.position).0
    }

    /// Polar angle from the top of the sphere.
    pub fn phi(&self) -> f64 {
        cartesian_to_spherical(self.position).1
    }
}

/// Counters collected while placing a keyword set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementStats {
    /// Labels accepted by rejection sampling.
    pub accepted: usize,
    /// Labels that needed the max-min fallback.
    pub fallbacks: usize,
    /// Relaxation rounds actually run.
    pub relax_rounds: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Placement {
    /// Heaviest label first.
    pub labels: Vec<PlacedLabel>,
    pub stats: PlacementStats,
}

impl Placement {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

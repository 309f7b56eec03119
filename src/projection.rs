//! Sphere-space to drawing-space projection.
//!
//! The sphere is drawn as an orthographic ellipse rather than through a
//! perspective camera; depth only drives size, opacity and draw order.

use crate::config::ProjectionConfig;
use crate::geometry::{lerp, rotate_azimuth, smoothstep};
use crate::placement::PlacedLabel;
use glam::DVec2;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn ellipse(&self, config: &ProjectionConfig) -> Ellipse {
        let rx = (self.width.min(self.height) * config.radius_fraction).max(1.0);
        Ellipse {
            center: DVec2::new(self.width / 2.0, self.height / 2.0),
            rx,
            ry: rx * config.squash,
        }
    }
}

/// Silhouette of the projected sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: DVec2,
    pub rx: f64,
    pub ry: f64,
}

impl Ellipse {
    /// Offset from the center against the semi-axes; `1.0` on the silhouette.
    pub fn normalized_radius(&self, point: DVec2) -> f64 {
        let d = point - self.center;
        DVec2::new(d.x / self.rx, d.y / self.ry).length()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedLabel {
    /// Index into the placement this label came from.
    pub index: usize,
    pub word: String,
    pub weight: f64,
    pub normalized: f64,
    pub x: f64,
    pub y: f64,
    /// `0.0` at the back of the sphere, `1.0` facing the viewer.
    pub depth: f64,
    pub scale: f64,
    /// Depth-driven opacity before the rim fade.
    pub alpha: f64,
    /// Rim fade multiplier.
    pub rim: f64,
    /// Final opacity, `alpha * rim`.
    pub fade: f64,
    pub font_size: f64,
}

impl ProjectedLabel {
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

/// Projects `labels` at `rotation` into `viewport`, ordered back to front.
pub fn project(
    labels: &[PlacedLabel],
    rotation: f64,
    viewport: &Viewport,
    config: &ProjectionConfig,
) -> Vec<ProjectedLabel> {
    project_onto(labels, rotation, &viewport.ellipse(config), config)
}

pub fn project_onto(
    labels: &[PlacedLabel],
    rotation: f64,
    ellipse: &Ellipse,
    config: &ProjectionConfig,
) -> Vec<ProjectedLabel> {
    let size_factor = if config.reference_radius > 0.0 {
        ellipse.rx / config.reference_radius
    } else {
        1.0
    };

    let mut projected: Vec<ProjectedLabel> = labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let p = rotate_azimuth(label.position, rotation);
            let x = ellipse.center.x + p.x * ellipse.rx;
            let y = ellipse.center.y - p.y * ellipse.ry;

            let depth = ((p.z + 1.0) / 2.0).clamp(0.0, 1.0);
            let scale = lerp(config.scale_far, config.scale_near, depth.powf(config.scale_gamma));
            let alpha = lerp(config.alpha_floor, 1.0, depth.powf(config.alpha_gamma));

            let r = ellipse.normalized_radius(DVec2::new(x, y));
            let rim = 1.0 - config.rim_strength * smoothstep(config.rim_start, 1.0, r);

            let font_size =
                lerp(config.font_min, config.font_max, label.normalized) * scale * size_factor;

            ProjectedLabel {
                index,
                word: label.word.clone(),
                weight: label.weight,
                normalized: label.normalized,
                x,
                y,
                depth,
                scale,
                alpha,
                rim,
                fade: (alpha * rim).clamp(0.0, 1.0),
                font_size,
            }
        })
        .collect();

    projected.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    projected
}

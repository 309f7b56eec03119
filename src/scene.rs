//! Per-frame state and the pure frame step.

use crate::config::{Config, PlacementConfig};
use crate::interaction::{HoverInfo, InteractionController, RotationState};
use crate::ir::{Keyword, sanitize_keywords};
use crate::placement::{Placement, place_labels};
use crate::projection::{Ellipse, ProjectedLabel, Viewport, project_onto};
use log::debug;

/// Host input delivered between two frames, in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    Resize { width: f64, height: f64 },
}

#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub events: Vec<PointerEvent>,
}

impl FrameInput {
    pub fn new(events: Vec<PointerEvent>) -> Self {
        Self { events }
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    placement: Placement,
    active: bool,
    viewport: Viewport,
    /// Derived from the viewport; `None` until the next frame rebuilds it.
    geometry: Option<Ellipse>,
    controller: InteractionController,
    /// Rotation the current `projected` labels were computed at.
    frame_angle: f64,
    projected: Vec<ProjectedLabel>,
    hover_changed: bool,
    frame: u64,
}

impl Scene {
    pub fn new(keywords: &[Keyword], active: bool, config: &Config) -> Self {
        let mut scene = Self {
            placement: Placement::default(),
            active,
            viewport: Viewport::new(config.render.width, config.render.height),
            geometry: None,
            controller: InteractionController::default(),
            frame_angle: 0.0,
            projected: Vec::new(),
            hover_changed: false,
            frame: 0,
        };
        scene.set_keywords(keywords, &config.placement, config.render.max_labels);
        scene
    }

    /// Replaces the keyword set. Only the `max_labels` heaviest are placed.
    pub fn set_keywords(&mut self, keywords: &[Keyword], placement: &PlacementConfig, max_labels: usize) {
        let mut kept = sanitize_keywords(keywords);
        if kept.len() > max_labels {
            debug!("showing {max_labels} of {} keywords", kept.len());
            kept.truncate(max_labels);
        }
        self.placement = place_labels(&kept, placement);
        self.projected.clear();
        self.controller.reset_hover();
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_rotation(&mut self, rotation: RotationState) {
        self.controller.rotation = rotation;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        self.geometry = None;
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `true` when there is nothing to draw but the placeholder.
    pub fn shows_placeholder(&self) -> bool {
        !self.active || self.placement.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Cached geometry, `None` while invalidated.
    pub fn geometry(&self) -> Option<&Ellipse> {
        self.geometry.as_ref()
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn rotation(&self) -> RotationState {
        self.controller.rotation
    }

    pub fn frame_angle(&self) -> f64 {
        self.frame_angle
    }

    /// Labels of the last frame, back to front.
    pub fn projected(&self) -> &[ProjectedLabel] {
        &self.projected
    }

    pub fn hover(&self) -> Option<&HoverInfo> {
        self.controller.hover()
    }

    /// Whether the last step changed the hovered label.
    pub fn hover_changed(&self) -> bool {
        self.hover_changed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn apply(&mut self, event: &PointerEvent, config: &Config) {
        match *event {
            PointerEvent::Down { x, y } => self.controller.pointer_down(x, y),
            PointerEvent::Move { x, y } => self.controller.pointer_move(x, y, &config.interaction),
            PointerEvent::Up => self.controller.pointer_up(),
            PointerEvent::Leave => self.controller.pointer_leave(),
            PointerEvent::Resize { width, height } => self.resize(width, height),
        }
    }
}

/// Runs one frame: apply events in order, rebuild invalidated geometry,
/// project at the current angle, hit-test hover, then advance the rotation.
pub fn step(scene: Scene, dt: f64, input: &FrameInput, config: &Config) -> Scene {
    let mut next = scene;
    for event in &input.events {
        next.apply(event, config);
    }

    let ellipse = match next.geometry {
        Some(ellipse) => ellipse,
        None => {
            let ellipse = next.viewport.ellipse(&config.projection);
            debug!(
                "geometry rebuilt for {}x{}: rx={:.1}",
                next.viewport.width, next.viewport.height, ellipse.rx
            );
            next.geometry = Some(ellipse);
            ellipse
        }
    };

    next.frame_angle = next.controller.rotation.angle;
    next.projected = if next.active {
        project_onto(&next.placement.labels, next.frame_angle, &ellipse, &config.projection)
    } else {
        Vec::new()
    };

    next.hover_changed = next.controller.update_hover(&next.projected, &config.interaction);

    let dragging = next.controller.is_dragging();
    next.controller.rotation.advance(dt, &config.motion, dragging);
    next.frame += 1;
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        let mut config = Config::default();
        config.placement.seed = Some(21);
        config
    }

    fn keywords() -> Vec<Keyword> {
        vec![
            Keyword::new("climate", 1.0),
            Keyword::new("policy", 0.5),
            Keyword::new("tax", 0.1),
        ]
    }

    #[test]
    fn step_projects_then_advances() {
        let config = config();
        let scene = Scene::new(&keywords(), true, &config);
        assert!(scene.geometry().is_none());

        let scene = step(scene, 1.0 / 60.0, &FrameInput::default(), &config);
        assert_eq!(scene.projected().len(), 3);
        assert!(scene.geometry().is_some());
        assert_eq!(scene.frame_angle(), 0.0);
        assert!((scene.rotation().angle - config.motion.auto_rotation).abs() < 1e-12);
        assert_eq!(scene.frame(), 1);
    }

    #[test]
    fn caps_to_heaviest_keywords() {
        let mut config = config();
        config.render.max_labels = 40;
        let many: Vec<Keyword> = (0..55)
            .map(|i| Keyword::new(format!("k{i}"), i as f64 / 55.0))
            .collect();
        let scene = Scene::new(&many, true, &config);
        assert_eq!(scene.placement().len(), 40);
        assert!(scene.placement().labels.iter().all(|l| l.word != "k0"));
        assert_eq!(scene.placement().labels[0].word, "k54");
    }

    #[test]
    fn inactive_scene_projects_nothing() {
        let config = config();
        let scene = Scene::new(&keywords(), false, &config);
        assert!(scene.shows_placeholder());
        let scene = step(scene, 1.0 / 60.0, &FrameInput::default(), &config);
        assert!(scene.projected().is_empty());
    }

    #[test]
    fn resize_invalidates_and_rebuilds_geometry() {
        let config = config();
        let scene = step(Scene::new(&keywords(), true, &config), 0.0, &FrameInput::default(), &config);
        let before = *scene.geometry().unwrap();

        let mut resized = scene.clone();
        resized.resize(400.0, 400.0);
        assert!(resized.geometry().is_none());

        let input = FrameInput::new(vec![PointerEvent::Resize {
            width: 400.0,
            height: 400.0,
        }]);
        let scene = step(scene, 0.0, &input, &config);
        let after = *scene.geometry().unwrap();
        assert_ne!(before, after);
        assert!((after.rx - 400.0 * config.projection.radius_fraction).abs() < 1e-9);
    }

    #[test]
    fn drag_events_rotate_within_one_step() {
        let config = config();
        let scene = Scene::new(&keywords(), true, &config);
        let input = FrameInput::new(vec![
            PointerEvent::Down { x: 100.0, y: 100.0 },
            PointerEvent::Move { x: 120.0, y: 100.0 },
        ]);
        let scene = step(scene, 1.0 / 60.0, &input, &config);
        assert!(scene.controller().is_dragging());
        assert!((scene.frame_angle() - 0.1).abs() < 1e-12);
        assert!((scene.rotation().angle - (0.1 + config.motion.auto_rotation)).abs() < 1e-12);
    }

    #[test]
    fn new_keywords_clear_hover() {
        let config = config();
        let scene = step(Scene::new(&keywords(), true, &config), 0.0, &FrameInput::default(), &config);
        let front = scene.projected().last().unwrap().clone();
        let input = FrameInput::new(vec![PointerEvent::Move { x: front.x, y: front.y }]);
        let mut scene = step(scene, 0.0, &input, &config);
        assert!(scene.hover_changed());
        assert!(scene.hover().is_some());

        scene.set_keywords(&[Keyword::new("other", 1.0)], &config.placement, 40);
        assert!(scene.hover().is_none());
    }
}

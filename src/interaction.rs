//! Drag-to-rotate, momentum, auto-rotation and hover hit-testing.

use crate::config::{InteractionConfig, MotionConfig};
use crate::geometry::wrap_angle;
use crate::projection::ProjectedLabel;
use glam::DVec2;
use log::{debug, warn};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationState {
    /// Azimuth offset in radians, kept in `[0, TAU)`.
    pub angle: f64,
    /// Momentum left over from the last drag, in radians per design frame.
    pub angular_velocity: f64,
}

impl RotationState {
    /// Advances by `dt` seconds. A step of `1 / reference_fps` is exactly one
    /// design frame; other steps scale the increment linearly and the decay
    /// exponentially.
    pub fn advance(&mut self, dt: f64, motion: &MotionConfig, dragging: bool) {
        let frames = (dt * motion.reference_fps).max(0.0);
        if frames == 0.0 {
            return;
        }
        // While the pointer holds the sphere the drag itself moves it.
        let velocity = if dragging { 0.0 } else { self.angular_velocity };
        self.angle = wrap_angle(self.angle + (motion.auto_rotation + velocity) * frames);
        self.angular_velocity *= motion.decay.powf(frames);
        if self.angular_velocity.abs() < 1e-9 {
            self.angular_velocity = 0.0;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        last_x: f64,
    },
}

/// Currently hovered label, reported with the pointer position that hit it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverInfo {
    pub word: String,
    pub weight: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    pub rotation: RotationState,
    drag: DragState,
    pointer: Option<DVec2>,
    /// Placement index of the hovered label, used for the hover latch.
    hovered: Option<usize>,
    hover: Option<HoverInfo>,
}

impl InteractionController {
    pub fn new(rotation: RotationState) -> Self {
        Self {
            rotation,
            ..Self::default()
        }
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn pointer(&self) -> Option<DVec2> {
        self.pointer
    }

    pub fn hover(&self) -> Option<&HoverInfo> {
        self.hover.as_ref()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.pointer = Some(DVec2::new(x, y));
        self.drag = DragState::Dragging { last_x: x };
        self.rotation.angular_velocity = 0.0;
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, config: &InteractionConfig) {
        self.pointer = Some(DVec2::new(x, y));
        if let DragState::Dragging { last_x } = self.drag {
            let delta = (x - last_x) * config.sensitivity;
            self.rotation.angle = wrap_angle(self.rotation.angle + delta);
            self.rotation.angular_velocity =
                delta.clamp(-config.max_velocity, config.max_velocity);
            self.drag = DragState::Dragging { last_x: x };
        }
    }

    /// Ends a drag. Delivered from global scope, so it also fires when the
    /// pointer is released outside the surface.
    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Pointer left the surface: hover ends, a drag in progress does not.
    pub fn pointer_leave(&mut self) {
        self.pointer = None;
    }

    /// Forgets the hovered label, e.g. after the placement changed.
    pub fn reset_hover(&mut self) {
        self.hovered = None;
        self.hover = None;
    }

    /// Re-runs hit-testing against this frame's labels. Returns `true` when
    /// the hovered label changed, including a change to nothing.
    pub fn update_hover(&mut self, projected: &[ProjectedLabel], config: &InteractionConfig) -> bool {
        let picked = self
            .pointer
            .and_then(|pointer| pick_hover(projected, pointer, self.hovered, config).map(|l| (l, pointer)));

        let next_index = picked.map(|(label, _)| label.index);
        let changed = next_index != self.hovered;
        self.hovered = next_index;
        self.hover = picked.map(|(label, pointer)| HoverInfo {
            word: label.word.clone(),
            weight: label.weight,
            x: pointer.x,
            y: pointer.y,
        });
        if changed {
            debug!("hover -> {:?}", self.hover.as_ref().map(|h| h.word.as_str()));
        }
        changed
    }
}

/// Best hit under `pointer`. A label is hit within `font_size *
/// hit_radius_factor` of its anchor; the previously hovered label gets the
/// radius scaled by `latch_slack`. Among hits the smallest
/// `distance - depth_bonus * depth` wins.
pub fn pick_hover<'a>(
    projected: &'a [ProjectedLabel],
    pointer: DVec2,
    previous: Option<usize>,
    config: &InteractionConfig,
) -> Option<&'a ProjectedLabel> {
    projected
        .iter()
        .filter_map(|label| {
            let mut radius = label.font_size * config.hit_radius_factor;
            if previous == Some(label.index) {
                radius *= config.latch_slack;
            }
            let distance = label.position().distance(pointer);
            (distance <= radius).then(|| (distance - config.depth_bonus * label.depth, label))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, label)| label)
}

/// Host events the view listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerDown,
    PointerMove,
    PointerLeave,
    PointerUp,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerScope {
    /// Bound to the drawing surface.
    Surface,
    /// Bound to the whole host, so events outside the surface arrive too.
    Global,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 5] = [
        ListenerKind::PointerDown,
        ListenerKind::PointerMove,
        ListenerKind::PointerLeave,
        ListenerKind::PointerUp,
        ListenerKind::Resize,
    ];

    pub fn scope(self) -> ListenerScope {
        match self {
            ListenerKind::PointerUp => ListenerScope::Global,
            _ => ListenerScope::Surface,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Anything that can register and unregister event listeners.
pub trait EventSource {
    fn add_listener(&mut self, kind: ListenerKind, scope: ListenerScope) -> ListenerId;
    fn remove_listener(&mut self, id: ListenerId);
}

/// Listeners registered by [`Attachment::attach`]. Each one is removed exactly
/// once by [`Attachment::detach`].
#[derive(Debug, Default)]
#[must_use = "listeners stay registered until detached"]
pub struct Attachment {
    ids: Vec<(ListenerKind, ListenerId)>,
}

impl Attachment {
    pub fn attach<S: EventSource + ?Sized>(source: &mut S) -> Self {
        let ids = ListenerKind::ALL
            .iter()
            .map(|&kind| (kind, source.add_listener(kind, kind.scope())))
            .collect();
        Self { ids }
    }

    pub fn is_attached(&self) -> bool {
        !self.ids.is_empty()
    }

    pub fn listeners(&self) -> impl Iterator<Item = (ListenerKind, ListenerId)> + '_ {
        self.ids.iter().copied()
    }

    /// Removes every listener. Returns how many were removed; a second call
    /// removes nothing.
    pub fn detach<S: EventSource + ?Sized>(&mut self, source: &mut S) -> usize {
        let count = self.ids.len();
        for (_, id) in self.ids.drain(..) {
            source.remove_listener(id);
        }
        count
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        if !self.ids.is_empty() {
            warn!("{} listeners dropped without detaching", self.ids.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn label(index: usize, x: f64, y: f64, depth: f64) -> ProjectedLabel {
        ProjectedLabel {
            index,
            word: format!("w{index}"),
            weight: 0.5,
            normalized: 0.5,
            x,
            y,
            depth,
            scale: 1.0,
            alpha: 1.0,
            rim: 1.0,
            fade: 1.0,
            font_size: 20.0,
        }
    }

    #[test]
    fn nearer_label_wins_at_the_same_screen_point() {
        let config = InteractionConfig::default();
        let labels = vec![label(0, 100.0, 100.0, 0.2), label(1, 100.0, 100.0, 0.9)];
        let hit = pick_hover(&labels, DVec2::new(103.0, 100.0), None, &config);
        assert_eq!(hit.map(|l| l.index), Some(1));
    }

    #[test]
    fn depth_bonus_beats_small_2d_advantage() {
        let config = InteractionConfig::default();
        let labels = vec![label(0, 100.0, 100.0, 0.1), label(1, 110.0, 100.0, 0.9)];
        // Closer to the back label by 10 px, but the front label's bonus is ~19 px.
        let hit = pick_hover(&labels, DVec2::new(100.0, 100.0), None, &config);
        assert_eq!(hit.map(|l| l.index), Some(1));
    }

    #[test]
    fn misses_outside_hit_radius() {
        let config = InteractionConfig::default();
        let labels = vec![label(0, 100.0, 100.0, 1.0)];
        assert!(pick_hover(&labels, DVec2::new(130.0, 100.0), None, &config).is_none());
    }

    #[test]
    fn latch_keeps_previous_label_a_little_longer() {
        let config = InteractionConfig::default();
        let labels = vec![label(0, 100.0, 100.0, 1.0)];
        // 20 * 1.1 = 22 px plain, 27.5 px latched.
        let pointer = DVec2::new(125.0, 100.0);
        assert!(pick_hover(&labels, pointer, None, &config).is_none());
        assert!(pick_hover(&labels, pointer, Some(0), &config).is_some());
    }

    #[test]
    fn drag_rotates_and_sets_clamped_velocity() {
        let config = InteractionConfig::default();
        let mut controller = InteractionController::default();
        controller.pointer_down(100.0, 50.0);
        controller.pointer_move(110.0, 50.0, &config);
        assert!((controller.rotation.angle - 0.05).abs() < 1e-12);
        assert!((controller.rotation.angular_velocity - 0.05).abs() < 1e-12);

        controller.pointer_move(200.0, 50.0, &config);
        assert_eq!(controller.rotation.angular_velocity, config.max_velocity);
        assert!((controller.rotation.angle - 0.5).abs() < 1e-12);
    }

    #[test]
    fn moving_without_drag_only_tracks_pointer() {
        let config = InteractionConfig::default();
        let mut controller = InteractionController::default();
        controller.pointer_move(40.0, 10.0, &config);
        assert_eq!(controller.rotation.angle, 0.0);
        assert_eq!(controller.pointer(), Some(DVec2::new(40.0, 10.0)));
    }

    #[test]
    fn leave_clears_pointer_but_keeps_drag() {
        let mut controller = InteractionController::default();
        controller.pointer_down(1.0, 1.0);
        controller.pointer_leave();
        assert!(controller.pointer().is_none());
        assert!(controller.is_dragging());
        controller.pointer_up();
        assert_eq!(controller.drag_state(), DragState::Idle);
    }

    #[test]
    fn one_design_frame_matches_the_plain_update() {
        let motion = MotionConfig::default();
        let mut rotation = RotationState {
            angle: 0.0,
            angular_velocity: 0.05,
        };
        rotation.advance(1.0 / motion.reference_fps, &motion, false);
        assert!((rotation.angle - (motion.auto_rotation + 0.05)).abs() < 1e-12);
        assert!((rotation.angular_velocity - 0.05 * motion.decay).abs() < 1e-12);
    }

    #[test]
    fn momentum_decays_toward_auto_rotation() {
        let motion = MotionConfig::default();
        let mut rotation = RotationState {
            angle: 0.0,
            angular_velocity: 0.08,
        };
        for _ in 0..600 {
            rotation.advance(1.0 / 60.0, &motion, false);
        }
        assert_eq!(rotation.angular_velocity, 0.0);
    }

    #[test]
    fn zero_step_changes_nothing() {
        let motion = MotionConfig::default();
        let mut rotation = RotationState {
            angle: 0.3,
            angular_velocity: 0.02,
        };
        rotation.advance(0.0, &motion, false);
        assert_eq!(rotation.angle, 0.3);
        assert_eq!(rotation.angular_velocity, 0.02);
    }

    #[test]
    fn hover_change_is_reported_once() {
        let config = InteractionConfig::default();
        let labels = vec![label(0, 100.0, 100.0, 1.0)];
        let mut controller = InteractionController::default();
        controller.pointer_move(100.0, 100.0, &config);
        assert!(controller.update_hover(&labels, &config));
        assert!(!controller.update_hover(&labels, &config));
        assert_eq!(controller.hover().map(|h| h.word.as_str()), Some("w0"));

        controller.pointer_leave();
        assert!(controller.update_hover(&labels, &config));
        assert!(controller.hover().is_none());
        assert!(!controller.update_hover(&labels, &config));
    }

    #[derive(Default)]
    struct Recorder {
        next: u64,
        live: BTreeMap<ListenerId, (ListenerKind, ListenerScope)>,
        removed: usize,
    }

    impl EventSource for Recorder {
        fn add_listener(&mut self, kind: ListenerKind, scope: ListenerScope) -> ListenerId {
            self.next += 1;
            let id = ListenerId(self.next);
            self.live.insert(id, (kind, scope));
            id
        }

        fn remove_listener(&mut self, id: ListenerId) {
            assert!(self.live.remove(&id).is_some(), "listener removed twice");
            self.removed += 1;
        }
    }

    #[test]
    fn attach_registers_release_globally_and_detach_is_idempotent() {
        let mut source = Recorder::default();
        let mut attachment = Attachment::attach(&mut source);
        assert_eq!(source.live.len(), 5);
        let up = source
            .live
            .values()
            .find(|(kind, _)| *kind == ListenerKind::PointerUp)
            .copied();
        assert_eq!(up, Some((ListenerKind::PointerUp, ListenerScope::Global)));

        assert_eq!(attachment.detach(&mut source), 5);
        assert_eq!(attachment.detach(&mut source), 0);
        assert!(source.live.is_empty());
        assert_eq!(source.removed, 5);
    }
}

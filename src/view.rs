//! Mounting a globe onto a host surface and driving it frame by frame.

use crate::config::Config;
use crate::error::GlobeError;
use crate::interaction::{Attachment, EventSource, HoverInfo, ListenerId, ListenerKind, ListenerScope};
use crate::ir::Keyword;
use crate::render::{Painter, SvgPainter, draw_frame};
use crate::scene::{FrameInput, PointerEvent, Scene, step};
use log::debug;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// What the view needs from its host: a size, a painter, listener
/// registration and animation-frame scheduling.
pub trait HostSurface: EventSource {
    fn size(&self) -> (f64, f64);
    /// `None` when the host cannot provide a drawing context.
    fn painter(&mut self) -> Option<&mut dyn Painter>;
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, frame: FrameId);
}

type HoverCallback = Box<dyn FnMut(Option<&HoverInfo>)>;

pub struct GlobeView<S: HostSurface> {
    surface: S,
    scene: Scene,
    config: Config,
    attachment: Attachment,
    pending_frame: Option<FrameId>,
    queued: Vec<PointerEvent>,
    on_hover: Option<HoverCallback>,
    mounted: bool,
}

impl<S: HostSurface> GlobeView<S> {
    /// Places `keywords`, registers listeners and schedules the first frame.
    pub fn mount(mut surface: S, keywords: &[Keyword], active: bool, config: Config) -> Result<Self, GlobeError> {
        if surface.painter().is_none() {
            return Err(GlobeError::SurfaceUnavailable(
                "host returned no drawing context".to_string(),
            ));
        }

        let (width, height) = surface.size();
        let mut scene = Scene::new(keywords, active, &config);
        scene.resize(width, height);

        let attachment = Attachment::attach(&mut surface);
        let pending_frame = Some(surface.request_frame());
        debug!(
            "mounted globe {}x{} with {} labels",
            width,
            height,
            scene.placement().len()
        );

        Ok(Self {
            surface,
            scene,
            config,
            attachment,
            pending_frame,
            queued: Vec::new(),
            on_hover: None,
            mounted: true,
        })
    }

    /// Called once per hover change with the new hover, or `None` when it clears.
    pub fn on_hover(&mut self, callback: impl FnMut(Option<&HoverInfo>) + 'static) {
        self.on_hover = Some(Box::new(callback));
    }

    /// Queues a host event for the next frame.
    pub fn dispatch(&mut self, event: PointerEvent) -> Result<(), GlobeError> {
        if !self.mounted {
            return Err(GlobeError::NotMounted);
        }
        self.queued.push(event);
        Ok(())
    }

    /// Runs one frame and paints it.
    pub fn tick(&mut self, dt: f64) -> Result<(), GlobeError> {
        if !self.mounted {
            return Err(GlobeError::NotMounted);
        }
        self.pending_frame = None;

        let input = FrameInput::new(std::mem::take(&mut self.queued));
        self.scene = step(self.scene.clone(), dt, &input, &self.config);

        let painter = self
            .surface
            .painter()
            .ok_or_else(|| GlobeError::SurfaceUnavailable("drawing context lost".to_string()))?;
        draw_frame(painter, &self.scene, &self.config);

        if self.scene.hover_changed() {
            if let Some(callback) = self.on_hover.as_mut() {
                callback(self.scene.hover());
            }
        }

        self.pending_frame = Some(self.surface.request_frame());
        Ok(())
    }

    pub fn set_keywords(&mut self, keywords: &[Keyword]) {
        let hovered = self.scene.hover().is_some();
        self.scene
            .set_keywords(keywords, &self.config.placement, self.config.render.max_labels);
        if hovered {
            if let Some(callback) = self.on_hover.as_mut() {
                callback(None);
            }
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.scene.set_active(active);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Cancels the pending frame and removes every listener. Safe to call
    /// more than once.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        if let Some(frame) = self.pending_frame.take() {
            self.surface.cancel_frame(frame);
        }
        let removed = self.attachment.detach(&mut self.surface);
        self.queued.clear();
        self.mounted = false;
        debug!("unmounted globe, removed {removed} listeners");
    }
}

impl<S: HostSurface> Drop for GlobeView<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Offscreen host that keeps every painted frame as an SVG document.
#[derive(Debug)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    painter: Option<SvgPainter>,
    next_id: u64,
    listeners: BTreeMap<ListenerId, (ListenerKind, ListenerScope)>,
    pending_frame: Option<FrameId>,
    cancelled_frames: usize,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            painter: Some(SvgPainter::new()),
            next_id: 0,
            listeners: BTreeMap::new(),
            pending_frame: None,
            cancelled_frames: 0,
        }
    }

    /// A surface whose drawing context cannot be acquired.
    pub fn without_painter(width: f64, height: f64) -> Self {
        Self {
            painter: None,
            ..Self::new(width, height)
        }
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn frames(&self) -> &[String] {
        self.painter.as_ref().map(|p| p.frames()).unwrap_or(&[])
    }

    pub fn last_frame(&self) -> Option<&str> {
        self.painter.as_ref().and_then(|p| p.last_frame())
    }

    pub fn take_frames(&mut self) -> Vec<String> {
        self.painter.as_mut().map(|p| p.take_frames()).unwrap_or_default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listeners(&self) -> impl Iterator<Item = &(ListenerKind, ListenerScope)> {
        self.listeners.values()
    }

    pub fn pending_frame(&self) -> Option<FrameId> {
        self.pending_frame
    }

    pub fn cancelled_frames(&self) -> usize {
        self.cancelled_frames
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl EventSource for SvgSurface {
    fn add_listener(&mut self, kind: ListenerKind, scope: ListenerScope) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.insert(id, (kind, scope));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        if self.listeners.remove(&id).is_none() {
            log::warn!("listener {id:?} was not registered");
        }
    }
}

impl HostSurface for SvgSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn painter(&mut self) -> Option<&mut dyn Painter> {
        self.painter.as_mut().map(|p| p as &mut dyn Painter)
    }

    fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.next_id());
        self.pending_frame = Some(id);
        id
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        if self.pending_frame == Some(frame) {
            self.pending_frame = None;
            self.cancelled_frames += 1;
        }
    }
}

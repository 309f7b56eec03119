use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use wordglobe::interaction::{EventSource, ListenerId, ListenerKind, ListenerScope};
use wordglobe::placement::worst_violation;
use wordglobe::render::{Painter, SvgPainter};
use wordglobe::view::FrameId;
use wordglobe::{
    Config, FrameInput, GlobeError, GlobeView, HostSurface, Keyword, PointerEvent, Scene, SvgSurface, Viewport,
    load_config, parse_keywords, project, render_svg, step,
};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn fixture_keywords(name: &str) -> Vec<Keyword> {
    let input = std::fs::read_to_string(fixture_path(name)).expect("fixture read failed");
    parse_keywords(&input).expect("fixture parse failed")
}

fn seeded_config(seed: u64) -> Config {
    let mut config = Config::default();
    config.placement.seed = Some(seed);
    config
}

fn assert_valid_svg(svg: &str, what: &str) {
    assert!(svg.contains("<svg"), "{what}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{what}: missing </svg tag");
}

#[test]
fn climate_policy_tax_end_to_end() {
    let keywords = fixture_keywords("climate.json");
    for seed in [1, 2, 3, 17, 99] {
        let config = seeded_config(seed);
        let scene = Scene::new(&keywords, true, &config);
        let placement = scene.placement();
        assert_eq!(placement.len(), 3);
        for label in &placement.labels {
            assert!((label.position.length() - 1.0).abs() < 1e-6);
        }

        let climate = placement.labels.iter().find(|l| l.word == "climate").unwrap();
        let tax = placement.labels.iter().find(|l| l.word == "tax").unwrap();
        assert_eq!(climate.normalized, 1.0);
        assert_eq!(tax.normalized, 0.0);

        let positions: Vec<_> = placement.labels.iter().map(|l| l.position).collect();
        let normalized: Vec<_> = placement.labels.iter().map(|l| l.normalized).collect();
        assert!(worst_violation(&positions, &normalized, &config.placement) <= 1e-3);

        let projected = project(
            &placement.labels,
            0.0,
            &Viewport::new(900.0, 640.0),
            &config.projection,
        );
        assert_eq!(projected.len(), 3);
        for label in &projected {
            assert!((0.0..=1.0).contains(&label.depth));
            assert!(label.scale >= 0.62 - 1e-12 && label.scale <= 1.18 + 1e-12);
        }
        assert!(projected.windows(2).all(|w| w[0].depth <= w[1].depth));
    }
}

#[test]
fn ingest_formats_feed_the_placer() {
    let config = seeded_config(7);

    let article = fixture_keywords("article.json5");
    assert_eq!(article.len(), 10);
    let scene = Scene::new(&article, true, &config);
    assert_eq!(scene.placement().len(), 9);
    let coal = scene.placement().labels.iter().find(|l| l.word == "coal").unwrap();
    assert_eq!(coal.weight, 1.0);
    let hydrogen = scene.placement().labels.iter().find(|l| l.word == "hydrogen").unwrap();
    assert_eq!(hydrogen.weight, 0.0);
    assert_eq!(hydrogen.normalized, 0.0);

    let lines = fixture_keywords("keywords.txt");
    let words: Vec<&str> = lines.iter().map(|k| k.word.as_str()).collect();
    assert_eq!(
        words,
        vec!["inflation", "interest rates", "housing", "central bank", "wages"]
    );
}

#[test]
fn config_file_overrides_apply() {
    let config = load_config(Some(&fixture_path("config.json"))).unwrap();
    assert_eq!(config.theme.background, "#F6F8FC");
    assert_eq!(config.render.background, "#F6F8FC");
    assert_eq!(config.theme.label_high_color, "#FF0000");
    assert_eq!(config.placement.seed, Some(42));
    assert_eq!(config.placement.relax_iterations, 36);
    assert_eq!(config.projection.squash, 1.0);
    assert_eq!(config.motion.auto_rotation, 0.0);

    let scene = step(
        Scene::new(&fixture_keywords("climate.json"), true, &config),
        1.0 / 60.0,
        &FrameInput::default(),
        &config,
    );
    assert_eq!(scene.rotation().angle, 0.0);
    let svg = render_svg(&scene, &config);
    assert_valid_svg(&svg, "config");
    assert!(svg.contains("width=\"500\""));
    assert!(svg.contains("fill=\"#FF0000\""));

    let empty = step(Scene::new(&[], true, &config), 0.0, &FrameInput::default(), &config);
    assert!(render_svg(&empty, &config).contains("Nothing yet"));
}

#[test]
fn empty_and_single_keyword_sets_render() {
    let config = seeded_config(5);

    let empty = step(Scene::new(&[], true, &config), 1.0 / 60.0, &FrameInput::default(), &config);
    assert!(empty.placement().is_empty());
    let svg = render_svg(&empty, &config);
    assert_valid_svg(&svg, "empty");
    assert!(svg.contains("<ellipse"));
    assert!(svg.contains(&config.render.placeholder_text));

    let single = step(
        Scene::new(&[Keyword::new("solo", 0.3)], true, &config),
        1.0 / 60.0,
        &FrameInput::default(),
        &config,
    );
    assert_eq!(single.placement().len(), 1);
    assert_eq!(single.placement().labels[0].normalized, 0.0);
    assert!(render_svg(&single, &config).contains(">solo</text>"));
}

#[test]
fn animation_advances_between_frames() {
    let config = seeded_config(11);
    let mut scene = Scene::new(&fixture_keywords("climate.json"), true, &config);
    let mut frames = Vec::new();
    for _ in 0..3 {
        scene = step(scene, 1.0 / 60.0, &FrameInput::default(), &config);
        frames.push(render_svg(&scene, &config));
    }
    assert_ne!(frames[0], frames[1]);
    assert_ne!(frames[1], frames[2]);
    assert!((scene.rotation().angle - 3.0 * config.motion.auto_rotation).abs() < 1e-9);
}

#[test]
fn mount_without_drawing_context_fails() {
    let result = GlobeView::mount(
        SvgSurface::without_painter(400.0, 300.0),
        &fixture_keywords("climate.json"),
        true,
        seeded_config(1),
    );
    match result {
        Err(GlobeError::SurfaceUnavailable(_)) => {}
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("mount should fail without a painter"),
    }
}

#[derive(Default)]
struct HostLog {
    live: Vec<(ListenerId, ListenerKind, ListenerScope)>,
    removed: Vec<ListenerId>,
    pending: Option<FrameId>,
    cancelled: Vec<FrameId>,
}

/// Host that shares its bookkeeping so it can be inspected after the view is dropped.
struct SharedHost {
    log: Rc<RefCell<HostLog>>,
    painter: SvgPainter,
    next: u64,
}

impl SharedHost {
    fn new(log: Rc<RefCell<HostLog>>) -> Self {
        Self {
            log,
            painter: SvgPainter::new(),
            next: 0,
        }
    }
}

impl EventSource for SharedHost {
    fn add_listener(&mut self, kind: ListenerKind, scope: ListenerScope) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.log.borrow_mut().live.push((id, kind, scope));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        let mut log = self.log.borrow_mut();
        let before = log.live.len();
        log.live.retain(|(live, _, _)| *live != id);
        assert_eq!(log.live.len() + 1, before, "listener {id:?} removed twice");
        log.removed.push(id);
    }
}

impl HostSurface for SharedHost {
    fn size(&self) -> (f64, f64) {
        (640.0, 480.0)
    }

    fn painter(&mut self) -> Option<&mut dyn Painter> {
        Some(&mut self.painter)
    }

    fn request_frame(&mut self) -> FrameId {
        self.next += 1;
        let id = FrameId(self.next);
        self.log.borrow_mut().pending = Some(id);
        id
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        let mut log = self.log.borrow_mut();
        if log.pending == Some(frame) {
            log.pending = None;
        }
        log.cancelled.push(frame);
    }
}

#[test]
fn dropping_the_view_detaches_everything() {
    let log = Rc::new(RefCell::new(HostLog::default()));
    {
        let mut view = GlobeView::mount(
            SharedHost::new(Rc::clone(&log)),
            &fixture_keywords("climate.json"),
            true,
            seeded_config(3),
        )
        .unwrap();
        {
            let log = log.borrow();
            assert_eq!(log.live.len(), 5);
            let global: Vec<_> = log
                .live
                .iter()
                .filter(|(_, _, scope)| *scope == ListenerScope::Global)
                .map(|(_, kind, _)| *kind)
                .collect();
            assert_eq!(global, vec![ListenerKind::PointerUp]);
        }
        view.tick(1.0 / 60.0).unwrap();
        assert!(log.borrow().pending.is_some());
    }

    let log = log.borrow();
    assert!(log.live.is_empty());
    assert_eq!(log.removed.len(), 5);
    assert!(log.pending.is_none());
    assert_eq!(log.cancelled.len(), 1);
}

#[test]
fn explicit_unmount_then_drop_cleans_up_once() {
    let log = Rc::new(RefCell::new(HostLog::default()));
    {
        let mut view = GlobeView::mount(
            SharedHost::new(Rc::clone(&log)),
            &[],
            false,
            seeded_config(3),
        )
        .unwrap();
        view.unmount();
        assert!(!view.is_mounted());
    }
    let log = log.borrow();
    assert_eq!(log.removed.len(), 5);
    assert_eq!(log.cancelled.len(), 1);
}

#[test]
fn release_outside_the_surface_ends_the_drag() {
    let mut view = GlobeView::mount(
        SvgSurface::new(640.0, 480.0),
        &fixture_keywords("climate.json"),
        true,
        seeded_config(9),
    )
    .unwrap();

    view.dispatch(PointerEvent::Down { x: 300.0, y: 240.0 }).unwrap();
    view.dispatch(PointerEvent::Move { x: 310.0, y: 240.0 }).unwrap();
    view.dispatch(PointerEvent::Leave).unwrap();
    view.tick(1.0 / 60.0).unwrap();
    assert!(view.scene().controller().is_dragging());
    assert!(view.scene().hover().is_none());

    // Delivered by the global listener while the pointer is off the surface.
    view.dispatch(PointerEvent::Up).unwrap();
    view.tick(1.0 / 60.0).unwrap();
    assert!(!view.scene().controller().is_dragging());
    assert!(view.scene().rotation().angular_velocity > 0.0);

    let angle = view.scene().rotation().angle;
    view.tick(1.0 / 60.0).unwrap();
    assert!(view.scene().rotation().angle > angle + view.config().motion.auto_rotation);
}

#[test]
fn resize_invalidates_cached_geometry() {
    let mut view = GlobeView::mount(
        SvgSurface::new(640.0, 480.0),
        &fixture_keywords("climate.json"),
        true,
        seeded_config(4),
    )
    .unwrap();
    view.tick(1.0 / 60.0).unwrap();
    let before = *view.scene().geometry().unwrap();

    view.dispatch(PointerEvent::Resize {
        width: 1000.0,
        height: 800.0,
    })
    .unwrap();
    view.tick(1.0 / 60.0).unwrap();
    let after = *view.scene().geometry().unwrap();
    assert!(after.rx > before.rx);
    assert_eq!(after.center.x, 500.0);
    assert!(view.surface().last_frame().unwrap().contains("width=\"1000\""));
}

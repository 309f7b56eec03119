use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wordglobe::{
    Config, FrameInput, GlobeView, PointerEvent, RotationState, Scene, SvgSurface, Theme, parse_config,
    parse_keywords, render_svg, step,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GlobeRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    rotation: Option<f64>,
    seed: Option<u64>,
    active: Option<bool>,
    /// Full config document, same shape as the CLI's `--configFile`.
    config: Option<serde_json::Value>,
}

fn parse_options(options_json: Option<String>) -> Result<GlobeRenderOptions, String> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| error.to_string()),
        None => Ok(GlobeRenderOptions::default()),
    }
}

fn build_config(options: &GlobeRenderOptions) -> Result<Config, String> {
    let mut config = match &options.config {
        Some(value) => parse_config(&value.to_string()).map_err(|error| error.to_string())?,
        None => Config::default(),
    };

    if let Some(theme) = options.theme.as_deref().and_then(Theme::by_name) {
        config.render.background = theme.background.clone();
        config.theme = theme;
    }
    if let Some(font_family) = &options.font_family {
        config.theme.font_family = font_family.clone();
    }
    if let Some(width) = options.width {
        config.render.width = width;
    }
    if let Some(height) = options.height {
        config.render.height = height;
    }
    if options.seed.is_some() {
        config.placement.seed = options.seed;
    }
    Ok(config)
}

fn render_globe(keywords_json: &str, options: GlobeRenderOptions) -> Result<String, String> {
    let config = build_config(&options)?;
    let keywords = parse_keywords(keywords_json).map_err(|error| error.to_string())?;
    let mut scene = Scene::new(&keywords, options.active.unwrap_or(true), &config);
    scene.set_rotation(RotationState {
        angle: options.rotation.unwrap_or(0.0),
        angular_velocity: 0.0,
    });
    let scene = step(scene, 0.0, &FrameInput::default(), &config);
    Ok(render_svg(&scene, &config))
}

/// Renders a single still frame.
#[wasm_bindgen]
pub fn render_globe_svg(keywords_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json).map_err(|error| JsValue::from_str(&error))?;
    render_globe(keywords_json, options).map_err(|error| JsValue::from_str(&error))
}

/// Interactive globe driven by the host page's events and animation frames.
#[wasm_bindgen]
pub struct WordGlobe {
    view: GlobeView<SvgSurface>,
}

impl WordGlobe {
    fn create(keywords_json: &str, options: GlobeRenderOptions) -> Result<WordGlobe, String> {
        let config = build_config(&options)?;
        let keywords = parse_keywords(keywords_json).map_err(|error| error.to_string())?;
        let surface = SvgSurface::new(config.render.width, config.render.height);
        let view = GlobeView::mount(surface, &keywords, options.active.unwrap_or(true), config)
            .map_err(|error| error.to_string())?;
        Ok(WordGlobe { view })
    }

    fn send(&mut self, event: PointerEvent) -> Result<(), String> {
        self.view.dispatch(event).map_err(|error| error.to_string())
    }

    fn advance(&mut self, dt: f64) -> Result<String, String> {
        self.view.tick(dt).map_err(|error| error.to_string())?;
        self.view
            .surface_mut()
            .take_frames()
            .pop()
            .ok_or_else(|| "no frame was painted".to_string())
    }

    fn hover_json(&self) -> Option<String> {
        self.view
            .scene()
            .hover()
            .and_then(|hover| serde_json::to_string(hover).ok())
    }
}

#[wasm_bindgen]
impl WordGlobe {
    #[wasm_bindgen(constructor)]
    pub fn new(keywords_json: &str, options_json: Option<String>) -> Result<WordGlobe, JsValue> {
        let options = parse_options(options_json).map_err(|error| JsValue::from_str(&error))?;
        Self::create(keywords_json, options).map_err(|error| JsValue::from_str(&error))
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.send(PointerEvent::Down { x, y }).map_err(|error| JsValue::from_str(&error))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.send(PointerEvent::Move { x, y }).map_err(|error| JsValue::from_str(&error))
    }

    pub fn pointer_up(&mut self) -> Result<(), JsValue> {
        self.send(PointerEvent::Up).map_err(|error| JsValue::from_str(&error))
    }

    pub fn pointer_leave(&mut self) -> Result<(), JsValue> {
        self.send(PointerEvent::Leave).map_err(|error| JsValue::from_str(&error))
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.view.surface_mut().set_size(width, height);
        self.send(PointerEvent::Resize { width, height })
            .map_err(|error| JsValue::from_str(&error))
    }

    pub fn set_keywords(&mut self, keywords_json: &str) -> Result<(), JsValue> {
        let keywords = parse_keywords(keywords_json).map_err(|error| JsValue::from_str(&error.to_string()))?;
        self.view.set_keywords(&keywords);
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) {
        self.view.set_active(active);
    }

    /// Runs one frame of `dt` seconds and returns it as SVG.
    pub fn tick(&mut self, dt: f64) -> Result<String, JsValue> {
        self.advance(dt).map_err(|error| JsValue::from_str(&error))
    }

    /// Current hover as `{"word","weight","x","y"}` JSON, if any.
    pub fn hover(&self) -> Option<String> {
        self.hover_json()
    }

    pub fn unmount(&mut self) {
        self.view.unmount();
    }
}

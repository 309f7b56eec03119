use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How initial label directions are chosen before relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlacementStrategy {
    /// Weight-aware rejection sampling with a max-min fallback.
    #[default]
    Scatter,
    /// Golden-angle spiral in weight order. Deterministic.
    Spiral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    pub strategy: PlacementStrategy,
    pub tries_per_word: usize,
    /// Base clearance between any two labels, in radians.
    pub min_gap: f64,
    /// Extra clearance growing linearly with the heavier label's weight.
    pub weight_gap: f64,
    /// Extra clearance growing with the square of the heavier label's weight.
    pub extra_gap_big: f64,
    pub relax_iterations: usize,
    pub relax_step: f64,
    /// Fixed RNG seed. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl PlacementConfig {
    /// Cheaper profile with fewer relaxation rounds.
    pub fn light() -> Self {
        Self {
            relax_iterations: 36,
            ..Self::default()
        }
    }

    pub fn required_gap(&self, wn_a: f64, wn_b: f64) -> f64 {
        let m = wn_a.max(wn_b);
        self.min_gap + m * self.weight_gap + m * m * self.extra_gap_big
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            strategy: PlacementStrategy::Scatter,
            tries_per_word: 900,
            min_gap: 0.28,
            weight_gap: 0.16,
            extra_gap_big: 0.10,
            relax_iterations: 140,
            relax_step: 0.5,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Horizontal semi-axis as a fraction of `min(width, height)`.
    pub radius_fraction: f64,
    /// Vertical semi-axis relative to the horizontal one.
    pub squash: f64,
    pub scale_far: f64,
    pub scale_near: f64,
    pub scale_gamma: f64,
    pub alpha_floor: f64,
    pub alpha_gamma: f64,
    /// Normalized ellipse radius where the rim fade starts.
    pub rim_start: f64,
    /// Fraction of opacity removed at the silhouette.
    pub rim_strength: f64,
    pub font_min: f64,
    pub font_max: f64,
    /// Semi-axis at which `font_min`/`font_max` apply unscaled.
    pub reference_radius: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            radius_fraction: 0.42,
            squash: 0.9,
            scale_far: 0.62,
            scale_near: 1.18,
            scale_gamma: 1.2,
            alpha_floor: 0.04,
            alpha_gamma: 1.85,
            rim_start: 0.72,
            rim_strength: 0.65,
            font_min: 13.0,
            font_max: 40.0,
            reference_radius: 300.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Baseline spin per reference frame, in radians.
    pub auto_rotation: f64,
    /// Per-frame multiplier applied to drag momentum.
    pub decay: f64,
    pub reference_fps: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            auto_rotation: 0.0035,
            decay: 0.92,
            reference_fps: 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Radians of rotation per pixel of horizontal drag.
    pub sensitivity: f64,
    pub max_velocity: f64,
    pub hit_radius_factor: f64,
    /// Hit radius multiplier for the label hovered on the previous frame.
    pub latch_slack: f64,
    /// Pixels subtracted from the hover score per unit of depth.
    pub depth_bonus: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.005,
            max_velocity: 0.08,
            hit_radius_factor: 1.1,
            latch_slack: 1.25,
            depth_bonus: 24.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    pub background: String,
    pub max_labels: usize,
    pub placeholder_text: String,
    pub latitude_guides: usize,
    pub longitude_guides: usize,
    pub show_tooltip: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 640.0,
            background: "#070A12".to_string(),
            max_labels: 40,
            placeholder_text: "Analyze an article to see its keywords".to_string(),
            latitude_guides: 5,
            longitude_guides: 6,
            show_tooltip: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub placement: PlacementConfig,
    pub projection: ProjectionConfig,
    pub motion: MotionConfig,
    pub interaction: InteractionConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::midnight();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            placement: PlacementConfig::default(),
            projection: ProjectionConfig::default(),
            motion: MotionConfig::default(),
            interaction: InteractionConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    placement: Option<PlacementConfigFile>,
    projection: Option<ProjectionConfigFile>,
    motion: Option<MotionConfigFile>,
    interaction: Option<InteractionConfigFile>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_weight: Option<u16>,
    background: Option<String>,
    vignette_inner: Option<String>,
    vignette_outer: Option<String>,
    shell_highlight: Option<String>,
    shell_mid: Option<String>,
    shell_edge: Option<String>,
    shell_stroke: Option<String>,
    guide_color: Option<String>,
    guide_opacity: Option<f64>,
    label_low_color: Option<String>,
    label_high_color: Option<String>,
    placeholder_color: Option<String>,
    tooltip_background: Option<String>,
    tooltip_text_color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlacementConfigFile {
    profile: Option<String>,
    strategy: Option<PlacementStrategy>,
    tries_per_word: Option<usize>,
    min_gap: Option<f64>,
    weight_gap: Option<f64>,
    extra_gap_big: Option<f64>,
    relax_iterations: Option<usize>,
    relax_step: Option<f64>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionConfigFile {
    radius_fraction: Option<f64>,
    squash: Option<f64>,
    scale_far: Option<f64>,
    scale_near: Option<f64>,
    scale_gamma: Option<f64>,
    alpha_floor: Option<f64>,
    alpha_gamma: Option<f64>,
    rim_start: Option<f64>,
    rim_strength: Option<f64>,
    font_min: Option<f64>,
    font_max: Option<f64>,
    reference_radius: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MotionConfigFile {
    auto_rotation: Option<f64>,
    decay: Option<f64>,
    reference_fps: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InteractionConfigFile {
    sensitivity: Option<f64>,
    max_velocity: Option<f64>,
    hit_radius_factor: Option<f64>,
    latch_slack: Option<f64>,
    depth_bonus: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f64>,
    height: Option<f64>,
    max_labels: Option<usize>,
    placeholder_text: Option<String>,
    latitude_guides: Option<usize>,
    longitude_guides: Option<usize>,
    show_tooltip: Option<bool>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a config document (JSON, with JSON5 accepted as a fallback) and
/// merges it over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents)
            .map_err(|_| anyhow::anyhow!("invalid config file: {json_err}"))?,
    };
    Ok(merge_config_file(Config::default(), parsed))
}

fn merge_config_file(mut config: Config, parsed: ConfigFile) -> Config {
    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::by_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => log::warn!("unknown theme {theme_name:?}, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_weight {
            config.theme.font_weight = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.vignette_inner {
            config.theme.vignette_inner = v;
        }
        if let Some(v) = vars.vignette_outer {
            config.theme.vignette_outer = v;
        }
        if let Some(v) = vars.shell_highlight {
            config.theme.shell_highlight = v;
        }
        if let Some(v) = vars.shell_mid {
            config.theme.shell_mid = v;
        }
        if let Some(v) = vars.shell_edge {
            config.theme.shell_edge = v;
        }
        if let Some(v) = vars.shell_stroke {
            config.theme.shell_stroke = v;
        }
        if let Some(v) = vars.guide_color {
            config.theme.guide_color = v;
        }
        if let Some(v) = vars.guide_opacity {
            config.theme.guide_opacity = v;
        }
        if let Some(v) = vars.label_low_color {
            config.theme.label_low_color = v;
        }
        if let Some(v) = vars.label_high_color {
            config.theme.label_high_color = v;
        }
        if let Some(v) = vars.placeholder_color {
            config.theme.placeholder_color = v;
        }
        if let Some(v) = vars.tooltip_background {
            config.theme.tooltip_background = v;
        }
        if let Some(v) = vars.tooltip_text_color {
            config.theme.tooltip_text_color = v;
        }
    }

    if let Some(placement) = parsed.placement {
        if let Some(profile) = placement.profile.as_deref() {
            if profile.eq_ignore_ascii_case("light") {
                config.placement = PlacementConfig::light();
            }
        }
        if let Some(v) = placement.strategy {
            config.placement.strategy = v;
        }
        if let Some(v) = placement.tries_per_word {
            config.placement.tries_per_word = v;
        }
        if let Some(v) = placement.min_gap {
            config.placement.min_gap = v;
        }
        if let Some(v) = placement.weight_gap {
            config.placement.weight_gap = v;
        }
        if let Some(v) = placement.extra_gap_big {
            config.placement.extra_gap_big = v;
        }
        if let Some(v) = placement.relax_iterations {
            config.placement.relax_iterations = v;
        }
        if let Some(v) = placement.relax_step {
            config.placement.relax_step = v;
        }
        if placement.seed.is_some() {
            config.placement.seed = placement.seed;
        }
    }

    if let Some(projection) = parsed.projection {
        if let Some(v) = projection.radius_fraction {
            config.projection.radius_fraction = v;
        }
        if let Some(v) = projection.squash {
            config.projection.squash = v;
        }
        if let Some(v) = projection.scale_far {
            config.projection.scale_far = v;
        }
        if let Some(v) = projection.scale_near {
            config.projection.scale_near = v;
        }
        if let Some(v) = projection.scale_gamma {
            config.projection.scale_gamma = v;
        }
        if let Some(v) = projection.alpha_floor {
            config.projection.alpha_floor = v;
        }
        if let Some(v) = projection.alpha_gamma {
            config.projection.alpha_gamma = v;
        }
        if let Some(v) = projection.rim_start {
            config.projection.rim_start = v;
        }
        if let Some(v) = projection.rim_strength {
            config.projection.rim_strength = v;
        }
        if let Some(v) = projection.font_min {
            config.projection.font_min = v;
        }
        if let Some(v) = projection.font_max {
            config.projection.font_max = v;
        }
        if let Some(v) = projection.reference_radius {
            config.projection.reference_radius = v;
        }
    }

    if let Some(motion) = parsed.motion {
        if let Some(v) = motion.auto_rotation {
            config.motion.auto_rotation = v;
        }
        if let Some(v) = motion.decay {
            config.motion.decay = v;
        }
        if let Some(v) = motion.reference_fps {
            config.motion.reference_fps = v;
        }
    }

    if let Some(interaction) = parsed.interaction {
        if let Some(v) = interaction.sensitivity {
            config.interaction.sensitivity = v;
        }
        if let Some(v) = interaction.max_velocity {
            config.interaction.max_velocity = v;
        }
        if let Some(v) = interaction.hit_radius_factor {
            config.interaction.hit_radius_factor = v;
        }
        if let Some(v) = interaction.latch_slack {
            config.interaction.latch_slack = v;
        }
        if let Some(v) = interaction.depth_bonus {
            config.interaction.depth_bonus = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.max_labels {
            config.render.max_labels = v;
        }
        if let Some(v) = render.placeholder_text {
            config.render.placeholder_text = v;
        }
        if let Some(v) = render.latitude_guides {
            config.render.latitude_guides = v;
        }
        if let Some(v) = render.longitude_guides {
            config.render.longitude_guides = v;
        }
        if let Some(v) = render.show_tooltip {
            config.render.show_tooltip = v;
        }
    }

    config.render.background = config.theme.background.clone();

    config
}

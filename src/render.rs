use crate::config::{Config, RenderConfig};
use crate::placement::PlacedLabel;
use crate::projection::Ellipse;
use crate::scene::Scene;
use crate::theme::Theme;
use anyhow::Result;
use glam::DVec2;
use std::f64::consts::PI;
use std::fmt::Write as _;
use std::path::Path;

/// Vertical squash applied to latitude rings so they read as circles seen
/// slightly from above.
const LATITUDE_TILT: f64 = 0.16;
const PLACEHOLDER_FONT_SIZE: f64 = 16.0;
const TOOLTIP_FONT_SIZE: f64 = 13.0;
/// Rough advance width of one character, relative to the font size.
const CHAR_WIDTH: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub color: String,
    pub opacity: f64,
}

impl Paint {
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            opacity: 1.0,
        }
    }

    pub fn with_opacity(color: impl Into<String>, opacity: f64) -> Self {
        Self {
            color: color.into(),
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
    pub opacity: f64,
}

/// Radial gradient in drawing coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: DVec2,
    pub radius: f64,
    pub focus: DVec2,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Paint),
    Radial(RadialGradient),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun<'a> {
    pub x: f64,
    pub y: f64,
    pub text: &'a str,
    pub font_family: &'a str,
    pub font_size: f64,
    pub font_weight: u16,
    pub anchor: TextAnchor,
    pub fill: Paint,
}

/// Drawing backend for one frame at a time.
pub trait Painter {
    fn begin_frame(&mut self, width: f64, height: f64);
    fn fill_rect(&mut self, origin: DVec2, size: DVec2, corner_radius: f64, fill: &Fill);
    fn fill_ellipse(&mut self, center: DVec2, rx: f64, ry: f64, fill: &Fill);
    fn stroke_ellipse(&mut self, center: DVec2, rx: f64, ry: f64, stroke: &Paint, width: f64);
    fn draw_text(&mut self, run: &TextRun<'_>);
    fn end_frame(&mut self);
}

/// Painter that serializes each frame to a standalone SVG document.
#[derive(Debug, Default)]
pub struct SvgPainter {
    body: String,
    defs: String,
    header: String,
    gradient_count: usize,
    frames: Vec<String>,
}

impl SvgPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every finished frame, oldest first.
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }

    pub fn take_frames(&mut self) -> Vec<String> {
        std::mem::take(&mut self.frames)
    }

    fn fill_attrs(&mut self, fill: &Fill) -> String {
        match fill {
            Fill::Solid(paint) => paint_attrs("fill", paint),
            Fill::Radial(gradient) => {
                self.gradient_count += 1;
                let id = format!("grad-{}", self.gradient_count);
                let _ = write!(
                    self.defs,
                    "<radialGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fx=\"{:.2}\" fy=\"{:.2}\">",
                    gradient.center.x, gradient.center.y, gradient.radius, gradient.focus.x, gradient.focus.y
                );
                for stop in &gradient.stops {
                    let _ = write!(
                        self.defs,
                        "<stop offset=\"{:.3}\" stop-color=\"{}\" stop-opacity=\"{:.3}\"/>",
                        stop.offset.clamp(0.0, 1.0),
                        stop.color,
                        stop.opacity.clamp(0.0, 1.0)
                    );
                }
                self.defs.push_str("</radialGradient>");
                format!("fill=\"url(#{id})\"")
            }
        }
    }
}

fn paint_attrs(kind: &str, paint: &Paint) -> String {
    if paint.opacity >= 1.0 {
        format!("{kind}=\"{}\"", paint.color)
    } else {
        format!("{kind}=\"{}\" {kind}-opacity=\"{:.3}\"", paint.color, paint.opacity)
    }
}

impl Painter for SvgPainter {
    fn begin_frame(&mut self, width: f64, height: f64) {
        self.body.clear();
        self.defs.clear();
        self.gradient_count = 0;
        self.header = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        );
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, corner_radius: f64, fill: &Fill) {
        let fill = self.fill_attrs(fill);
        let corners = if corner_radius > 0.0 {
            format!(" rx=\"{corner_radius:.2}\" ry=\"{corner_radius:.2}\"")
        } else {
            String::new()
        };
        let _ = write!(
            self.body,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"{corners} {fill}/>",
            origin.x, origin.y, size.x, size.y
        );
    }

    fn fill_ellipse(&mut self, center: DVec2, rx: f64, ry: f64, fill: &Fill) {
        let fill = self.fill_attrs(fill);
        let _ = write!(
            self.body,
            "<ellipse cx=\"{:.2}\" cy=\"{:.2}\" rx=\"{rx:.2}\" ry=\"{ry:.2}\" {fill}/>",
            center.x, center.y
        );
    }

    fn stroke_ellipse(&mut self, center: DVec2, rx: f64, ry: f64, stroke: &Paint, width: f64) {
        let _ = write!(
            self.body,
            "<ellipse cx=\"{:.2}\" cy=\"{:.2}\" rx=\"{rx:.2}\" ry=\"{ry:.2}\" fill=\"none\" {} stroke-width=\"{width:.2}\"/>",
            center.x,
            center.y,
            paint_attrs("stroke", stroke)
        );
    }

    fn draw_text(&mut self, run: &TextRun<'_>) {
        let anchor = match run.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
        };
        let _ = write!(
            self.body,
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{anchor}\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{:.2}\" font-weight=\"{}\" {}>{}</text>",
            run.x,
            run.y,
            escape_xml(run.font_family),
            run.font_size,
            run.font_weight,
            paint_attrs("fill", &run.fill),
            escape_xml(run.text)
        );
    }

    fn end_frame(&mut self) {
        let mut svg = String::with_capacity(self.header.len() + self.defs.len() + self.body.len() + 32);
        svg.push_str(&self.header);
        if !self.defs.is_empty() {
            svg.push_str("<defs>");
            svg.push_str(&self.defs);
            svg.push_str("</defs>");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        self.frames.push(svg);
    }
}

/// Paints the scene's last stepped frame: backdrop, sphere shell, guides,
/// then labels back to front, or the placeholder when there is nothing to show.
pub fn draw_frame<P: Painter + ?Sized>(painter: &mut P, scene: &Scene, config: &Config) {
    let theme = &config.theme;
    let viewport = scene.viewport();
    let ellipse = scene
        .geometry()
        .copied()
        .unwrap_or_else(|| viewport.ellipse(&config.projection));

    painter.begin_frame(viewport.width, viewport.height);
    draw_backdrop(painter, viewport.width, viewport.height, &ellipse, theme, &config.render);
    draw_guides(painter, &ellipse, scene.frame_angle(), theme, &config.render);

    if scene.shows_placeholder() {
        painter.draw_text(&TextRun {
            x: ellipse.center.x,
            y: ellipse.center.y,
            text: &config.render.placeholder_text,
            font_family: &theme.font_family,
            font_size: PLACEHOLDER_FONT_SIZE,
            font_weight: 400,
            anchor: TextAnchor::Middle,
            fill: Paint::solid(&theme.placeholder_color),
        });
        painter.end_frame();
        return;
    }

    for label in scene.projected() {
        painter.draw_text(&TextRun {
            x: label.x,
            y: label.y,
            text: &label.word,
            font_family: &theme.font_family,
            font_size: label.font_size,
            font_weight: theme.font_weight,
            anchor: TextAnchor::Middle,
            fill: Paint::with_opacity(theme.label_color(label.normalized).to_hex(), label.fade),
        });
    }

    if config.render.show_tooltip {
        if let Some(hover) = scene.hover() {
            let text = format!("{} · {:.2}", hover.word, hover.weight);
            let width = text.chars().count() as f64 * TOOLTIP_FONT_SIZE * CHAR_WIDTH + 16.0;
            let height = TOOLTIP_FONT_SIZE + 12.0;
            let origin = DVec2::new(
                (hover.x + 14.0).min(viewport.width - width).max(0.0),
                (hover.y - height - 10.0).max(0.0),
            );
            painter.fill_rect(
                origin,
                DVec2::new(width, height),
                6.0,
                &Fill::Solid(Paint::with_opacity(&theme.tooltip_background, 0.92)),
            );
            painter.draw_text(&TextRun {
                x: origin.x + 8.0,
                y: origin.y + height / 2.0,
                text: &text,
                font_family: &theme.font_family,
                font_size: TOOLTIP_FONT_SIZE,
                font_weight: 500,
                anchor: TextAnchor::Start,
                fill: Paint::solid(&theme.tooltip_text_color),
            });
        }
    }

    painter.end_frame();
}

fn draw_backdrop<P: Painter + ?Sized>(
    painter: &mut P,
    width: f64,
    height: f64,
    ellipse: &Ellipse,
    theme: &Theme,
    render: &RenderConfig,
) {
    painter.fill_rect(
        DVec2::ZERO,
        DVec2::new(width, height),
        0.0,
        &Fill::Solid(Paint::solid(&render.background)),
    );

    painter.fill_rect(
        DVec2::ZERO,
        DVec2::new(width, height),
        0.0,
        &Fill::Radial(RadialGradient {
            center: ellipse.center,
            radius: width.max(height) * 0.75,
            focus: ellipse.center,
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: theme.vignette_inner.clone(),
                    opacity: 0.9,
                },
                GradientStop {
                    offset: 1.0,
                    color: theme.vignette_outer.clone(),
                    opacity: 0.9,
                },
            ],
        }),
    );

    // Shell lit from the upper left.
    painter.fill_ellipse(
        ellipse.center,
        ellipse.rx,
        ellipse.ry,
        &Fill::Radial(RadialGradient {
            center: ellipse.center,
            radius: ellipse.rx,
            focus: ellipse.center - DVec2::new(0.35 * ellipse.rx, 0.4 * ellipse.ry),
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: theme.shell_highlight.clone(),
                    opacity: 0.55,
                },
                GradientStop {
                    offset: 0.6,
                    color: theme.shell_mid.clone(),
                    opacity: 0.45,
                },
                GradientStop {
                    offset: 1.0,
                    color: theme.shell_edge.clone(),
                    opacity: 0.6,
                },
            ],
        }),
    );
    painter.stroke_ellipse(
        ellipse.center,
        ellipse.rx,
        ellipse.ry,
        &Paint::with_opacity(&theme.shell_stroke, 0.6),
        1.2,
    );
}

fn draw_guides<P: Painter + ?Sized>(
    painter: &mut P,
    ellipse: &Ellipse,
    angle: f64,
    theme: &Theme,
    render: &RenderConfig,
) {
    let guide = Paint::with_opacity(&theme.guide_color, theme.guide_opacity);

    let rings = render.latitude_guides;
    for i in 1..=rings {
        let phi = PI * i as f64 / (rings + 1) as f64;
        let (sin_phi, cos_phi) = phi.sin_cos();
        let center = DVec2::new(ellipse.center.x, ellipse.center.y - cos_phi * ellipse.ry);
        let rx = sin_phi * ellipse.rx;
        painter.stroke_ellipse(center, rx, rx * LATITUDE_TILT, &guide, 0.8);
    }

    // A meridian and its antipode share one projected ellipse, so half a turn
    // of azimuths covers the sphere.
    let meridians = render.longitude_guides;
    for k in 0..meridians {
        let theta = angle + PI * k as f64 / meridians as f64;
        let rx = theta.cos().abs() * ellipse.rx;
        if rx < 0.5 {
            continue;
        }
        let facing = 0.35 + 0.65 * theta.cos().abs();
        let paint = Paint::with_opacity(&theme.guide_color, theme.guide_opacity * facing);
        painter.stroke_ellipse(ellipse.center, rx, ellipse.ry, &paint, 0.8);
    }
}

/// Renders the scene's last stepped frame as a standalone SVG document.
pub fn render_svg(scene: &Scene, config: &Config) -> String {
    let mut painter = SvgPainter::new();
    draw_frame(&mut painter, scene, config);
    painter.take_frames().pop().unwrap_or_default()
}

/// Plain-text listing of a placement, heaviest first.
pub fn render_keyword_list(labels: &[PlacedLabel]) -> String {
    let mut out = String::new();
    for label in labels {
        let _ = writeln!(
            out,
            "{:<24} {:.3}  wn={:.3}  theta={:+.3}  phi={:.3}",
            label.word,
            label.weight,
            label.normalized,
            label.theta(),
            label.phi()
        );
    }
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width as f32, render_cfg.height as f32)
        .ok_or_else(|| anyhow::anyhow!("invalid output size {}x{}", render_cfg.width, render_cfg.height))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

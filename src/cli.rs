use crate::config::{Config, load_config};
use crate::ingest::parse_keywords;
use crate::interaction::RotationState;
use crate::render::{render_keyword_list, render_svg, write_output_svg};
use crate::scene::{FrameInput, PointerEvent, Scene, step};
use crate::scene_dump::{scene_dump_json, write_scene_dump};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "wordglobe", version, about = "Render weighted keywords on a rotating globe")]
pub struct Args {
    /// Keyword file (JSON, JSON5 or `word weight` lines) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for svg, list and json.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, placement, projection, ...)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width, overrides the config file
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Height, overrides the config file
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,

    /// Initial rotation in radians
    #[arg(long = "rotation", default_value_t = 0.0, allow_negative_numbers = true)]
    pub rotation: f64,

    /// Render an animation sequence of this many frames (stem-0001.svg, ...)
    #[arg(long = "frames", default_value_t = 1)]
    pub frames: usize,

    /// Placement seed for reproducible layouts
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Pointer position `x,y` to probe hover with
    #[arg(long = "pointer", value_parser = parse_point)]
    pub pointer: Option<(f64, f64)>,

    /// Render the placeholder frame instead of the keywords
    #[arg(long = "inactive")]
    pub inactive: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    List,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::List => "txt",
            OutputFormat::Json => "json",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if args.seed.is_some() {
        config.placement.seed = args.seed;
    }

    let keywords = if args.inactive && args.input.is_none() {
        Vec::new()
    } else {
        parse_keywords(&read_input(args.input.as_deref())?)?
    };
    info!("read {} keywords", keywords.len());

    let mut scene = Scene::new(&keywords, !args.inactive, &config);
    scene.set_rotation(RotationState {
        angle: args.rotation,
        angular_velocity: 0.0,
    });
    let probe = FrameInput::new(
        args.pointer
            .map(|(x, y)| vec![PointerEvent::Move { x, y }])
            .unwrap_or_default(),
    );
    let dt = 1.0 / config.motion.reference_fps.max(1.0);

    match args.output_format {
        OutputFormat::List => {
            let list = render_keyword_list(&scene.placement().labels);
            write_output_svg(&list, args.output.as_deref())?;
        }
        OutputFormat::Json => {
            let scene = step(scene, dt, &probe, &config);
            match args.output.as_deref() {
                Some(path) => write_scene_dump(path, &scene)?,
                None => println!("{}", scene_dump_json(&scene)?),
            }
        }
        OutputFormat::Svg | OutputFormat::Png if args.frames > 1 => {
            let output = ensure_output(&args.output, args.output_format.extension())?;
            let mut input = probe;
            for index in 1..=args.frames {
                scene = step(scene, dt, &input, &config);
                input = FrameInput::default();
                let path = frame_path(&output, index, args.output_format.extension());
                write_frame(&render_svg(&scene, &config), args.output_format, Some(&path), &config)?;
            }
            info!("wrote {} frames next to {}", args.frames, output.display());
        }
        OutputFormat::Svg | OutputFormat::Png => {
            let scene = step(scene, dt, &probe, &config);
            if let Some(hover) = scene.hover() {
                info!("hover: {} ({:.2})", hover.word, hover.weight);
            }
            let svg = render_svg(&scene, &config);
            if args.output_format == OutputFormat::Png {
                let output = ensure_output(&args.output, "png")?;
                write_frame(&svg, args.output_format, Some(&output), &config)?;
            } else {
                write_frame(&svg, args.output_format, args.output.as_deref(), &config)?;
            }
        }
    }

    Ok(())
}

fn write_frame(svg: &str, format: OutputFormat, output: Option<&Path>, config: &Config) -> Result<()> {
    match (format, output) {
        (OutputFormat::Png, Some(path)) => write_png(svg, path, config),
        _ => write_output_svg(svg, output),
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, path: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, path, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _path: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

/// `out/globe.svg`, frame 3 -> `out/globe-0003.svg`.
fn frame_path(output: &Path, index: usize, ext: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("frame");
    output.with_file_name(format!("{stem}-{index:04}.{ext}"))
}

fn parse_point(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got {value:?}"))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad x: {e}"))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad y: {e}"))?;
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_paths_are_numbered() {
        assert_eq!(
            frame_path(Path::new("out/globe.svg"), 3, "svg"),
            PathBuf::from("out/globe-0003.svg")
        );
        assert_eq!(frame_path(Path::new("spin.png"), 12, "png"), PathBuf::from("spin-0012.png"));
    }

    #[test]
    fn parses_pointer_probe() {
        assert_eq!(parse_point("10, 20.5"), Ok((10.0, 20.5)));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn args_accept_long_flag_names() {
        let args = Args::try_parse_from([
            "wordglobe",
            "-i",
            "words.json",
            "--outputFormat",
            "png",
            "--rotation",
            "-0.5",
            "--pointer",
            "1,2",
            "--seed",
            "7",
        ])
        .unwrap();
        assert_eq!(args.output_format, OutputFormat::Png);
        assert_eq!(args.rotation, -0.5);
        assert_eq!(args.pointer, Some((1.0, 2.0)));
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.frames, 1);
    }
}

//! Lumen - headless driver for the progressive path tracer.
//!
//! Plays the role of the interactive application: owns the scene and
//! camera, drives the frame loop and writes out the converged image.

mod output;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lumen_core::{load_scene, save_scene, Scene};
use lumen_math::Vec3;
use lumen_renderer::{Camera, Partition, RenderSettings, Renderer, SamplingMode, ToneCurve};

/// Render a sphere scene with progressive path tracing
#[derive(Parser, Debug)]
#[command(name = "lumen", version, about)]
struct Cli {
    /// Image width in pixels
    #[arg(short = 'W', long, default_value_t = 640)]
    width: u32,

    /// Image height in pixels
    #[arg(short = 'H', long, default_value_t = 360)]
    height: u32,

    /// Frames to accumulate
    #[arg(short, long, default_value_t = 64)]
    frames: u32,

    /// Maximum bounces per path
    #[arg(long)]
    bounces: Option<u32>,

    /// Trace on the calling thread only
    #[arg(long)]
    single_threaded: bool,

    /// Show each frame on its own instead of averaging
    #[arg(long)]
    no_accumulate: bool,

    /// Split parallel work into square tiles of this size instead of rows
    #[arg(long)]
    tiles: Option<u32>,

    /// Seed mixed into every pixel's random stream
    #[arg(long)]
    seed: Option<u64>,

    /// Repeat the same samples every frame
    #[arg(long)]
    fixed_sampling: bool,

    /// Tone curve applied before quantization
    #[arg(long, value_enum)]
    tone: Option<CliTone>,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 45.0)]
    fov: f32,

    /// Camera position as x,y,z
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,6")]
    eye: Vec3,

    /// Scene file (JSON); the demo scene is used when omitted
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Renderer settings file (JSON); command-line flags override it
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output image (.png or .ppm)
    #[arg(short, long, default_value = "lumen.png")]
    output: PathBuf,

    /// Also write the scene that was rendered to this JSON file
    #[arg(long)]
    dump_scene: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTone {
    Gamma,
    Srgb,
    Linear,
}

impl From<CliTone> for ToneCurve {
    fn from(tone: CliTone) -> Self {
        match tone {
            CliTone::Gamma => ToneCurve::Gamma,
            CliTone::Srgb => ToneCurve::Srgb,
            CliTone::Linear => ToneCurve::Linear,
        }
    }
}

fn parse_vec3(text: &str) -> Result<Vec3, String> {
    let parts = text
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z but got {} value(s)", parts.len())),
    }
}

impl Cli {
    /// Settings file first, then flags on top.
    fn render_settings(&self) -> Result<RenderSettings> {
        let mut settings = match &self.settings {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings {:?}", path))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse settings {:?}", path))?
            }
            None => RenderSettings::default(),
        };

        if let Some(bounces) = self.bounces {
            settings.max_bounces = bounces;
        }
        if self.single_threaded {
            settings.multi_threaded = false;
        }
        if self.no_accumulate {
            settings.accumulate = false;
        }
        if let Some(size) = self.tiles {
            settings.partition = Partition::Tiles { size };
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if self.fixed_sampling {
            settings.sampling = SamplingMode::Fixed;
        }
        if let Some(tone) = self.tone {
            settings.tone = tone.into();
        }

        Ok(settings)
    }

    fn scene(&self) -> Result<Scene> {
        match &self.scene {
            Some(path) => load_scene(path).with_context(|| format!("Failed to load scene {:?}", path)),
            None => Ok(Scene::demo()),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    log::info!("Starting Lumen");

    let scene = cli.scene()?;
    let settings = cli.render_settings()?;
    if let Some(path) = &cli.dump_scene {
        save_scene(&scene, path).with_context(|| format!("Failed to write scene {:?}", path))?;
    }

    let eye = cli.eye;
    let camera = Camera::new(cli.fov, 0.1, 100.0)
        .with_position(eye)
        .looking_at(Vec3::ZERO)
        .with_viewport(cli.width, cli.height);

    let mut renderer = Renderer::new(settings);
    renderer.on_resize(cli.width, cli.height);

    log::info!(
        "Rendering {}x{} for {} frame(s), {} bounce(s), {}",
        cli.width,
        cli.height,
        cli.frames,
        renderer.settings().max_bounces,
        if renderer.settings().multi_threaded { "multi-threaded" } else { "single-threaded" }
    );

    let start = Instant::now();
    let mut slowest = Duration::ZERO;
    for _ in 0..cli.frames {
        let report = renderer.render(&scene, &camera);
        slowest = slowest.max(report.elapsed);
    }
    log::info!(
        "Rendered {} frame(s) in {:.2?} (slowest {:.2?})",
        cli.frames,
        start.elapsed(),
        slowest
    );

    output::save_image(renderer.final_image(), &cli.output)
        .with_context(|| format!("Failed to save {:?}", cli.output))?;
    log::info!("Saved to {:?}", cli.output);

    Ok(())
}

//! Progressive path tracing renderer.
//!
//! Each `render` call traces one new sample per pixel, adds it into the
//! accumulation buffer and rebuilds the display image from the running
//! average. Leaving camera and scene untouched lets the image converge.

use std::time::{Duration, Instant};

use lumen_core::{Scene, SceneError};
use lumen_math::{color_to_rgba, linear_to_gamma, linear_to_srgb, Color, Ray, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::RayCamera;
use crate::dispatch::{dispatch_for, Partition};
use crate::hittable::trace_ray;
use crate::material::scatter;
use crate::sampler::PixelSampler;
use crate::{AccumulationBuffer, DisplayImage};

/// Offset along the normal for bounce origins, to avoid self-intersection.
const SELF_INTERSECTION_OFFSET: f32 = 1e-4;

/// How random streams relate across frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Fresh samples every frame; the average converges
    #[default]
    Progressive,
    /// Every frame repeats frame 1's samples
    Fixed,
}

/// Curve applied to the averaged radiance before quantization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneCurve {
    /// Gamma 2.0
    #[default]
    Gamma,
    /// sRGB transfer function
    Srgb,
    /// No curve, clamp only
    Linear,
}

impl ToneCurve {
    /// Apply the curve per channel.
    pub fn apply(self, color: Color) -> Color {
        match self {
            ToneCurve::Gamma => Color::new(
                linear_to_gamma(color.x),
                linear_to_gamma(color.y),
                linear_to_gamma(color.z),
            ),
            ToneCurve::Srgb => Color::new(
                linear_to_srgb(color.x),
                linear_to_srgb(color.y),
                linear_to_srgb(color.z),
            ),
            ToneCurve::Linear => color,
        }
    }
}

/// Renderer settings, exposed to the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Average successive frames instead of showing single samples
    pub accumulate: bool,
    /// Fan each frame out over the rayon pool
    pub multi_threaded: bool,
    /// Path depth cap
    pub max_bounces: u32,
    /// Work split used when `multi_threaded` is set
    pub partition: Partition,
    pub sampling: SamplingMode,
    /// Mixed into every pixel's random stream
    pub seed: u64,
    /// Radiance returned by rays that escape the scene
    pub sky_color: Color,
    pub tone: ToneCurve,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            accumulate: true,
            multi_threaded: true,
            max_bounces: 5,
            partition: Partition::Rows,
            sampling: SamplingMode::Progressive,
            seed: 0,
            sky_color: Color::new(0.6, 0.7, 0.9),
            tone: ToneCurve::Gamma,
        }
    }
}

/// What happened during one `render` call.
#[derive(Debug)]
pub struct FrameReport {
    /// Frame index the display image was averaged over
    pub frame_index: u32,
    /// Pixels traced this frame
    pub pixels: usize,
    pub elapsed: Duration,
    /// Recoverable scene problems seen this frame
    pub diagnostics: Vec<SceneError>,
}

/// Trace one path and return its radiance.
///
/// Throughput starts at one and is multiplied by each hit's albedo, so a
/// bounce can only attenuate. Emission and the sky term are weighted by the
/// throughput at the moment they are reached.
pub fn trace_path(
    primary: Ray,
    scene: &Scene,
    settings: &RenderSettings,
    sampler: &mut PixelSampler,
) -> Color {
    let mut ray = primary;
    let mut throughput = Color::ONE;
    let mut radiance = Color::ZERO;

    for _ in 0..settings.max_bounces {
        if !ray.is_traceable() {
            break;
        }

        let Some(hit) = trace_ray(&ray, scene) else {
            radiance += settings.sky_color * throughput;
            break;
        };

        let material = scene.material_or_default(scene.spheres[hit.sphere_index].material_index);

        radiance += material.emission() * throughput;
        throughput *= material.albedo;

        let direction = scatter(ray.direction, &hit, material, sampler);
        ray = Ray::new(hit.point + hit.normal * SELF_INTERSECTION_OFFSET, direction);
    }

    radiance
}

/// The progressive renderer.
pub struct Renderer {
    settings: RenderSettings,
    accumulation: AccumulationBuffer,
    final_image: DisplayImage,
    frame_index: u32,
    frames_in_buffer: u32,
    reported: Vec<String>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl Renderer {
    /// Create a renderer with an empty viewport.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            accumulation: AccumulationBuffer::default(),
            final_image: DisplayImage::default(),
            frame_index: 1,
            frames_in_buffer: 0,
            reported: Vec::new(),
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Mutable settings. Changing them does not reset accumulation; call
    /// `reset_frame_index` if the change should discard history.
    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    /// Frames averaged into the next display image. Never zero.
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.accumulation.width(), self.accumulation.height())
    }

    pub fn final_image(&self) -> &DisplayImage {
        &self.final_image
    }

    pub fn accumulation(&self) -> &AccumulationBuffer {
        &self.accumulation
    }

    /// Averaged radiance at (x, y) for the most recent frame, before the
    /// tone curve.
    pub fn averaged(&self, x: u32, y: u32) -> Color {
        self.accumulation.get(x, y) / self.frames_in_buffer.max(1) as f32
    }

    /// Reallocate buffers for a new viewport. No-op if unchanged.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if self.viewport() == (width, height) {
            return;
        }

        log::info!("Renderer resized to {}x{}", width, height);
        self.accumulation.resize(width, height);
        self.final_image = DisplayImage::new(width, height);
        self.frame_index = 1;
        self.frames_in_buffer = 0;
    }

    /// Drop accumulated history; the next frame starts a fresh average.
    pub fn reset_frame_index(&mut self) {
        self.accumulation.clear();
        self.frame_index = 1;
        self.frames_in_buffer = 0;
    }

    /// Render one frame.
    ///
    /// Blocks until every pixel is done. The renderer follows the camera's
    /// viewport, resizing itself first if the two disagree.
    pub fn render<C: RayCamera + ?Sized>(&mut self, scene: &Scene, camera: &C) -> FrameReport {
        let start = Instant::now();

        let (width, height) = camera.viewport();
        self.on_resize(width, height);
        let diagnostics = self.check_scene(scene);

        let directions = camera.ray_directions();
        if self.accumulation.is_empty() || directions.len() != self.accumulation.len() {
            if !self.accumulation.is_empty() {
                log::warn!(
                    "Camera provides {} ray directions for a {}x{} viewport; skipping frame",
                    directions.len(),
                    width,
                    height
                );
            }
            return FrameReport {
                frame_index: self.frame_index,
                pixels: 0,
                elapsed: start.elapsed(),
                diagnostics,
            };
        }

        if !self.settings.accumulate {
            self.frame_index = 1;
        }
        if self.frame_index == 1 {
            self.accumulation.clear();
        }

        let settings = self.settings.clone();
        let frame_index = self.frame_index;
        let stream_frame = match settings.sampling {
            SamplingMode::Progressive => frame_index,
            SamplingMode::Fixed => 1,
        };
        let origin = camera.origin();

        let shade = |x: u32, y: u32| {
            let index = y * width + x;
            let mut sampler = PixelSampler::new(index, stream_frame, settings.seed);
            let primary = Ray::new(origin, directions[index as usize]);
            trace_path(primary, scene, &settings, &mut sampler)
        };

        let dispatch = dispatch_for(settings.multi_threaded, settings.partition);
        dispatch.accumulate(&mut self.accumulation, &shade);

        let scale = 1.0 / frame_index as f32;
        let tone = settings.tone;
        let to_display = move |sum: Color| color_to_rgba(tone.apply(sum * scale));
        dispatch.resolve(
            self.accumulation.as_slice(),
            &mut self.final_image.pixels,
            &to_display,
        );

        self.frames_in_buffer = frame_index;
        if settings.accumulate {
            self.frame_index += 1;
        } else {
            self.frame_index = 1;
        }

        let elapsed = start.elapsed();
        log::debug!(
            "Frame {} ({}x{}, {}) in {:.2?}",
            frame_index,
            width,
            height,
            dispatch.name(),
            elapsed
        );

        FrameReport {
            frame_index,
            pixels: self.accumulation.len(),
            elapsed,
            diagnostics,
        }
    }

    /// Collect scene diagnostics, logging them when they change.
    fn check_scene(&mut self, scene: &Scene) -> Vec<SceneError> {
        let diagnostics = scene.validate();
        let messages: Vec<String> = diagnostics.iter().map(|d| d.to_string()).collect();

        if messages != self.reported {
            for (diagnostic, message) in diagnostics.iter().zip(&messages) {
                match diagnostic {
                    SceneError::NonPositiveRadius { .. } => log::debug!("{}", message),
                    _ => log::warn!("{}", message),
                }
            }
            self.reported = messages;
        }

        diagnostics
    }
}

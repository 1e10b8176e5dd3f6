//! Lumen Renderer - progressive CPU path tracing of analytic spheres.
//!
//! One `Renderer::render` call adds one sample per pixel to a running sum;
//! the display image is the running average, so a still camera converges
//! towards the noise-free result.
//!
//! ```ignore
//! use lumen_core::Scene;
//! use lumen_renderer::{Camera, Renderer, RenderSettings};
//!
//! let scene = Scene::demo();
//! let camera = Camera::default().with_viewport(320, 180);
//! let mut renderer = Renderer::new(RenderSettings::default());
//! for _ in 0..16 {
//!     renderer.render(&scene, &camera);
//! }
//! let rgba = renderer.final_image().as_bytes();
//! ```

mod buffer;
mod bucket;
mod camera;
mod dispatch;
mod hittable;
mod material;
mod renderer;
pub mod sampler;

pub use buffer::{AccumulationBuffer, DisplayImage};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, CameraInput, RayCamera};
pub use dispatch::{dispatch_for, FrameDispatch, Parallel, Partition, Sequential, ShadeFn};
pub use hittable::{hit_sphere, trace_ray, HitRecord};
pub use material::{reflect, scatter};
pub use renderer::{trace_path, FrameReport, RenderSettings, Renderer, SamplingMode, ToneCurve};

/// Re-export math types from lumen_math
pub use lumen_math::{Color, Interval, Ray, Vec3};

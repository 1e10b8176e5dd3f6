//! Lumen Core - data-only scene model for the progressive path tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Sphere`, `Material`
//! - **Diagnostics**: `SceneError` for recoverable scene problems
//! - **Scene files**: JSON loading and saving
//!
//! The renderer only ever borrows a `Scene` immutably; editing happens
//! between frames on the application side.
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{Material, Scene, Sphere};
//! use lumen_math::Vec3;
//!
//! let mut scene = Scene::new();
//! let red = scene.add_material(Material::new(Vec3::new(0.9, 0.1, 0.1)));
//! scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, red));
//! assert!(scene.validate().is_empty());
//! ```

pub mod error;
pub mod loader;
pub mod scene;

// Re-export commonly used types
pub use error::{SceneError, SceneResult};
pub use loader::{load_scene, load_scene_from_str, save_scene};
pub use scene::{Material, Scene, Sphere};

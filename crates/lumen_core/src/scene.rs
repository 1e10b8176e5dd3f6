//! Scene types for Lumen.
//!
//! A scene is two flat, index-addressed collections: spheres and the
//! materials they reference. Material slot 0 is reserved as the default
//! (ground) material and is what any broken reference resolves to.

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};

/// A simple PBR-ish material.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Base reflected color (RGB, 0-1)
    pub albedo: Vec3,

    /// 0 = mirror-like, 1 = fully diffuse
    pub roughness: f32,

    /// Metallic factor (0=dielectric, 1=metal)
    pub metallic: f32,

    /// Emission color (RGB), scaled by `emission_strength`
    pub emission_color: Vec3,

    /// Scalar multiplier on `emission_color`
    pub emission_strength: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vec3::ONE,
            roughness: 1.0,
            metallic: 0.0,
            emission_color: Vec3::ZERO,
            emission_strength: 0.0,
        }
    }
}

impl Material {
    /// The material every scene starts with in slot 0.
    pub const DEFAULT: Material = Material {
        albedo: Vec3::new(0.8, 0.8, 0.8),
        roughness: 0.5,
        metallic: 0.0,
        emission_color: Vec3::ZERO,
        emission_strength: 0.0,
    };

    /// Create a new material with just an albedo color.
    pub fn new(albedo: Vec3) -> Self {
        Self {
            albedo,
            ..Default::default()
        }
    }

    /// Set roughness, clamped to [0, 1].
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Set metallic, clamped to [0, 1].
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Make the material emissive. Negative strength is treated as zero.
    pub fn with_emission(mut self, color: Vec3, strength: f32) -> Self {
        self.emission_color = color;
        self.emission_strength = strength.max(0.0);
        self
    }

    /// Effective emitted radiance.
    #[inline]
    pub fn emission(&self) -> Vec3 {
        self.emission_color * self.emission_strength
    }

    /// Check if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emission().length_squared() > 0.0
    }

    /// Check that every channel is finite.
    pub fn is_finite(&self) -> bool {
        self.albedo.is_finite()
            && self.roughness.is_finite()
            && self.metallic.is_finite()
            && self.emission_color.is_finite()
            && self.emission_strength.is_finite()
    }
}

/// An analytic sphere referencing a material by index.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material_index: usize,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 0.5,
            material_index: 0,
        }
    }
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material_index: usize) -> Self {
        Self {
            center,
            radius,
            material_index,
        }
    }

    /// Only spheres with a finite, positive radius take part in intersection.
    pub fn is_renderable(&self) -> bool {
        self.radius.is_finite() && self.radius > 0.0 && self.center.is_finite()
    }
}

/// A complete scene: spheres plus the materials they reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Spheres, in no meaningful order
    pub spheres: Vec<Sphere>,

    /// Materials, addressed by `Sphere::material_index`
    pub materials: Vec<Material>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene holding only the default material in slot 0.
    pub fn new() -> Self {
        Self {
            spheres: Vec::new(),
            materials: vec![Material::DEFAULT],
        }
    }

    /// Add a material and return its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Add a sphere and return its index.
    pub fn add_sphere(&mut self, sphere: Sphere) -> usize {
        self.spheres.push(sphere);
        self.spheres.len() - 1
    }

    /// Bounds-checked material lookup.
    pub fn material(&self, index: usize) -> SceneResult<&Material> {
        self.materials.get(index).ok_or(SceneError::MaterialNotFound {
            index,
            count: self.materials.len(),
        })
    }

    /// Material lookup that never fails: out-of-range indices resolve to
    /// slot 0, and an empty material list resolves to `Material::DEFAULT`.
    pub fn material_or_default(&self, index: usize) -> &Material {
        self.material(index)
            .or_else(|_| self.material(0))
            .unwrap_or(&Material::DEFAULT)
    }

    /// The material a sphere resolves to, plus a diagnostic when the
    /// sphere's index had to be clamped.
    pub fn sphere_material(&self, sphere_index: usize) -> (&Material, Option<SceneError>) {
        let Some(sphere) = self.spheres.get(sphere_index) else {
            return (self.material_or_default(0), None);
        };

        let problem = (sphere.material_index >= self.materials.len()).then(|| {
            SceneError::MaterialIndexOutOfRange {
                sphere: sphere_index,
                index: sphere.material_index,
                count: self.materials.len(),
            }
        });

        (self.material_or_default(sphere.material_index), problem)
    }

    /// List every recoverable problem in the scene.
    pub fn validate(&self) -> Vec<SceneError> {
        let mut problems = Vec::new();

        for (index, sphere) in self.spheres.iter().enumerate() {
            if !sphere.is_renderable() {
                problems.push(SceneError::NonPositiveRadius {
                    sphere: index,
                    radius: sphere.radius,
                });
            }
            if let (_, Some(problem)) = self.sphere_material(index) {
                problems.push(problem);
            }
        }

        for (index, material) in self.materials.iter().enumerate() {
            if !material.is_finite() {
                problems.push(SceneError::NonFiniteMaterial { material: index });
            }
        }

        problems
    }

    /// The demo layout: a huge ground sphere, a rough blue ball, a pink
    /// mirror and an orange light.
    pub fn demo() -> Self {
        let mut scene = Scene::new();

        let blue = scene.add_material(
            Material::new(Vec3::new(0.2, 0.3, 1.0))
                .with_roughness(0.1)
                .with_metallic(0.0),
        );
        let pink = scene.add_material(
            Material::new(Vec3::new(1.0, 0.0, 1.0))
                .with_roughness(0.0)
                .with_metallic(1.0),
        );
        let orange = scene.add_material(
            Material::new(Vec3::new(0.8, 0.5, 0.2))
                .with_roughness(0.1)
                .with_emission(Vec3::new(0.8, 0.5, 0.2), 2.0),
        );

        // Ground
        scene.add_sphere(Sphere::new(Vec3::new(0.0, -101.0, 0.0), 100.0, blue));
        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, pink));
        // Sun
        scene.add_sphere(Sphere::new(Vec3::new(4.0, 0.0, 0.0), 1.0, orange));

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_scene_has_default_material() {
        let scene = Scene::new();
        assert_eq!(scene.materials.len(), 1);
        assert_eq!(scene.materials[0], Material::DEFAULT);
        assert!(scene.spheres.is_empty());
    }

    #[test]
    fn test_emission_is_color_times_strength() {
        let material = Material::new(Vec3::ONE).with_emission(Vec3::new(0.5, 1.0, 0.25), 4.0);
        assert_eq!(material.emission(), Vec3::new(2.0, 4.0, 1.0));
        assert!(material.is_emissive());
        assert!(!Material::DEFAULT.is_emissive());
    }

    #[test]
    fn test_builders_clamp() {
        let material = Material::new(Vec3::ONE)
            .with_roughness(3.0)
            .with_metallic(-1.0)
            .with_emission(Vec3::ONE, -2.0);
        assert_eq!(material.roughness, 1.0);
        assert_eq!(material.metallic, 0.0);
        assert_eq!(material.emission_strength, 0.0);
    }

    #[test]
    fn test_material_lookup_out_of_range() {
        let scene = Scene::new();
        assert_eq!(*scene.material(0).unwrap(), Material::DEFAULT);
        assert!(matches!(
            scene.material(7),
            Err(SceneError::MaterialNotFound { index: 7, count: 1 })
        ));
        assert_eq!(*scene.material_or_default(7), Material::DEFAULT);
    }

    #[test]
    fn test_material_or_default_with_no_materials() {
        let scene = Scene {
            spheres: Vec::new(),
            materials: Vec::new(),
        };
        assert_eq!(*scene.material_or_default(0), Material::DEFAULT);
    }

    #[test]
    fn test_sphere_material_reports_clamp() {
        let mut scene = Scene::new();
        let red = scene.add_material(Material::new(Vec3::X));
        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, red));
        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, 42));

        let (material, problem) = scene.sphere_material(0);
        assert_eq!(material.albedo, Vec3::X);
        assert!(problem.is_none());

        let (material, problem) = scene.sphere_material(1);
        assert_eq!(*material, Material::DEFAULT);
        assert_eq!(problem.and_then(|p| p.sphere()), Some(1));
    }

    #[test]
    fn test_validate_lists_problems() {
        let mut scene = Scene::new();
        scene.add_sphere(Sphere::new(Vec3::ZERO, 0.0, 0));
        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, 3));
        scene.add_material(Material::new(Vec3::new(f32::NAN, 0.0, 0.0)));

        let problems = scene.validate();
        assert_eq!(problems.len(), 3);
        assert!(matches!(problems[0], SceneError::NonPositiveRadius { sphere: 0, .. }));
        assert!(matches!(
            problems[1],
            SceneError::MaterialIndexOutOfRange { sphere: 1, index: 3, .. }
        ));
        assert!(matches!(problems[2], SceneError::NonFiniteMaterial { material: 1 }));
    }

    #[test]
    fn test_renderable() {
        assert!(Sphere::new(Vec3::ZERO, 0.1, 0).is_renderable());
        assert!(!Sphere::new(Vec3::ZERO, 0.0, 0).is_renderable());
        assert!(!Sphere::new(Vec3::ZERO, -1.0, 0).is_renderable());
        assert!(!Sphere::new(Vec3::ZERO, f32::NAN, 0).is_renderable());
    }

    #[test]
    fn test_demo_scene_is_valid() {
        let scene = Scene::demo();
        assert_eq!(scene.spheres.len(), 3);
        assert_eq!(scene.materials.len(), 4);
        assert!(scene.validate().is_empty());
        assert!(scene.materials.iter().any(|m| m.is_emissive()));
    }
}

//! Scene file loading and saving.
//!
//! Scenes are stored as JSON documents mirroring the `Scene` struct:
//!
//! ```json
//! {
//!   "spheres":   [{ "center": [0, 0, 0], "radius": 1.0, "material_index": 1 }],
//!   "materials": [{ "albedo": [0.8, 0.8, 0.8], "roughness": 0.5 }]
//! }
//! ```
//!
//! Missing fields take their `Default` values.

use std::fs;
use std::path::Path;

use crate::error::SceneResult;
use crate::scene::Scene;

/// Load a scene from a JSON file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<Scene> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let scene = load_scene_from_str(&text)?;

    log::info!(
        "Loaded scene {:?}: {} sphere(s), {} material(s), {} emissive",
        path,
        scene.spheres.len(),
        scene.materials.len(),
        scene.materials.iter().filter(|m| m.is_emissive()).count()
    );

    for problem in scene.validate() {
        log::warn!("{}", problem);
    }

    Ok(scene)
}

/// Parse a scene from a JSON string.
pub fn load_scene_from_str(text: &str) -> SceneResult<Scene> {
    let scene: Scene = serde_json::from_str(text)?;
    Ok(scene)
}

/// Write a scene to a JSON file (pretty-printed).
pub fn save_scene<P: AsRef<Path>>(scene: &Scene, path: P) -> SceneResult<()> {
    let text = serde_json::to_string_pretty(scene)?;
    fs::write(path.as_ref(), text)?;
    log::info!("Saved scene to {:?}", path.as_ref());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, SceneError, Sphere};
    use lumen_math::Vec3;

    #[test]
    fn test_load_from_str_defaults() {
        let text = r#"{
            "spheres": [{ "center": [0.0, 1.0, 0.0], "radius": 2.0, "material_index": 0 }]
        }"#;

        let scene = load_scene_from_str(text).unwrap();
        assert_eq!(scene.spheres.len(), 1);
        assert_eq!(scene.spheres[0].radius, 2.0);
        // Missing materials fall back to the seeded default slot
        assert_eq!(scene.materials.len(), 1);
        assert_eq!(scene.materials[0], Material::DEFAULT);
    }

    #[test]
    fn test_partial_material_fields() {
        let text = r#"{
            "materials": [
                { "albedo": [0.8, 0.8, 0.8] },
                { "albedo": [1.0, 0.0, 1.0], "metallic": 1.0, "roughness": 0.0 }
            ]
        }"#;

        let scene = load_scene_from_str(text).unwrap();
        assert_eq!(scene.materials.len(), 2);
        assert_eq!(scene.materials[1].metallic, 1.0);
        assert_eq!(scene.materials[1].emission_strength, 0.0);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = load_scene_from_str("{ spheres: ").unwrap_err();
        assert!(matches!(err, SceneError::Json(_)));
    }

    #[test]
    fn test_save_and_load_file() {
        let mut scene = Scene::new();
        let glow = scene.add_material(
            Material::new(Vec3::ONE).with_emission(Vec3::new(1.0, 0.5, 0.2), 3.0),
        );
        scene.add_sphere(Sphere::new(Vec3::new(1.0, 2.0, 3.0), 0.75, glow));

        let path = std::env::temp_dir().join(format!("lumen_scene_{}.json", std::process::id()));
        save_scene(&scene, &path).unwrap();
        let loaded = load_scene(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_scene("/definitely/not/here/scene.json").unwrap_err();
        assert!(matches!(err, SceneError::Io(_)));
    }
}

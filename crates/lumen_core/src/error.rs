//! Recoverable scene diagnostics.

use thiserror::Error;

/// Problems found in a scene or while reading one from disk.
///
/// None of these stop a render: the renderer reports the scene variants and
/// carries on with a defined fallback.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("sphere {sphere} references material {index}, but the scene has {count} material(s); using material 0")]
    MaterialIndexOutOfRange {
        sphere: usize,
        index: usize,
        count: usize,
    },

    #[error("material {index} does not exist; the scene has {count} material(s)")]
    MaterialNotFound { index: usize, count: usize },

    #[error("sphere {sphere} has non-positive radius {radius}; excluded from tracing")]
    NonPositiveRadius { sphere: usize, radius: f32 },

    #[error("material {material} has a non-finite channel")]
    NonFiniteMaterial { material: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SceneError {
    /// Index of the sphere the diagnostic is about, if any.
    pub fn sphere(&self) -> Option<usize> {
        match self {
            SceneError::MaterialIndexOutOfRange { sphere, .. }
            | SceneError::NonPositiveRadius { sphere, .. } => Some(*sphere),
            _ => None,
        }
    }
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

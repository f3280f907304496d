//! JSON scene files.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::scene::{EntityId, Scene};

/// Errors that can occur while reading or writing a scene file.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Primary camera {0} has no camera component")]
    UnknownCamera(EntityId),

    #[error("Primary light {0} has no light component")]
    UnknownLight(EntityId),
}

/// Result type for scene file operations.
pub type SceneResult<T> = Result<T, SceneError>;

impl Scene {
    /// Parse a scene from a JSON string.
    pub fn from_json(json: &str) -> SceneResult<Scene> {
        let mut scene: Scene = serde_json::from_str(json)?;

        if let Some(id) = scene.designated_camera() {
            if !scene.cameras.contains_key(&id) {
                return Err(SceneError::UnknownCamera(id));
            }
        }
        if let Some(id) = scene.designated_light() {
            if !scene.lights.contains_key(&id) {
                return Err(SceneError::UnknownLight(id));
            }
        }

        scene.sync_next_id();
        log::debug!(
            "Parsed scene: {} entities, {} spheres, {} planes",
            scene.entity_count(),
            scene.spheres.len(),
            scene.planes.len()
        );
        Ok(scene)
    }

    /// Serialize the scene to pretty-printed JSON.
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Load a scene from a JSON file.
pub fn load_scene(path: impl AsRef<Path>) -> SceneResult<Scene> {
    let path = path.as_ref();
    log::info!("Loading scene from {}", path.display());
    let json = fs::read_to_string(path)?;
    Scene::from_json(&json)
}

/// Write a scene to a JSON file.
pub fn save_scene(scene: &Scene, path: impl AsRef<Path>) -> SceneResult<()> {
    let path = path.as_ref();
    fs::write(path, scene.to_json()?)?;
    log::info!("Saved scene to {}", path.display());
    Ok(())
}

//! Lumen Core - Scene store for the Lumen path tracer.
//!
//! This crate provides:
//!
//! - **Components**: `Camera`, `DirectionalLight`, `Sphere`, `Plane`, `Material`
//! - **Scene store**: entity-keyed component collections with an explicit
//!   primary camera and light
//! - **Scene files**: JSON loading and saving
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{load_scene, demo_scene};
//!
//! let scene = load_scene("scene.json").unwrap_or_else(|_| demo_scene());
//! println!("{} entities", scene.entity_count());
//! ```

pub mod components;
pub mod demo;
pub mod loader;
pub mod scene;

// Re-export commonly used types
pub use components::{
    diffuse_map, grayscale, luminance, Camera, Color, DirectionalLight, Material, Plane, Sphere,
    MIN_DIELECTRIC_F0,
};
pub use demo::demo_scene;
pub use loader::{load_scene, save_scene, SceneError, SceneResult};
pub use scene::{EntityId, Scene};

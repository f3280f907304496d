//! Entity-keyed scene store.
//!
//! Every component collection maps an [`EntityId`] to one component value.
//! Geometry and its material share an entity id. Collections are ordered maps
//! so iteration (and therefore tie-breaking between equidistant primitives) is
//! deterministic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::components::{Camera, DirectionalLight, Material, Plane, Sphere};

/// Opaque entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A renderable scene: named entities plus their components.
///
/// Exactly one camera and one light are used for rendering. They are chosen
/// by explicit designation ([`Scene::set_primary_camera`]) or, when nothing is
/// designated, by lowest entity id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub names: BTreeMap<EntityId, String>,
    #[serde(default)]
    pub cameras: BTreeMap<EntityId, Camera>,
    #[serde(default)]
    pub lights: BTreeMap<EntityId, DirectionalLight>,
    #[serde(default)]
    pub planes: BTreeMap<EntityId, Plane>,
    #[serde(default)]
    pub spheres: BTreeMap<EntityId, Sphere>,
    #[serde(default)]
    pub materials: BTreeMap<EntityId, Material>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_camera: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_light: Option<EntityId>,
    #[serde(skip)]
    next_id: u64,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new named entity with no components.
    pub fn spawn(&mut self, name: impl Into<String>) -> EntityId {
        self.sync_next_id();
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.names.insert(id, name.into());
        id
    }

    /// Remove an entity and all of its components.
    pub fn despawn(&mut self, id: EntityId) {
        self.names.remove(&id);
        self.cameras.remove(&id);
        self.lights.remove(&id);
        self.planes.remove(&id);
        self.spheres.remove(&id);
        self.materials.remove(&id);
        if self.primary_camera == Some(id) {
            self.primary_camera = None;
        }
        if self.primary_light == Some(id) {
            self.primary_light = None;
        }
    }

    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn entity_count(&self) -> usize {
        self.names.len()
    }

    pub fn insert_camera(&mut self, id: EntityId, camera: Camera) {
        self.cameras.insert(id, camera);
    }

    pub fn insert_light(&mut self, id: EntityId, light: DirectionalLight) {
        self.lights.insert(id, light);
    }

    pub fn insert_plane(&mut self, id: EntityId, plane: Plane) {
        self.planes.insert(id, plane);
    }

    pub fn insert_sphere(&mut self, id: EntityId, sphere: Sphere) {
        self.spheres.insert(id, sphere);
    }

    pub fn insert_material(&mut self, id: EntityId, material: Material) {
        self.materials.insert(id, material);
    }

    /// Spawn a sphere entity with its material.
    pub fn add_sphere(&mut self, name: impl Into<String>, sphere: Sphere, material: Material) -> EntityId {
        let id = self.spawn(name);
        self.insert_sphere(id, sphere);
        self.insert_material(id, material);
        id
    }

    /// Spawn a plane entity with its material.
    pub fn add_plane(&mut self, name: impl Into<String>, plane: Plane, material: Material) -> EntityId {
        let id = self.spawn(name);
        self.insert_plane(id, plane);
        self.insert_material(id, material);
        id
    }

    /// Spawn a camera entity and designate it as primary.
    pub fn add_camera(&mut self, name: impl Into<String>, camera: Camera) -> EntityId {
        let id = self.spawn(name);
        self.insert_camera(id, camera);
        self.primary_camera = Some(id);
        id
    }

    /// Spawn a light entity and designate it as primary.
    pub fn add_light(&mut self, name: impl Into<String>, light: DirectionalLight) -> EntityId {
        let id = self.spawn(name);
        self.insert_light(id, light);
        self.primary_light = Some(id);
        id
    }

    /// Designate the camera used for rendering.
    ///
    /// Returns false (and changes nothing) if `id` has no camera component.
    pub fn set_primary_camera(&mut self, id: EntityId) -> bool {
        if !self.cameras.contains_key(&id) {
            return false;
        }
        self.primary_camera = Some(id);
        true
    }

    /// Designate the light used for rendering.
    pub fn set_primary_light(&mut self, id: EntityId) -> bool {
        if !self.lights.contains_key(&id) {
            return false;
        }
        self.primary_light = Some(id);
        true
    }

    /// The camera used for rendering, if any.
    pub fn primary_camera(&self) -> Option<(EntityId, &Camera)> {
        Self::select(&self.cameras, self.primary_camera)
    }

    /// The light used for rendering, if any.
    pub fn primary_light(&self) -> Option<(EntityId, &DirectionalLight)> {
        Self::select(&self.lights, self.primary_light)
    }

    pub(crate) fn designated_camera(&self) -> Option<EntityId> {
        self.primary_camera
    }

    pub(crate) fn designated_light(&self) -> Option<EntityId> {
        self.primary_light
    }

    /// Material for an entity, if one was assigned.
    pub fn material(&self, id: EntityId) -> Option<&Material> {
        self.materials.get(&id)
    }

    fn select<T>(map: &BTreeMap<EntityId, T>, designated: Option<EntityId>) -> Option<(EntityId, &T)> {
        if let Some(id) = designated {
            if let Some(value) = map.get(&id) {
                return Some((id, value));
            }
        }
        map.iter().next().map(|(id, value)| (*id, value))
    }

    /// Make sure freshly spawned ids never collide with ids read from a file.
    pub(crate) fn sync_next_id(&mut self) {
        let max_key = [
            self.names.keys().next_back(),
            self.cameras.keys().next_back(),
            self.lights.keys().next_back(),
            self.planes.keys().next_back(),
            self.spheres.keys().next_back(),
            self.materials.keys().next_back(),
        ]
        .into_iter()
        .flatten()
        .map(|id| id.0 + 1)
        .max()
        .unwrap_or(0);
        self.next_id = self.next_id.max(max_key);
    }
}

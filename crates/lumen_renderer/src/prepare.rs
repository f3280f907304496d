//! Per-pass derivation of render data from a [`Scene`].

use lumen_core::{Material, Scene};

use crate::brdf::ShadingMaterial;
use crate::camera::LensCamera;
use crate::hittable::World;
use crate::light::SunLight;
use crate::quad::Quad;
use crate::sphere::Sphere;

/// Everything one progressive pass reads: primitives with their shading
/// parameters, the primary camera and the primary light.
pub struct PreparedScene {
    pub world: World,
    pub camera: LensCamera,
    pub light: SunLight,
}

impl PreparedScene {
    /// Derive render data for a `width` x `height` viewport.
    ///
    /// Returns `None` when the scene has no usable camera or light; callers
    /// render such scenes as black.
    pub fn new(scene: &Scene, width: u32, height: u32) -> Option<Self> {
        let Some((camera_id, camera)) = scene.primary_camera() else {
            log::warn!("Scene has no camera, rendering black");
            return None;
        };
        if !camera.is_valid() {
            log::warn!("Camera {} is degenerate, rendering black", camera_id);
            return None;
        }

        let Some((light_id, light)) = scene.primary_light() else {
            log::warn!("Scene has no light, rendering black");
            return None;
        };
        if !light.is_valid() {
            log::warn!("Light {} is degenerate, rendering black", light_id);
            return None;
        }

        Some(Self {
            world: build_world(scene),
            camera: LensCamera::new(camera, width, height),
            light: SunLight::new(light),
        })
    }
}

/// Collect spheres, then quads, each in entity order.
pub fn build_world(scene: &Scene) -> World {
    let fallback = Material::default();
    let shading = |id| ShadingMaterial::from(scene.material(id).unwrap_or(&fallback));

    let mut world = World::new();
    for (&id, sphere) in &scene.spheres {
        if !(sphere.radius > 0.0 && sphere.radius.is_finite()) {
            log::warn!("Skipping sphere {} with radius {}", id, sphere.radius);
            continue;
        }
        world.add(Box::new(Sphere::new(sphere.center, sphere.radius, shading(id))));
    }
    for (&id, plane) in &scene.planes {
        if plane.area() <= 0.0 {
            log::warn!("Skipping degenerate plane {}", id);
            continue;
        }
        world.add(Box::new(Quad::new(plane.v0, plane.v1, plane.v2, shading(id))));
    }

    log::debug!("Prepared world with {} primitives", world.len());
    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{demo_scene, Camera, DirectionalLight, Plane, Sphere as SphereComponent};
    use lumen_math::Vec3;

    #[test]
    fn test_demo_scene_prepares() {
        let prepared = PreparedScene::new(&demo_scene(), 64, 48).unwrap();
        assert_eq!(prepared.world.len(), 4);
        assert_eq!(prepared.camera.image_width, 64);
    }

    #[test]
    fn test_missing_camera_or_light() {
        let mut scene = Scene::new();
        scene.add_light("Sun", DirectionalLight::default());
        assert!(PreparedScene::new(&scene, 4, 4).is_none());

        let mut scene = Scene::new();
        scene.add_camera("Cam", Camera::default());
        assert!(PreparedScene::new(&scene, 4, 4).is_none());
    }

    #[test]
    fn test_degenerate_primitives_skipped() {
        let mut scene = Scene::new();
        let ball = scene.spawn("Zero ball");
        scene.insert_sphere(ball, SphereComponent::new(Vec3::ZERO, 0.0));
        let sliver = scene.spawn("Sliver");
        scene.insert_plane(sliver, Plane::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0));
        let floor = scene.spawn("Floor");
        scene.insert_plane(floor, Plane::horizontal(Vec3::ZERO, 1.0));

        // Geometry without a material still renders, with the default one
        assert_eq!(build_world(&scene).len(), 1);
    }
}

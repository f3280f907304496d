//! The default showcase scene.

use lumen_math::Vec3;

use crate::components::{Camera, DirectionalLight, Material, Plane, Sphere};
use crate::scene::Scene;

/// Build the default scene: a grey floor, three spheres, a sun and a camera.
pub fn demo_scene() -> Scene {
    let mut scene = Scene::new();

    scene.add_plane(
        "Floor",
        Plane::horizontal(Vec3::new(0.0, 0.0, 5.0), 25.0),
        Material::from_rgb8([180, 180, 180], 0.9, 0.0),
    );
    scene.add_sphere(
        "Sphere 1",
        Sphere::new(Vec3::new(-2.0, 1.0, 0.0), 1.0),
        Material::from_rgb8([150, 30, 20], 0.3, 0.0),
    );
    scene.add_sphere(
        "Sphere 2",
        Sphere::new(Vec3::new(2.0, 2.0, 3.0), 2.0),
        Material::from_rgb8([30, 50, 150], 0.6, 0.0),
    );
    scene.add_sphere(
        "Sphere 3",
        Sphere::new(Vec3::new(-3.0, 3.0, 6.0), 3.0),
        Material::from_rgb8([50, 150, 50], 0.2, 1.0),
    );

    scene.add_light(
        "Directional Light",
        DirectionalLight::new(Vec3::new(1.0, -1.0, 1.0), 1000.0, 0.53),
    );

    let camera = Camera::new(Vec3::new(0.0, 4.0, -12.0), Vec3::new(0.0, -0.15, 1.0))
        .with_optics(35.0, 24.0, 35.0)
        .with_exposure(12.0, 1200.0, 300.0)
        .with_focus(13.0);
    scene.add_camera("Main Camera", camera);

    scene
}

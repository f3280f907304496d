//! Thin-lens camera for primary ray generation.

use lumen_core::Camera;
use lumen_math::{Ray, Vec3};
use rand::RngCore;

use crate::sampling::sample_lens;

/// Lens and sensor dimensions are authored in millimetres; the scene is in metres.
const MM_TO_SCENE: f32 = 1e-3;

/// Camera prepared for a specific viewport.
#[derive(Debug, Clone)]
pub struct LensCamera {
    pub image_width: u32,
    pub image_height: u32,

    center: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,

    sensor_width: f32,
    sensor_height: f32,
    focal_length: f32,
    focus_distance: f32,

    /// Lens radius in scene units
    lens_radius: f32,
    sampling_correction: f32,
    exposure: f32,
}

impl LensCamera {
    /// Derive the camera basis and lens data for a `width` x `height` viewport.
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        let forward = camera.direction.normalize();
        // Looking straight up or down leaves Y useless as a reference
        let right = Vec3::Y
            .cross(forward)
            .try_normalize()
            .unwrap_or_else(|| Vec3::Z.cross(forward).normalize());
        let up = forward.cross(right);

        Self {
            image_width: width,
            image_height: height,
            center: camera.position,
            forward,
            right,
            up,
            sensor_width: camera.sensor_width,
            sensor_height: camera.sensor_height,
            focal_length: camera.focal_length,
            focus_distance: camera.focus_distance,
            lens_radius: camera.lens_radius() * MM_TO_SCENE,
            sampling_correction: camera.sampling_correction(),
            exposure: camera.exposure(),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }

    /// Scale applied to every radiance estimate for the lens sampling density.
    pub fn sampling_correction(&self) -> f32 {
        self.sampling_correction
    }

    /// Scale from mean radiance to display values.
    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    /// Direction from the lens center through the middle of pixel (i, j).
    ///
    /// Pixel (0, 0) is the top-left corner of the image.
    pub fn pinhole_direction(&self, i: u32, j: u32) -> Vec3 {
        let sx = ((i as f32 + 0.5) / self.image_width as f32 - 0.5) * self.sensor_width;
        let sy = (0.5 - (j as f32 + 0.5) / self.image_height as f32) * self.sensor_height;

        (self.forward * self.focal_length + self.right * sx + self.up * sy).normalize()
    }

    /// Generate a ray for pixel (i, j) through a random point on the lens.
    ///
    /// All rays for a pixel converge on the plane of focus.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let direction = self.pinhole_direction(i, j);
        let focus_point = self.center + direction * (self.focus_distance / direction.dot(self.forward));

        let lens = sample_lens(self.lens_radius, rng);
        let origin = self.center + self.right * lens.x + self.up * lens.y;

        Ray::towards(origin, focus_point)
    }
}

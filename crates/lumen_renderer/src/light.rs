//! The sun: a directional light with a small angular disk.

use lumen_core::{Color, DirectionalLight};
use lumen_math::Vec3;
use rand::RngCore;

use crate::sampling::{sample_cone, Frame};

/// Directional light with its derived sampling data.
#[derive(Debug, Clone, Copy)]
pub struct SunLight {
    /// Unit vector from a surface toward the light
    light_dir: Vec3,
    half_angle_cos: f32,
    intensity_map: Color,
    frame: Frame,
}

impl SunLight {
    pub fn new(light: &DirectionalLight) -> Self {
        let light_dir = light.light_dir();
        Self {
            light_dir,
            half_angle_cos: light.half_angle_cos(),
            intensity_map: light.intensity_map(),
            frame: Frame::from_normal(light_dir),
        }
    }

    pub fn light_dir(&self) -> Vec3 {
        self.light_dir
    }

    /// Radiance carried by one light sample.
    pub fn intensity(&self) -> Color {
        self.intensity_map
    }

    /// Pick a direction toward a point on the light's disk.
    ///
    /// A light with no angular extent always returns `light_dir`.
    pub fn sample_direction(&self, rng: &mut dyn RngCore) -> Vec3 {
        if self.half_angle_cos >= 1.0 {
            return self.light_dir;
        }
        sample_cone(&self.frame, self.half_angle_cos, rng)
    }
}

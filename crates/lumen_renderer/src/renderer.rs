//! Core path tracing integrator.
//!
//! Implements Monte Carlo path tracing with:
//! - One shadow-tested sun sample per hit (direct lighting)
//! - One importance-sampled bounce per hit (indirect lighting)
//! - A fixed maximum bounce count

use std::f32::consts::PI;

use lumen_core::Color;
use lumen_math::{reflect, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, World};
use crate::light::SunLight;
use crate::sampling::{sample_ggx_vndf, sample_hemisphere, Frame};

/// How the indirect bounce direction is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BounceSampling {
    /// Reflect about a GGX visible-normal sample; shades both lobes.
    #[default]
    Ggx,
    /// Uniform hemisphere around the normal; diffuse lobe only.
    Hemisphere,
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Maximum number of indirect bounces
    pub max_depth: u32,
    /// Base seed for every random stream of a pass
    pub seed: u64,
    /// Height in rows of the bands rendered in parallel
    pub rows_per_band: u32,
    /// Indirect bounce strategy
    pub bounce_sampling: BounceSampling,
    /// Rotate each hit's tangent frame randomly instead of using a fixed one
    pub randomize_tangent_frames: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            seed: 0x5eed_1e55,
            rows_per_band: 16,
            bounce_sampling: BounceSampling::Ggx,
            randomize_tangent_frames: false,
        }
    }
}

impl RenderConfig {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rows_per_band(mut self, rows: u32) -> Self {
        self.rows_per_band = rows.max(1);
        self
    }

    pub fn with_bounce_sampling(mut self, bounce_sampling: BounceSampling) -> Self {
        self.bounce_sampling = bounce_sampling;
        self
    }

    pub fn with_random_tangent_frames(mut self, enabled: bool) -> Self {
        self.randomize_tangent_frames = enabled;
        self
    }
}

/// Compute the radiance arriving along a ray.
///
/// Each hit takes one light sample and, below `max_depth`, continues along
/// one sampled bounce. The bounce chain is walked iteratively, carrying the
/// product of bounce weights.
pub fn trace_path(
    ray: &Ray,
    world: &World,
    light: &SunLight,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for depth in 0..=config.max_depth {
        // Escaped rays see black
        let Some(rec) = world.closest_hit(&ray) else {
            break;
        };
        let view = -ray.direction;

        let to_light = light.sample_direction(rng);
        if world.is_visible(rec.p, to_light) {
            radiance += throughput * rec.material.evaluate(rec.normal, to_light, view, light.intensity());
        }

        if depth >= config.max_depth {
            break;
        }

        let Some((direction, weight)) = sample_bounce(&ray, &rec, config, rng) else {
            break;
        };
        throughput *= weight;
        if throughput.max_element() <= 0.0 {
            break;
        }
        ray = Ray::new(rec.p, direction);
    }

    radiance
}

/// Choose the next direction at a hit and its throughput weight.
///
/// Returns `None` when the sampled direction points into the surface.
pub fn sample_bounce(
    ray: &Ray,
    rec: &HitRecord,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Option<(Vec3, Color)> {
    let frame = if config.randomize_tangent_frames {
        Frame::random(rec.normal, rng)
    } else {
        Frame::from_normal(rec.normal)
    };
    let view = -ray.direction;

    match config.bounce_sampling {
        BounceSampling::Ggx => {
            let view_local = frame.to_local(view);
            if view_local.z <= 0.0 {
                return None;
            }
            let h = frame.to_world(sample_ggx_vndf(view_local, rec.material.alpha, rng));
            let direction = reflect(ray.direction, h).normalize();
            if direction.dot(rec.normal) <= 0.0 {
                return None;
            }
            Some((direction, rec.material.bounce_weight(rec.normal, direction, view, h)))
        }
        BounceSampling::Hemisphere => {
            // Sampler is +Y up, frame is +Z up
            let local = sample_hemisphere(rng);
            let direction = frame.to_world(Vec3::new(local.x, local.z, local.y));
            let n_dot_l = direction.dot(rec.normal);
            if n_dot_l <= 0.0 {
                return None;
            }
            // Lambertian term divided by the uniform hemisphere density 1 / 2π
            Some((direction, rec.material.diffuse_reflectance * n_dot_l * 2.0 * PI))
        }
    }
}

/// Convert mean radiance to 8-bit RGBA through the camera exposure.
pub fn color_to_rgba(color: Color, exposure: f32) -> [u8; 4] {
    let display = color * exposure;
    let r = (255.0 * Interval::UNIT.clamp(display.x)) as u8;
    let g = (255.0 * Interval::UNIT.clamp(display.y)) as u8;
    let b = (255.0 * Interval::UNIT.clamp(display.z)) as u8;
    [r, g, b, 255]
}

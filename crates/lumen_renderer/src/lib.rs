//! Lumen Renderer - progressive CPU path tracing.
//!
//! A Monte Carlo path tracer for a small analytic scene: spheres and quads
//! lit by a single sun, shaded with a GGX microfacet BRDF and seen through a
//! thin-lens camera. Each call to [`ProgressiveRenderer::render_sample`] adds
//! one noisy estimate per pixel to a persistent accumulation buffer and
//! returns the running mean as an 8-bit frame.

mod brdf;
mod camera;
mod hittable;
mod light;
mod prepare;
mod progressive;
mod quad;
mod renderer;
mod sampling;
mod sphere;

pub use brdf::{fresnel_schlick, ggx_d, smith_g1, smith_g2, ShadingMaterial};
pub use camera::LensCamera;
pub use hittable::{HitRecord, Hittable, World, SURFACE_BIAS};
pub use light::SunLight;
pub use prepare::PreparedScene;
pub use progressive::{PixelBuffer, ProgressiveRenderer};
pub use quad::Quad;
pub use renderer::{color_to_rgba, sample_bounce, trace_path, BounceSampling, RenderConfig};
pub use sampling::{
    disk_polar, gen_f32, sample_cone, sample_ggx_vndf, sample_hemisphere, sample_lens, Frame,
};
pub use sphere::Sphere;

/// Re-export scene and math types
pub use lumen_core::{Color, Scene};
pub use lumen_math::{Interval, Ray, Vec3};

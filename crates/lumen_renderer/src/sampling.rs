//! Random sampling routines.
//!
//! Every routine draws from an explicit `&mut dyn RngCore` so passes can be
//! reproduced from a seed and each worker owns its own stream.

use std::f32::consts::PI;

use lumen_math::{lerp, Vec2, Vec3};
use rand::{Rng, RngCore};

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Orthonormal frame with `n` as the local +Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub t: Vec3,
    pub b: Vec3,
    pub n: Vec3,
}

impl Frame {
    /// Build a stable frame around `n` (Duff et al. 2017).
    ///
    /// The same normal always yields the same tangents.
    pub fn from_normal(n: Vec3) -> Self {
        let sign = 1.0_f32.copysign(n.z);
        let a = -1.0 / (sign + n.z);
        let b = n.x * n.y * a;

        let t = Vec3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
        let bitangent = Vec3::new(b, sign + n.y * n.y * a, -n.y);

        Self { t, b: bitangent, n }
    }

    /// Build a frame around `n` whose in-plane rotation is random.
    ///
    /// Tangents come from crossing `n` with a random seed vector and then
    /// crossing again. The sampling distributions used with these frames are
    /// rotationally symmetric around `n`, so the rotation does not bias
    /// results.
    pub fn random(n: Vec3, rng: &mut dyn RngCore) -> Self {
        for _ in 0..4 {
            let seed = Vec3::new(
                gen_f32(rng) * 2.0 - 1.0,
                gen_f32(rng) * 2.0 - 1.0,
                gen_f32(rng) * 2.0 - 1.0,
            );
            if let Some(t) = n.cross(seed).try_normalize() {
                return Self { t, b: n.cross(t), n };
            }
        }
        Self::from_normal(n)
    }

    /// Express a world-space vector in this frame.
    #[inline]
    pub fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.t), v.dot(self.b), v.dot(self.n))
    }

    /// Express a local vector in world space.
    #[inline]
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.t * v.x + self.b * v.y + self.n * v.z
    }
}

/// Hemisphere direction in a local frame where +Y is the surface normal.
///
/// cos θ is drawn directly from the first random number, which spreads
/// directions evenly over solid angle (pdf 1 / 2π).
pub fn sample_hemisphere(rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);

    let sin_theta = (1.0 - r1 * r1).max(0.0).sqrt();
    let phi = 2.0 * PI * r2;
    Vec3::new(sin_theta * phi.cos(), r1, sin_theta * phi.sin())
}

/// Raw polar disk coordinates: a uniform radius parameter in [0, 1) and a
/// uniform angle in [0, 2π).
///
/// Callers choose how the radius parameter maps onto their disk.
#[inline]
pub fn disk_polar(rng: &mut dyn RngCore) -> (f32, f32) {
    let u = gen_f32(rng);
    let phi = 2.0 * PI * gen_f32(rng);
    (u, phi)
}

/// Point on a lens of the given radius, uniform by area.
pub fn sample_lens(radius: f32, rng: &mut dyn RngCore) -> Vec2 {
    let (u, phi) = disk_polar(rng);
    let r = radius * u.sqrt();
    Vec2::new(r * phi.cos(), r * phi.sin())
}

/// Direction inside the cone around `frame.n` with half-angle cosine `cos_max`,
/// uniform over the cone's solid angle.
pub fn sample_cone(frame: &Frame, cos_max: f32, rng: &mut dyn RngCore) -> Vec3 {
    let (u, phi) = disk_polar(rng);
    let cos_theta = lerp(1.0, cos_max, u);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    frame
        .to_world(Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta))
        .normalize()
}

/// Sample a GGX half vector from the distribution of normals visible from `v`.
///
/// `v` is the view direction in a local frame with the normal along +Z.
/// Follows Heitz, "Sampling the GGX Distribution of Visible Normals" (2018).
pub fn sample_ggx_vndf(v: Vec3, alpha: f32, rng: &mut dyn RngCore) -> Vec3 {
    // Stretch the view vector to the hemisphere configuration
    let vh = Vec3::new(alpha * v.x, alpha * v.y, v.z).normalize();

    let lensq = vh.x * vh.x + vh.y * vh.y;
    let t1 = if lensq > 0.0 {
        Vec3::new(-vh.y, vh.x, 0.0) / lensq.sqrt()
    } else {
        Vec3::X
    };
    let t2 = vh.cross(t1);

    // Projected area disk, squashed toward the view direction
    let r = gen_f32(rng).sqrt();
    let phi = 2.0 * PI * gen_f32(rng);
    let p1 = r * phi.cos();
    let s = 0.5 * (1.0 + vh.z);
    let p2 = (1.0 - s) * (1.0 - p1 * p1).max(0.0).sqrt() + s * r * phi.sin();

    let nh = t1 * p1 + t2 * p2 + vh * (1.0 - p1 * p1 - p2 * p2).max(0.0).sqrt();

    // Unstretch
    Vec3::new(alpha * nh.x, alpha * nh.y, nh.z.max(0.0))
        .try_normalize()
        .unwrap_or(Vec3::Z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_orthonormal(frame: &Frame) {
        assert!(frame.t.dot(frame.n).abs() < 1e-4);
        assert!(frame.b.dot(frame.n).abs() < 1e-4);
        assert!(frame.t.dot(frame.b).abs() < 1e-4);
        assert!((frame.t.length() - 1.0).abs() < 1e-4);
        assert!((frame.b.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_stable_frame() {
        for n in [Vec3::Y, Vec3::NEG_Z, Vec3::new(1.0, 2.0, -3.0).normalize()] {
            let frame = Frame::from_normal(n);
            assert_orthonormal(&frame);
            assert_eq!(frame, Frame::from_normal(n));
        }
    }

    #[test]
    fn test_random_frame() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = Vec3::new(-0.3, 0.9, 0.1).normalize();
        let frame = Frame::random(n, &mut rng);

        assert_orthonormal(&frame);
        assert_eq!(frame.n, n);
    }

    #[test]
    fn test_frame_roundtrip() {
        let frame = Frame::from_normal(Vec3::new(0.0, 1.0, 1.0).normalize());
        let v = Vec3::new(0.2, -0.5, 0.8);
        assert!((frame.to_world(frame.to_local(v)) - v).length() < 1e-5);
        assert!((frame.to_local(frame.n) - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_hemisphere_samples_above_surface() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let d = sample_hemisphere(&mut rng);
            assert!(d.y >= 0.0);
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_lens_samples_inside_radius() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            assert!(sample_lens(0.5, &mut rng).length() <= 0.5 + 1e-6);
        }
        assert_eq!(sample_lens(0.0, &mut rng), Vec2::ZERO);
    }

    #[test]
    fn test_cone_samples_within_half_angle() {
        let mut rng = StdRng::seed_from_u64(3);
        let axis = Vec3::new(1.0, 1.0, 0.0).normalize();
        let frame = Frame::from_normal(axis);
        let cos_max = 5.0_f32.to_radians().cos();

        for _ in 0..1000 {
            let d = sample_cone(&frame, cos_max, &mut rng);
            assert!(d.dot(axis) >= cos_max - 1e-5);
        }
    }

    #[test]
    fn test_vndf_half_vectors_face_normal() {
        let mut rng = StdRng::seed_from_u64(4);
        let v = Vec3::new(0.6, 0.0, 0.8);

        for alpha in [0.05, 0.3, 1.0] {
            for _ in 0..500 {
                let h = sample_ggx_vndf(v, alpha, &mut rng);
                assert!(h.z >= 0.0);
                assert!((h.length() - 1.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_vndf_smooth_surface_is_mirror() {
        let mut rng = StdRng::seed_from_u64(5);
        let h = sample_ggx_vndf(Vec3::new(0.0, 0.6, 0.8), 0.0, &mut rng);
        assert!((h - Vec3::Z).length() < 1e-5);
    }
}

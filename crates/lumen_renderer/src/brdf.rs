//! GGX microfacet BRDF with a Fresnel-balanced Lambertian base.
//!
//! Diffuse and specular are not summed independently: the specular lobe is
//! weighted by F and the diffuse lobe by (1 - F), so a surface never reflects
//! more than it receives through the importance-sampled bounce.

use std::f32::consts::PI;

use lumen_core::{Color, Material};
use lumen_math::Vec3;

/// Upper bound on the normal distribution, keeping near-mirror surfaces finite.
const D_MAX: f32 = 10.0;

/// Smallest cosine used in denominators.
const MIN_COS: f32 = 1e-5;

/// Per-material quantities the shading code needs at every hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingMaterial {
    pub diffuse_reflectance: Color,
    pub alpha: f32,
    pub alpha_squared: f32,
    pub specular_f0: Color,
    pub shadowed_f90: f32,
}

impl ShadingMaterial {
    /// Reflects nothing. Used as a placeholder in empty hit records.
    pub const BLACK: ShadingMaterial = ShadingMaterial {
        diffuse_reflectance: Vec3::ZERO,
        alpha: 1.0,
        alpha_squared: 1.0,
        specular_f0: Vec3::ZERO,
        shadowed_f90: 0.0,
    };

    /// Fresnel reflectance for the angle between light and half vector.
    #[inline]
    pub fn fresnel(&self, l_dot_h: f32) -> Color {
        fresnel_schlick(self.specular_f0, self.shadowed_f90, l_dot_h)
    }

    /// Radiance reflected toward `v` from `incoming` radiance arriving along `l`.
    ///
    /// All vectors are unit length and point away from the surface.
    pub fn evaluate(&self, n: Vec3, l: Vec3, v: Vec3, incoming: Color) -> Color {
        let n_dot_l = n.dot(l);
        if n_dot_l <= 0.0 {
            return Color::ZERO;
        }
        let n_dot_v = n.dot(v).max(MIN_COS);

        let diffuse = self.diffuse_reflectance * n_dot_l;

        let Some(h) = (l + v).try_normalize() else {
            return diffuse * incoming;
        };
        let n_dot_h = n.dot(h).max(0.0);
        let l_dot_h = l.dot(h).clamp(0.0, 1.0);

        let f = self.fresnel(l_dot_h);
        let lobe = ggx_d(self.alpha_squared, n_dot_h)
            * smith_g2(self.alpha_squared, n_dot_l, n_dot_v)
            * n_dot_l;

        ((Color::ONE - f) * diffuse + f * lobe) * incoming
    }

    /// Throughput weight for a bounce along `l` generated by reflecting about
    /// a VNDF-sampled half vector `h`.
    ///
    /// The specular part is F * G2 / G1(v); the sampling density is not
    /// divided out explicitly. Never exceeds one per channel.
    pub fn bounce_weight(&self, n: Vec3, l: Vec3, v: Vec3, h: Vec3) -> Color {
        let n_dot_l = n.dot(l);
        if n_dot_l <= 0.0 {
            return Color::ZERO;
        }
        let n_dot_v = n.dot(v).max(MIN_COS);
        let l_dot_h = l.dot(h).clamp(0.0, 1.0);

        let f = self.fresnel(l_dot_h);
        let g2_over_g1 = smith_g2(self.alpha_squared, n_dot_l, n_dot_v)
            / smith_g1(self.alpha_squared, n_dot_v);

        (Color::ONE - f) * self.diffuse_reflectance * n_dot_l + f * g2_over_g1
    }
}

impl From<&Material> for ShadingMaterial {
    fn from(mat: &Material) -> Self {
        Self {
            diffuse_reflectance: mat.diffuse_reflectance(),
            alpha: mat.alpha(),
            alpha_squared: mat.alpha_squared(),
            specular_f0: mat.specular_f0(),
            shadowed_f90: mat.shadowed_f90(),
        }
    }
}

/// GGX/Trowbridge-Reitz distribution, clamped to [`D_MAX`].
#[inline]
pub fn ggx_d(alpha_squared: f32, n_dot_h: f32) -> f32 {
    let b = (alpha_squared - 1.0) * n_dot_h * n_dot_h + 1.0;
    let d = alpha_squared / (PI * b * b);
    if d.is_nan() {
        return D_MAX;
    }
    d.min(D_MAX)
}

/// Height-correlated Smith masking-shadowing.
#[inline]
pub fn smith_g2(alpha_squared: f32, n_dot_l: f32, n_dot_v: f32) -> f32 {
    let a = n_dot_v * (alpha_squared + (1.0 - alpha_squared) * n_dot_l * n_dot_l).sqrt();
    let b = n_dot_l * (alpha_squared + (1.0 - alpha_squared) * n_dot_v * n_dot_v).sqrt();
    2.0 * n_dot_l * n_dot_v / (a + b)
}

/// Smith masking for a single direction.
#[inline]
pub fn smith_g1(alpha_squared: f32, n_dot_s: f32) -> f32 {
    2.0 * n_dot_s / (n_dot_s + (alpha_squared + (1.0 - alpha_squared) * n_dot_s * n_dot_s).sqrt())
}

/// Schlick's Fresnel with the spherical-Gaussian exponent.
#[inline]
pub fn fresnel_schlick(f0: Color, f90: f32, l_dot_h: f32) -> Color {
    let w = ((-5.55473 * l_dot_h - 6.98315) * l_dot_h).exp2();
    f0 + (Color::splat(f90) - f0) * w
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::diffuse_map;

    #[test]
    fn test_ggx_d_clamped() {
        // A perfect mirror would be a delta; the clamp keeps it finite
        assert_eq!(ggx_d(0.0, 1.0), D_MAX);
        assert!(ggx_d(1.0, 0.5) > 0.0);
        assert!((ggx_d(1.0, 0.5) - 1.0 / PI).abs() < 1e-5);
    }

    #[test]
    fn test_smith_terms_bounded() {
        for a2 in [0.0, 0.01, 0.25, 1.0] {
            for n_dot_l in [0.05, 0.5, 1.0] {
                for n_dot_v in [0.05, 0.5, 1.0] {
                    let g2 = smith_g2(a2, n_dot_l, n_dot_v);
                    let g1 = smith_g1(a2, n_dot_v);
                    assert!(g2 > 0.0 && g2 <= 1.0 + 1e-5);
                    assert!(g2 <= g1 + 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_fresnel_limits() {
        let f0 = Color::splat(0.04);
        assert!((fresnel_schlick(f0, 1.0, 1.0) - f0).length() < 1e-3);
        assert!((fresnel_schlick(f0, 1.0, 0.0) - Color::ONE).length() < 1e-5);
    }

    #[test]
    fn test_evaluate_below_horizon_is_black() {
        let mat = ShadingMaterial::from(&Material::default());
        let c = mat.evaluate(Vec3::Y, Vec3::NEG_Y, Vec3::Y, Color::ONE);
        assert_eq!(c, Color::ZERO);
    }

    #[test]
    fn test_evaluate_rough_dielectric_is_mostly_diffuse() {
        let mat = ShadingMaterial::from(&Material::from_rgb8([255, 255, 255], 1.0, 0.0));
        let c = mat.evaluate(Vec3::Y, Vec3::Y, Vec3::Y, Color::ONE);

        let diffuse = 1.0 / PI;
        assert!(c.x > 0.9 * diffuse && c.x < 1.1 * diffuse, "got {}", c.x);
    }

    #[test]
    fn test_bounce_weight_energy_bound() {
        let normal = Vec3::Y;
        let colors = [diffuse_map([255, 255, 255]), Color::ONE, Color::new(1.0, 0.2, 0.0)];

        for base_color in colors {
            for roughness in [0.0, 0.1, 0.5, 0.9, 1.0] {
                for metalness in [0.0, 0.5, 1.0] {
                    let mat = ShadingMaterial::from(&Material::new(base_color, roughness, metalness));

                    for view_angle in [0.0_f32, 30.0, 60.0, 85.0] {
                        let t = view_angle.to_radians();
                        let v = Vec3::new(t.sin(), t.cos(), 0.0);

                        for tilt in [0.0_f32, 10.0, 25.0, 40.0] {
                            let s = tilt.to_radians();
                            let h = Vec3::new(-s.sin(), s.cos(), 0.3 * s.sin()).normalize();
                            let l = lumen_math::reflect(-v, h);

                            let w = mat.bounce_weight(normal, l, v, h);
                            assert!(
                                w.max_element() <= 1.0 + 1e-4,
                                "weight {w} for r={roughness} m={metalness}"
                            );
                            assert!(w.min_element() >= 0.0);
                        }
                    }
                }
            }
        }
    }
}

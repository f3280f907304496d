// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// Reflect `v` about the unit vector `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Linear interpolation between two scalars.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_flips_normal_component() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let r = reflect(v, Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(0.04, 0.9, 0.0), 0.04);
        assert_eq!(lerp(0.04, 0.9, 1.0), 0.9);
        assert!((lerp(0.0, 2.0, 0.25) - 0.5).abs() < 1e-6);
    }
}

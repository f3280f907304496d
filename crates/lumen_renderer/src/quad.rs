//! Quad (parallelogram) primitive for ray tracing.
//!
//! The quad is intersected as a plane, then the hit point is tested against
//! the two triangles (v0, v1, v2) and (v0, v2, v3).

use lumen_math::{Interval, Ray, Vec3};

use crate::brdf::ShadingMaterial;
use crate::hittable::{HitRecord, Hittable};

/// Denominators below this mean the ray runs parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A parallelogram primitive.
pub struct Quad {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    v3: Vec3,
    /// Unit face normal (zero for degenerate quads)
    normal: Vec3,
    material: ShadingMaterial,
}

impl Quad {
    /// Create a quad from three consecutive corners; the fourth is
    /// `v0 + (v2 - v1)`.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: ShadingMaterial) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            v0,
            v1,
            v2,
            v3: v0 + (v2 - v1),
            normal,
            material,
        }
    }

    /// Sign-consistency test: `p` is inside when every edge sees it on the
    /// side the face normal points to.
    fn inside_triangle(&self, p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> bool {
        [(a, b), (b, c), (c, a)]
            .into_iter()
            .all(|(from, to)| (to - from).cross(p - from).dot(self.normal) >= 0.0)
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.v0 - ray.origin).dot(self.normal) / denom;
        if !ray_t.surrounds(t) {
            return false;
        }

        let p = ray.at(t);
        let inside = self.inside_triangle(p, self.v0, self.v1, self.v2)
            || self.inside_triangle(p, self.v0, self.v2, self.v3);
        if !inside {
            return false;
        }

        rec.record(ray, t, self.normal, &self.material);
        true
    }
}

//! Sphere primitive for ray tracing.

use lumen_math::{Interval, Ray, Vec3};

use crate::brdf::ShadingMaterial;
use crate::hittable::{HitRecord, Hittable};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    radius_squared: f32,
    material: ShadingMaterial,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: ShadingMaterial) -> Self {
        let radius = radius.max(0.0);
        Self {
            center,
            radius,
            radius_squared: radius * radius,
            material,
        }
    }
}

impl Hittable for Sphere {
    /// Geometric test: project the center onto the ray and compare the
    /// perpendicular distance with the radius. Only the near root counts.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let oc = self.center - ray.origin;
        let tca = oc.dot(ray.direction);
        let d2 = oc.length_squared() - tca * tca;
        if d2 > self.radius_squared {
            return false;
        }

        let thc = (self.radius_squared - d2).sqrt();
        let t = tca - thc;
        if !ray_t.surrounds(t) {
            return false;
        }

        let outward_normal = (ray.at(t) - self.center) / self.radius;
        rec.record(ray, t, outward_normal, &self.material);
        true
    }
}

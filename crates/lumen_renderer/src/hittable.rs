//! Hittable trait, HitRecord, and the primitive list that forms the world.

use lumen_math::{Interval, Ray, Vec3};

use crate::brdf::ShadingMaterial;

/// Distance a hit point is pushed off its surface, along the shading normal.
pub const SURFACE_BIAS: f32 = 1e-4;

static BLACK_MATERIAL: ShadingMaterial = ShadingMaterial::BLACK;

/// Record of a ray-object intersection.
#[derive(Clone, Copy, Debug)]
pub struct HitRecord<'a> {
    /// Intersection point, already offset by [`SURFACE_BIAS`]
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a ShadingMaterial,
    /// Distance along the ray to the unbiased intersection
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl Default for HitRecord<'_> {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: &BLACK_MATERIAL,
            t: 0.0,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Fill in the record for a hit at distance `t`.
    ///
    /// The normal is stored facing the incoming ray and the point is biased
    /// along it, so secondary rays start on the side the ray arrived from.
    pub fn record(&mut self, ray: &Ray, t: f32, outward_normal: Vec3, material: &'a ShadingMaterial) {
        self.t = t;
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
        self.p = ray.at(t) + self.normal * SURFACE_BIAS;
        self.material = material;
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object strictly inside `ray_t`.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;
}

/// Every primitive in the scene, tested by linear scan.
pub struct World {
    objects: Vec<Box<dyn Hittable>>,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object. Earlier objects win ties at equal distance.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Nearest hit strictly in front of the ray origin.
    pub fn closest_hit(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        let mut rec = HitRecord::default();
        if self.hit(ray, Interval::FORWARD, &mut rec) {
            Some(rec)
        } else {
            None
        }
    }

    /// Whether nothing blocks the ray from `point` along `direction`.
    ///
    /// Any hit at positive distance occludes; there is no partial attenuation.
    pub fn is_visible(&self, point: Vec3, direction: Vec3) -> bool {
        let ray = Ray::new(point, direction);
        let mut rec = HitRecord::default();
        !self
            .objects
            .iter()
            .any(|object| object.hit(&ray, Interval::FORWARD, &mut rec))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for World {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            let interval = Interval::new(ray_t.min, closest_so_far);
            if object.hit(ray, interval, rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }
}

use crate::Vec3;

/// A ray in 3D space.
///
/// `direction` is kept unit length by every constructor in the renderer so
/// that hit distances are world-space distances.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray. The direction is used as given.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray towards `target`, normalizing the direction.
    pub fn towards(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, (target - origin).normalize())
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

//! Component types stored in a [`Scene`](crate::Scene).
//!
//! Components hold only authored values. Quantities the renderer needs
//! (lens area, light frame, material alpha, ...) are derived on demand from
//! these values, so a component can never hold a stale derivation.

use std::f32::consts::PI;

use lumen_math::{lerp, Vec3};
use serde::{Deserialize, Serialize};

/// Color type alias (linear RGB).
pub type Color = Vec3;

/// Fresnel reflectance at normal incidence for common dielectrics.
pub const MIN_DIELECTRIC_F0: f32 = 0.04;

/// Convert an 8-bit authoring color to a radiometric diffuse base color.
///
/// The Lambertian `1/π` normalization is folded in here, so shading code
/// multiplies by the base color directly.
pub fn diffuse_map(rgb: [u8; 3]) -> Color {
    Color::new(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32) / 255.0 / PI
}

/// Rec. 601 luma of an 8-bit color, clamped to [0, 1].
pub fn grayscale(rgb: [u8; 3]) -> f32 {
    let y = 0.299 * rgb[0] as f32 + 0.587 * rgb[1] as f32 + 0.114 * rgb[2] as f32;
    (y / 255.0).clamp(0.0, 1.0)
}

/// Luminance of a linear color (Rec. 709).
#[inline]
pub fn luminance(c: Color) -> f32 {
    0.2126 * c.x + 0.7152 * c.y + 0.0722 * c.z
}

/// A physical camera with a thin lens.
///
/// Lengths describing the sensor and lens are in millimetres; `position` and
/// `focus_distance` are in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Lens center in world space
    pub position: Vec3,
    /// Viewing direction (unit length)
    pub direction: Vec3,
    /// Sensor width in mm
    pub sensor_width: f32,
    /// Sensor height in mm
    pub sensor_height: f32,
    /// Focal length in mm
    pub focal_length: f32,
    /// Aperture as an f-number (must be > 0)
    pub aperture: f32,
    /// Shutter time
    pub shutter: f32,
    /// Sensor sensitivity
    pub iso: f32,
    /// Distance to the plane of perfect focus, along `direction`
    pub focus_distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::Z,
            sensor_width: 35.0,
            sensor_height: 24.0,
            focal_length: 35.0,
            aperture: 8.0,
            shutter: 100.0,
            iso: 100.0,
            focus_distance: 10.0,
        }
    }
}

impl Camera {
    /// Create a camera at `position` looking along `direction`.
    ///
    /// `direction` is normalized.
    pub fn new(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            direction: direction.normalize_or_zero(),
            ..Default::default()
        }
    }

    /// Set sensor size and focal length (all in mm).
    pub fn with_optics(mut self, sensor_width: f32, sensor_height: f32, focal_length: f32) -> Self {
        self.sensor_width = sensor_width;
        self.sensor_height = sensor_height;
        self.focal_length = focal_length;
        self
    }

    /// Set exposure settings.
    pub fn with_exposure(mut self, aperture: f32, shutter: f32, iso: f32) -> Self {
        self.aperture = aperture;
        self.shutter = shutter;
        self.iso = iso;
        self
    }

    /// Set the focus distance.
    pub fn with_focus(mut self, focus_distance: f32) -> Self {
        self.focus_distance = focus_distance;
        self
    }

    /// Lens radius in mm: focal_length / 2 / aperture.
    pub fn lens_radius(&self) -> f32 {
        self.focal_length / 2.0 / self.aperture
    }

    /// Lens area in mm².
    pub fn lens_area(&self) -> f32 {
        PI * self.lens_radius().powi(2)
    }

    /// Exposure scale applied to mean radiance: lens area / shutter * ISO.
    pub fn exposure(&self) -> f32 {
        self.lens_area() / self.shutter * self.iso
    }

    /// Correction for the density of lens-point sampling: aperture / (π * focal length).
    pub fn sampling_correction(&self) -> f32 {
        self.aperture / (PI * self.focal_length)
    }

    /// Whether the camera can produce rays at all.
    pub fn is_valid(&self) -> bool {
        let direction_ok = (self.direction.length() - 1.0).abs() < 1e-3;
        let optics_ok = self.aperture > 0.0
            && self.aperture.is_finite()
            && self.focal_length > 0.0
            && self.sensor_width > 0.0
            && self.sensor_height > 0.0
            && self.shutter > 0.0
            && self.focus_distance > 0.0;
        direction_ok && optics_ok && self.position.is_finite()
    }
}

/// A distant light with a small angular extent (a sun).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    /// Direction light travels, from the light toward the scene (unit length)
    pub direction: Vec3,
    /// Scalar intensity
    pub intensity: f32,
    /// Angular diameter of the light disk in degrees
    pub disk_angle: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::NEG_Y,
            intensity: 1000.0,
            disk_angle: 0.53,
        }
    }
}

impl DirectionalLight {
    pub fn new(direction: Vec3, intensity: f32, disk_angle: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            intensity,
            disk_angle,
        }
    }

    /// Unit vector pointing from a surface toward the light.
    pub fn light_dir(&self) -> Vec3 {
        (-self.direction).normalize_or_zero()
    }

    pub fn angle_radians(&self) -> f32 {
        self.disk_angle * PI / 180.0
    }

    /// Cosine of the disk's angular radius.
    pub fn half_angle_cos(&self) -> f32 {
        (self.angle_radians() / 2.0).cos()
    }

    /// Per-channel radiance delivered by one light sample.
    ///
    /// A zero disk angle is a delta light and keeps the unscaled intensity.
    pub fn intensity_map(&self) -> Color {
        let angle = self.angle_radians();
        let scale = if angle > 0.0 { angle } else { 1.0 };
        Color::splat(self.intensity / 3.0 * scale)
    }

    pub fn is_valid(&self) -> bool {
        self.light_dir() != Vec3::ZERO
            && self.intensity.is_finite()
            && self.disk_angle >= 0.0
            && self.disk_angle < 180.0
    }
}

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn radius_squared(&self) -> f32 {
        self.radius * self.radius
    }
}

/// A parallelogram given by three consecutive corners.
///
/// The fourth corner is derived as `v0 + (v2 - v1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

impl Plane {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Axis-aligned square of half-size `half_extent` centered at `center`,
    /// facing +Y.
    pub fn horizontal(center: Vec3, half_extent: f32) -> Self {
        let h = half_extent;
        Self {
            v0: center + Vec3::new(-h, 0.0, -h),
            v1: center + Vec3::new(-h, 0.0, h),
            v2: center + Vec3::new(h, 0.0, h),
        }
    }

    pub fn v3(&self) -> Vec3 {
        self.v0 + (self.v2 - self.v1)
    }

    fn raw_normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(self.v2 - self.v0)
    }

    /// Unit face normal, or zero for a degenerate quad.
    pub fn normal(&self) -> Vec3 {
        self.raw_normal().normalize_or_zero()
    }

    /// Length of the unnormalized edge cross product.
    pub fn area(&self) -> f32 {
        self.raw_normal().length()
    }
}

/// A metal/roughness surface description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color, already passed through [`diffuse_map`]
    pub base_color: Color,
    /// Perceptual roughness in [0, 1]
    pub roughness: f32,
    /// Metalness in [0, 1]
    pub metalness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: diffuse_map([128, 128, 128]),
            roughness: 0.5,
            metalness: 0.0,
        }
    }
}

impl Material {
    pub fn new(base_color: Color, roughness: f32, metalness: f32) -> Self {
        Self {
            base_color,
            roughness: roughness.clamp(0.0, 1.0),
            metalness: metalness.clamp(0.0, 1.0),
        }
    }

    /// Create a material from an 8-bit authoring color.
    pub fn from_rgb8(rgb: [u8; 3], roughness: f32, metalness: f32) -> Self {
        Self::new(diffuse_map(rgb), roughness, metalness)
    }

    pub fn diffuse_reflectance(&self) -> Color {
        self.base_color * (1.0 - self.metalness)
    }

    /// GGX alpha (roughness²).
    pub fn alpha(&self) -> f32 {
        self.roughness * self.roughness
    }

    pub fn alpha_squared(&self) -> f32 {
        self.alpha() * self.alpha()
    }

    pub fn specular_f0(&self) -> Color {
        Color::new(
            lerp(MIN_DIELECTRIC_F0, self.base_color.x, self.metalness),
            lerp(MIN_DIELECTRIC_F0, self.base_color.y, self.metalness),
            lerp(MIN_DIELECTRIC_F0, self.base_color.z, self.metalness),
        )
    }

    /// Grazing reflectance, darkened for materials with very low F0.
    pub fn shadowed_f90(&self) -> f32 {
        (luminance(self.specular_f0()) / MIN_DIELECTRIC_F0).min(1.0)
    }
}

//! Point lights and shadow-ray construction.

use crate::{Color, RAY_EPSILON};
use glint_math::{Ray, Vec3};
use std::f32::consts::PI;

/// A light source. Closed set of variants dispatched by `match`.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Point(PointLight),
}

impl Light {
    /// Unoccluded contribution of this light at a surface point.
    pub fn illuminate(&self, point: Vec3, normal: Vec3) -> Color {
        match self {
            Light::Point(light) => light.illuminate(point, normal),
        }
    }

    /// Ray from `point` toward the light, and the distance it may travel
    /// before reaching the light.
    pub fn shadow_ray(&self, point: Vec3) -> (Ray, f32) {
        match self {
            Light::Point(light) => light.shadow_ray(point),
        }
    }
}

impl From<PointLight> for Light {
    fn from(light: PointLight) -> Self {
        Light::Point(light)
    }
}

/// An isotropic point light.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    position: Vec3,
    intensity: Color,
}

impl PointLight {
    pub fn new(position: Vec3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn intensity(&self) -> Color {
        self.intensity
    }

    /// Lambertian irradiance with `1 / (1 + d^2)` falloff.
    ///
    /// The unit bias keeps the falloff finite right next to the light.
    pub fn illuminate(&self, point: Vec3, normal: Vec3) -> Color {
        let to_light = self.position - point;
        let dist2 = to_light.length_squared();
        if dist2 == 0.0 {
            return Color::ZERO;
        }
        let direction = to_light / dist2.sqrt();

        let attenuation = 1.0 / (1.0 + dist2);
        let irradiance = direction.dot(normal).max(0.0) / PI;
        self.intensity * attenuation * irradiance
    }

    pub fn shadow_ray(&self, point: Vec3) -> (Ray, f32) {
        let to_light = self.position - point;
        let dist = to_light.length();
        // A point on the light has no direction to shadow-test
        if dist == 0.0 {
            return (Ray::new(point, Vec3::ZERO), 0.0);
        }
        let direction = to_light / dist;

        let ray = Ray::new(point + RAY_EPSILON * direction, direction);
        (ray, dist - RAY_EPSILON)
    }
}

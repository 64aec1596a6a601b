//! Sphere primitive for ray tracing.

use crate::{Intersection, MaterialId};
use glint_math::{Interval, Ray, Vec2, Vec3};
use std::f32::consts::PI;

/// A sphere primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: MaterialId,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Get the UV coordinates for a unit normal on the sphere.
    fn sphere_uv(normal: Vec3) -> Vec2 {
        // phi: angle around +Y measured from +X, in [0, 2pi)
        // theta: angle down from +Y, in [0, pi]
        let mut phi = normal.z.atan2(normal.x);
        if phi < 0.0 {
            phi += 2.0 * PI;
        }
        let theta = normal.y.clamp(-1.0, 1.0).acos();

        Vec2::new(phi / (2.0 * PI), theta / PI)
    }

    /// Nearest intersection with `ray` whose parameter lies in `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        let offset = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        if a == 0.0 {
            return None;
        }
        let b = ray.direction().dot(offset);
        let c = offset.length_squared() - self.radius * self.radius;

        let discriminant = b * b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (-b - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (-b + sqrtd) / a;
            if !ray_t.contains(root) {
                return None;
            }
        }

        let point = ray.at(root);
        let outward_normal = (point - self.center).normalize();
        let uv = Self::sphere_uv(outward_normal);

        Some(Intersection::new(
            ray,
            point,
            outward_normal,
            uv,
            root,
            self.material,
        ))
    }
}

//! Intersection record produced by primitive queries.

use crate::MaterialId;
use glint_math::{Ray, Vec2, Vec3};

/// Record of a ray-primitive intersection.
///
/// Built by a primitive's `intersect` and consumed within the same trace
/// step; never stored across steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal at the intersection (always points against the ray)
    pub normal: Vec3,
    /// Surface parameterization at the hit point
    pub uv: Vec2,
    /// Ray parameter t where the intersection occurs
    pub time: f32,
    /// Whether the geometric normal opposed the ray (the ray hit the outside)
    pub front_face: bool,
    /// Material of the hit primitive
    pub material: MaterialId,
}

impl Intersection {
    /// Build a record from the primitive's outward normal.
    ///
    /// The stored normal is flipped to face the incoming ray, and
    /// `front_face` records whether that flip was needed.
    pub fn new(
        ray: &Ray,
        point: Vec3,
        outward_normal: Vec3,
        uv: Vec2,
        time: f32,
        material: MaterialId,
    ) -> Self {
        // If the ray and normal point in the same direction, we're inside
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            point,
            normal,
            uv,
            time,
            front_face,
            material,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_face_keeps_normal() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = Intersection::new(&ray, Vec3::NEG_Z, Vec3::Z, Vec2::ZERO, 1.0, MaterialId(0));

        assert!(hit.front_face);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn test_back_face_flips_normal() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = Intersection::new(&ray, Vec3::NEG_Z, Vec3::NEG_Z, Vec2::ZERO, 1.0, MaterialId(3));

        assert!(!hit.front_face);
        assert_eq!(hit.normal, Vec3::Z);
        assert_eq!(hit.material, MaterialId(3));
    }
}

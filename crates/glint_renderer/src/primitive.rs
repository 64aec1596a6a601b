//! Primitive variants and the linear-scan primitive list.

use crate::{Intersection, MaterialId, Sphere, TriangleMesh};
use glint_math::{Interval, Ray};

/// A renderable shape. Closed set of variants dispatched by `match`.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
    TriangleMesh(TriangleMesh),
}

impl Primitive {
    /// Nearest intersection with this primitive inside `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        match self {
            Primitive::Sphere(sphere) => sphere.intersect(ray, ray_t),
            Primitive::TriangleMesh(mesh) => mesh.intersect(ray, ray_t),
        }
    }

    /// Handle of the material this primitive is shaded with.
    pub fn material(&self) -> MaterialId {
        match self {
            Primitive::Sphere(sphere) => sphere.material(),
            Primitive::TriangleMesh(mesh) => mesh.material(),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}

impl From<TriangleMesh> for Primitive {
    fn from(mesh: TriangleMesh) -> Self {
        Primitive::TriangleMesh(mesh)
    }
}

/// An insertion-ordered list of primitives.
///
/// Queries scan every primitive; there is no acceleration structure.
#[derive(Debug, Clone, Default)]
pub struct PrimitiveList {
    primitives: Vec<Primitive>,
}

impl PrimitiveList {
    /// Create a new empty primitive list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive to the end of the list.
    pub fn add(&mut self, primitive: impl Into<Primitive>) {
        self.primitives.push(primitive.into());
    }

    /// Get the number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter()
    }

    /// Closest intersection over all primitives.
    ///
    /// When two primitives report exactly the same time, the one added first
    /// wins: later hits must be strictly closer to replace the current best.
    pub fn intersect_nearest(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        let mut closest: Option<Intersection> = None;

        for primitive in &self.primitives {
            let interval = match &closest {
                Some(hit) => ray_t.with_max(hit.time),
                None => ray_t,
            };
            if let Some(hit) = primitive.intersect(ray, interval) {
                if closest.map_or(true, |best| hit.time < best.time) {
                    closest = Some(hit);
                }
            }
        }

        closest
    }

    /// First intersection found in insertion order, not necessarily the closest.
    pub fn intersect_any(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        self.primitives
            .iter()
            .find_map(|primitive| primitive.intersect(ray, ray_t))
    }
}

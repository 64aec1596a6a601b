//! Whitted-style recursive tracing.

use crate::{Color, Scene};
use glint_math::{Interval, Ray};

/// Something that computes the color seen along a ray.
///
/// Materials receive the tracer by reference and call back into it with a
/// smaller `depth` for reflected and refracted rays.
pub trait Tracer: Send + Sync {
    fn trace(&self, scene: &Scene, ray: &Ray, depth: u32) -> Color;
}

/// Classic Whitted tracer: nearest hit, then the hit material decides.
#[derive(Debug, Clone, PartialEq)]
pub struct WhittedTracer {
    background: Color,
}

impl WhittedTracer {
    /// Color returned for rays that leave the scene.
    pub const DEFAULT_BACKGROUND: Color = Color::new(0.6, 0.6, 0.8, 1.0);

    pub fn new(background: Color) -> Self {
        Self { background }
    }

    pub fn background(&self) -> Color {
        self.background
    }
}

impl Default for WhittedTracer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BACKGROUND)
    }
}

impl Tracer for WhittedTracer {
    fn trace(&self, scene: &Scene, ray: &Ray, depth: u32) -> Color {
        match scene.intersect_nearest(ray, Interval::FORWARD) {
            Some(hit) => scene
                .material(hit.material)
                .shade(&hit, scene, ray, self, depth),
            None => self.background,
        }
    }
}

//! Glint Renderer - progressive Whitted-style CPU ray tracing.
//!
//! A scene of spheres and triangle meshes lit by point lights is traced
//! recursively (reflection, refraction and shadow rays up to a fixed depth).
//! The [`Renderer`] spreads jittered samples over the image in a shuffled
//! order and accumulates them into a [`Film`] one bounded batch at a time,
//! so the caller's event loop stays responsive while the image converges.

mod camera;
mod color;
mod config;
mod film;
mod intersection;
mod light;
mod material;
mod primitive;
mod renderer;
mod scene;
mod sphere;
mod tracer;
mod triangle_mesh;

pub use camera::Camera;
pub use color::{linear_to_byte, srgb_to_byte, Color};
pub use config::RenderConfig;
pub use film::{Film, FilmError, PixelFormat};
pub use intersection::Intersection;
pub use light::{Light, PointLight};
pub use material::{Checkerboard, Dielectric, Diffuse, Glossy, Material, MaterialId, Mirror};
pub use primitive::{Primitive, PrimitiveList};
pub use renderer::{RenderError, RenderStatus, Renderer};
pub use scene::{Scene, SceneError};
pub use sphere::Sphere;
pub use tracer::{Tracer, WhittedTracer};
pub use triangle_mesh::{GeometryError, TriangleMesh};

/// Re-export the math types used throughout the public API.
pub use glint_math::{Interval, Ray, Vec2, Vec3, Vec4};

/// Offset applied to secondary ray origins to avoid self-intersection.
pub const RAY_EPSILON: f32 = 1e-4;

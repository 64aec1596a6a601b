//! Indexed triangle mesh primitive.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection. The
//! whole mesh is scanned per query and the nearest accepted triangle wins.

use crate::{Intersection, MaterialId};
use glint_math::{Interval, Ray, Vec2, Vec3};
use thiserror::Error;

/// Determinant threshold below which a ray counts as parallel to a triangle.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Errors raised while constructing a mesh from raw buffers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Index count {0} is not a multiple of 3")]
    IndexCountNotMultipleOfThree(usize),

    #[error("Index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Mesh has {positions} positions but {uvs} UV coordinates")]
    UvCountMismatch { positions: usize, uvs: usize },
}

/// Result type for geometry construction.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// A triangle mesh: vertex positions, optional per-vertex UVs and triangle indices.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions (one Vec3 per vertex)
    positions: Vec<Vec3>,
    /// UV coordinates (optional - one per vertex)
    uvs: Option<Vec<Vec2>>,
    /// Triangle indices (every 3 indices form a triangle)
    indices: Vec<u32>,
    material: MaterialId,
}

impl TriangleMesh {
    /// Create a mesh, validating the index and UV buffers.
    pub fn new(
        positions: Vec<Vec3>,
        uvs: Option<Vec<Vec2>>,
        indices: Vec<u32>,
        material: MaterialId,
    ) -> GeometryResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(GeometryError::IndexCountNotMultipleOfThree(indices.len()));
        }

        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &index)| index as usize >= positions.len())
        {
            return Err(GeometryError::IndexOutOfRange {
                position,
                index,
                vertex_count: positions.len(),
            });
        }

        if let Some(uvs) = &uvs {
            if uvs.len() != positions.len() {
                return Err(GeometryError::UvCountMismatch {
                    positions: positions.len(),
                    uvs: uvs.len(),
                });
            }
        }

        Ok(Self {
            positions,
            uvs,
            indices,
            material,
        })
    }

    /// Axis-aligned quad from four corners given in winding order, with UVs
    /// spanning [0, 1] across it.
    pub fn quad(corners: [Vec3; 4], material: MaterialId) -> Self {
        Self {
            positions: corners.to_vec(),
            uvs: Some(vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ]),
            indices: vec![0, 1, 2, 0, 2, 3],
            material,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn uvs(&self) -> Option<&[Vec2]> {
        self.uvs.as_deref()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Nearest intersection with any triangle whose parameter lies in `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        let mut closest_hit = None;
        let mut best_time = ray_t.max;

        for triangle in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            );
            let v0 = self.positions[i0];
            let v1 = self.positions[i1];
            let v2 = self.positions[i2];

            let edge1 = v1 - v0;
            let edge2 = v2 - v0;

            let h = ray.direction().cross(edge2);
            let det = edge1.dot(h);

            // Ray is parallel to triangle
            if det.abs() < PARALLEL_EPSILON {
                continue;
            }

            let inv_det = 1.0 / det;
            let s = ray.origin() - v0;
            let u = inv_det * s.dot(h);
            if !(0.0..=1.0).contains(&u) {
                continue;
            }

            let q = s.cross(edge1);
            let v = inv_det * ray.direction().dot(q);
            if v < 0.0 || u + v > 1.0 {
                continue;
            }

            let t = inv_det * edge2.dot(q);
            // Equal times keep the earlier triangle
            if !ray_t.contains(t) || (closest_hit.is_some() && t >= best_time) {
                continue;
            }

            best_time = t;
            let normal = edge1.cross(edge2).normalize();
            let uv = match &self.uvs {
                Some(uvs) => interpolate(u, v, uvs[i0], uvs[i1], uvs[i2]),
                None => Vec2::ZERO,
            };

            closest_hit = Some(Intersection::new(
                ray,
                ray.at(t),
                normal,
                uv,
                t,
                self.material,
            ));
        }

        closest_hit
    }
}

/// Barycentric interpolation of a per-vertex attribute.
#[inline]
fn interpolate(u: f32, v: f32, a0: Vec2, a1: Vec2, a2: Vec2) -> Vec2 {
    (1.0 - u - v) * a0 + u * a1 + v * a2
}

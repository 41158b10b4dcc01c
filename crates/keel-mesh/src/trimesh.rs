//! Indexed triangle meshes and closed-mesh metrics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use keel_math::{Pose, Vec2, Vec3};

use crate::polygon;

/// Errors from constructing a mesh out of raw vertex/index data.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("triangle {triangle} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("a closed mesh needs at least 4 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("cross-section polygon is degenerate or self-intersecting")]
    DegenerateSection,
}

/// An indexed triangulated surface.
///
/// Vertices are local-space positions; faces are index triples wound
/// counter-clockwise viewed from outside. The volume and centroid
/// formulas assume the surface is closed and manifold. That is a
/// documented precondition, not a runtime check: an open or
/// non-manifold mesh yields a volume of undefined magnitude and sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriMesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[usize; 3]>,
}

/// Volume and approximate centroid of a mesh at a pose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MeshProperties {
    /// Enclosed volume (m³).
    pub volume: f64,
    /// Arithmetic mean of the vertex positions (m). An approximation of
    /// the volumetric centroid; see [`TriMesh::vertex_mean`].
    pub centroid: Vec3,
}

impl TriMesh {
    /// Build a mesh, validating that every face index is in range.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<[usize; 3]>) -> crate::Result<Self> {
        if vertices.len() < 4 {
            return Err(MeshError::TooFewVertices(vertices.len()));
        }
        for (triangle, face) in faces.iter().enumerate() {
            for &index in face {
                if index >= vertices.len() {
                    return Err(MeshError::IndexOutOfRange {
                        triangle,
                        index,
                        vertex_count: vertices.len(),
                    });
                }
            }
        }
        Ok(Self { vertices, faces })
    }

    /// Axis-aligned box with the given half-extents, centered at the
    /// local origin.
    pub fn cuboid(hx: f64, hy: f64, hz: f64) -> Self {
        let vertices = vec![
            Vec3::new(-hx, -hy, -hz),
            Vec3::new(hx, -hy, -hz),
            Vec3::new(hx, hy, -hz),
            Vec3::new(-hx, hy, -hz),
            Vec3::new(-hx, -hy, hz),
            Vec3::new(hx, -hy, hz),
            Vec3::new(hx, hy, hz),
            Vec3::new(-hx, hy, hz),
        ];
        let faces = vec![
            [0, 3, 2],
            [0, 2, 1], // bottom
            [4, 5, 6],
            [4, 6, 7], // top
            [0, 1, 5],
            [0, 5, 4], // -y
            [1, 2, 6],
            [1, 6, 5], // +x
            [2, 3, 7],
            [2, 7, 6], // +y
            [3, 0, 4],
            [3, 4, 7], // -x
        ];
        Self { vertices, faces }
    }

    /// Closed right prism over a simple polygon, extruded along Z and
    /// centered on the local XY plane. The cross-section may be concave;
    /// caps are ear-clipped.
    pub fn prism(section: &[Vec2], height: f64) -> crate::Result<Self> {
        let mut pts = section.to_vec();
        if polygon::signed_area(&pts) < 0.0 {
            pts.reverse();
        }
        let cap = polygon::triangulate(&pts).ok_or(MeshError::DegenerateSection)?;

        let n = pts.len();
        let hz = height * 0.5;
        let mut vertices = Vec::with_capacity(2 * n);
        for p in &pts {
            vertices.push(Vec3::new(p.x, p.y, -hz));
        }
        for p in &pts {
            vertices.push(Vec3::new(p.x, p.y, hz));
        }

        let mut faces = Vec::with_capacity(4 * n - 4);
        for t in &cap {
            faces.push([t[0] + n, t[1] + n, t[2] + n]); // top, +z
            faces.push([t[0], t[2], t[1]]); // bottom, reversed
        }
        for i in 0..n {
            let j = (i + 1) % n;
            faces.push([i, j, j + n]);
            faces.push([i, j + n, i + n]);
        }
        Ok(Self { vertices, faces })
    }

    /// World-space copy of this mesh.
    pub fn transformed(&self, pose: &Pose) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| pose.transform_point(v)).collect(),
            faces: self.faces.clone(),
        }
    }

    /// Enclosed volume via the divergence-theorem surface integral:
    /// (1/6) Σ dot(v0, cross(v1, v2)) over the faces. Requires a closed
    /// mesh with outward winding.
    pub fn volume(&self) -> f64 {
        let mut six_vol = 0.0;
        for f in &self.faces {
            let v0 = &self.vertices[f[0]];
            let v1 = &self.vertices[f[1]];
            let v2 = &self.vertices[f[2]];
            six_vol += v0.dot(&v1.cross(v2));
        }
        six_vol / 6.0
    }

    /// Arithmetic mean of the vertex positions.
    ///
    /// A deliberate approximation of the volumetric centroid, biased
    /// toward densely tessellated regions. The equilibrium solver is
    /// calibrated against this approximation; do not substitute the
    /// exact centroid.
    pub fn vertex_mean(&self) -> Vec3 {
        if self.vertices.is_empty() {
            return Vec3::zeros();
        }
        let mut sum = Vec3::zeros();
        for v in &self.vertices {
            sum += v;
        }
        sum / self.vertices.len() as f64
    }
}

/// Volume and approximate centroid of `mesh` posed by `pose`, computed
/// on a world-transformed working copy. Pure: the input mesh is never
/// mutated.
pub fn mesh_properties(mesh: &TriMesh, pose: &Pose) -> MeshProperties {
    let world = mesh.transformed(pose);
    MeshProperties {
        volume: world.volume(),
        centroid: world.vertex_mean(),
    }
}

//! Triangle-mesh geometry for the keel hydrostatics solver.
//!
//! Provides the indexed triangle mesh with closed-mesh volume and
//! centroid metrics, 2D polygon triangulation, and half-space clipping
//! against the water plane with waterline capping.

pub mod clip;
pub mod polygon;
pub mod trimesh;

pub use clip::{
    submerged_properties, CapResult, CappedMesh, ClipKernel, HalfSpaceClipper, Plane,
    SubmergedProperties,
};
pub use trimesh::{mesh_properties, MeshError, MeshProperties, TriMesh};

/// Result alias for mesh construction.
pub type Result<T> = std::result::Result<T, MeshError>;

//! Rigid bodies and auxiliary masses.

use serde::{Deserialize, Serialize};

use keel_math::{Pose, Vec3};
use keel_mesh::TriMesh;

/// Default density for the primary body (kg/m³), an expanded-foam-like
/// float.
pub const DEFAULT_BODY_DENSITY: f64 = 30.0;

/// Default density for mesh-derived auxiliary masses (kg/m³).
pub const DEFAULT_AUXILIARY_DENSITY: f64 = 700.0;

/// How the primary body's mass is specified.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum MassSource {
    /// Uniform density (kg/m³); mass = mesh volume × density.
    Density(f64),
    /// Explicit total mass (kg).
    Explicit(f64),
}

/// The floating body: a closed mesh, its world pose, and its mass
/// source. An explicit value type; the solver never reads ambient
/// scene state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    pub mesh: TriMesh,
    pub pose: Pose,
    pub mass: MassSource,
}

impl RigidBody {
    /// Body at the default density.
    pub fn new(mesh: TriMesh, pose: Pose) -> Self {
        Self::with_density(mesh, pose, DEFAULT_BODY_DENSITY)
    }

    /// Body with a uniform density (kg/m³).
    pub fn with_density(mesh: TriMesh, pose: Pose, density: f64) -> Self {
        Self {
            mesh,
            pose,
            mass: MassSource::Density(density),
        }
    }

    /// Body with an explicit total mass (kg).
    pub fn with_mass(mesh: TriMesh, pose: Pose, mass: f64) -> Self {
        Self {
            mesh,
            pose,
            mass: MassSource::Explicit(mass),
        }
    }
}

/// Extra weight that shifts total mass and center of gravity but never
/// contributes to submerged-volume computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuxiliaryMass {
    /// Known mass (kg) at a world position.
    Point { mass: f64, position: Vec3 },
    /// Mass derived from a mesh: volume at `pose` times `density`.
    Meshed {
        mesh: TriMesh,
        pose: Pose,
        density: f64,
    },
}

impl AuxiliaryMass {
    /// Point mass at a world position.
    pub fn point(mass: f64, position: Vec3) -> Self {
        Self::Point { mass, position }
    }

    /// Mesh-derived mass at the default auxiliary density.
    pub fn meshed(mesh: TriMesh, pose: Pose) -> Self {
        Self::Meshed {
            mesh,
            pose,
            density: DEFAULT_AUXILIARY_DENSITY,
        }
    }
}

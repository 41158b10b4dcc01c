//! Mass aggregation: total mass and world center of gravity.

use serde::{Deserialize, Serialize};

use keel_math::Vec3;
use keel_mesh::mesh_properties;

use crate::body::{AuxiliaryMass, MassSource, RigidBody};

/// Total mass and mass-weighted world center of gravity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MassProperties {
    /// Combined mass of the body and all auxiliaries (kg).
    pub total_mass: f64,
    /// Mass-weighted world center of gravity (m).
    pub cog: Vec3,
}

/// Aggregate the body and its auxiliary masses.
///
/// The body's center of gravity is the vertex mean of its mesh at its
/// pose; auxiliaries contribute either their explicit mass and position
/// or mesh-derived equivalents. A non-positive total mass yields a
/// center of gravity at the origin rather than an error.
pub fn aggregate(body: &RigidBody, auxiliaries: &[AuxiliaryMass]) -> MassProperties {
    let props = mesh_properties(&body.mesh, &body.pose);
    let body_mass = match body.mass {
        MassSource::Density(density) => props.volume * density,
        MassSource::Explicit(mass) => mass,
    };

    let mut total_mass = body_mass;
    let mut moment = props.centroid * body_mass;

    for aux in auxiliaries {
        let (mass, position) = match aux {
            AuxiliaryMass::Point { mass, position } => (*mass, *position),
            AuxiliaryMass::Meshed {
                mesh,
                pose,
                density,
            } => {
                let p = mesh_properties(mesh, pose);
                (p.volume * density, p.centroid)
            }
        };
        total_mass += mass;
        moment += position * mass;
    }

    let cog = if total_mass > 0.0 {
        moment / total_mass
    } else {
        Vec3::zeros()
    };
    MassProperties { total_mass, cog }
}

//! Body and mass model for the keel hydrostatics solver.
//!
//! `RigidBody` is the floating body; `AuxiliaryMass` entries shift mass
//! and center of gravity without contributing submerged volume. Mass
//! aggregation runs once per solve and its outputs are frozen inputs to
//! the equilibrium iteration.

pub mod body;
pub mod mass;

pub use body::{
    AuxiliaryMass, MassSource, RigidBody, DEFAULT_AUXILIARY_DENSITY, DEFAULT_BODY_DENSITY,
};
pub use mass::{aggregate, MassProperties};

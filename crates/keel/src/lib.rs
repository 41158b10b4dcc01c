//! keel: hydrostatic floating-equilibrium solver.
//!
//! Computes the resting position and orientation of a rigid body
//! partially submerged in a still fluid: plane-clipped submerged
//! geometry supplies buoyancy and the center of buoyancy, and a damped
//! proportional controller drives the pose until buoyancy balances
//! weight with the center of buoyancy under the center of gravity.
//!
//! This is the umbrella crate: it re-exports the member crates and
//! provides the [`solve_equilibrium`] entry point.

pub use keel_math::{self, Mat3, Pose, Quat, Vec2, Vec3, GRAVITY};
pub use keel_mesh::{
    self, mesh_properties, submerged_properties, CapResult, CappedMesh, ClipKernel,
    HalfSpaceClipper, MeshError, MeshProperties, Plane, SubmergedProperties, TriMesh,
};
pub use keel_model::{
    self, aggregate, AuxiliaryMass, MassProperties, MassSource, RigidBody,
    DEFAULT_AUXILIARY_DENSITY, DEFAULT_BODY_DENSITY,
};
pub use keel_solver::{
    self, EquilibriumSolver, Fluid, SolveReport, SolveStatus, SolveTrace, SolverConfig,
    TraceSample, DEFAULT_WATER_DENSITY,
};

/// Solve for the floating equilibrium of `body` using the default
/// half-space clipping kernel.
pub fn solve_equilibrium(
    body: &RigidBody,
    auxiliaries: &[AuxiliaryMass],
    fluid: &Fluid,
    config: &SolverConfig,
) -> SolveReport {
    EquilibriumSolver::new(*config).solve(body, auxiliaries, fluid)
}

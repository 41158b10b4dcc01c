//! Iterative hydrostatic equilibrium solver.
//!
//! Starting from the body's initial pose, each iteration clips the mesh
//! against the water plane, compares buoyancy and weight, and nudges
//! position and orientation toward balance with damped proportional
//! corrections. Terminates on convergence or iteration exhaustion; the
//! latter still yields the best pose found.

pub mod config;
pub mod solver;
pub mod trace;

pub use config::{Fluid, SolverConfig, DEFAULT_WATER_DENSITY};
pub use solver::{EquilibriumSolver, SolveReport, SolveStatus};
pub use trace::{SolveTrace, TraceSample};

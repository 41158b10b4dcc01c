//! Solver configuration and fluid parameters.

use serde::{Deserialize, Serialize};

use keel_mesh::Plane;

/// Default fluid density (kg/m³): seawater.
pub const DEFAULT_WATER_DENSITY: f64 = 1025.0;

/// The still fluid the body floats in. The surface level is a
/// parameter; the solver treats world Z as vertical.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Fluid {
    /// Density (kg/m³).
    pub density: f64,
    /// The fluid surface.
    pub plane: Plane,
}

impl Fluid {
    /// Seawater with the surface at z = 0.
    pub fn seawater() -> Self {
        Self {
            density: DEFAULT_WATER_DENSITY,
            plane: Plane::horizontal(0.0),
        }
    }

    /// Same fluid with the surface moved to `level`.
    pub fn with_level(self, level: f64) -> Self {
        Self {
            plane: Plane::horizontal(level),
            ..self
        }
    }
}

impl Default for Fluid {
    fn default() -> Self {
        Self::seawater()
    }
}

/// Tolerances, gains, and clamps for the equilibrium iteration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Net vertical force below which heave is balanced (N).
    pub force_tolerance: f64,
    /// Horizontal COG/COB misalignment below which trim is balanced (m).
    pub alignment_tolerance: f64,
    /// Gain on the heave correction.
    pub damping_heave: f64,
    /// Gain on the rotational correction.
    pub damping_rot: f64,
    /// Iteration cap.
    pub max_iterations: usize,
    /// Per-step rotation clamp (rad).
    pub max_rotation_step: f64,
    /// Per-step heave clamp (m), applied before damping.
    pub max_heave_step: f64,
    /// Diagnostic sampling interval in iterations (minimum 1).
    pub trace_interval: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            force_tolerance: 1.0,
            alignment_tolerance: 0.01,
            damping_heave: 0.2,
            damping_rot: 0.1,
            max_iterations: 100,
            max_rotation_step: 0.05,
            max_heave_step: 1.0,
            trace_interval: 10,
        }
    }
}

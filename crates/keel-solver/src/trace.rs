//! Diagnostic trace of a solve.

use serde::{Deserialize, Serialize};

use keel_math::Vec3;

/// One sampled iteration of the equilibrium loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TraceSample {
    /// Iteration index the sample was taken at.
    pub iteration: usize,
    /// Net vertical force (N): buoyancy minus weight.
    pub net_force: f64,
    /// Horizontal COG−COB misalignment (m), x then y.
    pub misalignment: [f64; 2],
    /// Waterline cross-section area (m²).
    pub waterplane_area: f64,
}

/// Diagnostics accumulated over a solve: the frozen mass inputs plus
/// periodically sampled iteration records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveTrace {
    /// Total mass fed to the solver (kg).
    pub total_mass: f64,
    /// Initial world center of gravity (m).
    pub cog: [f64; 3],
    /// Sampled iteration records, oldest first.
    pub samples: Vec<TraceSample>,
}

impl SolveTrace {
    /// Empty trace holding the frozen mass inputs.
    pub fn new(total_mass: f64, cog: &Vec3) -> Self {
        Self {
            total_mass,
            cog: [cog.x, cog.y, cog.z],
            samples: Vec::new(),
        }
    }

    /// Append a sample.
    pub fn record(&mut self, sample: TraceSample) {
        self.samples.push(sample);
    }

    /// Number of samples recorded.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if no samples were recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Export as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

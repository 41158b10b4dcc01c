//! The iterative hydrostatic equilibrium loop.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use keel_math::{Pose, Quat, Vec3, GRAVITY};
use keel_mesh::{submerged_properties, ClipKernel, HalfSpaceClipper, SubmergedProperties};
use keel_model::{aggregate, AuxiliaryMass, RigidBody};

use crate::config::{Fluid, SolverConfig};
use crate::trace::{SolveTrace, TraceSample};

/// Constant stiffness (N/m) used when the body is entirely out of the
/// fluid and no volume-based estimate exists.
const DRY_STIFFNESS: f64 = 100.0;

/// Terminal state of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Force and alignment tolerances were met.
    Converged,
    /// The iteration cap was reached. Soft failure: the emitted pose is
    /// the best found and still usable.
    ExhaustedIterations,
}

/// Result of a solve: the final pose plus diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    /// Final pose of the body.
    pub pose: Pose,
    /// How the solve terminated.
    pub status: SolveStatus,
    /// Iterations performed before termination.
    pub iterations: usize,
    /// Mass inputs and sampled per-iteration diagnostics.
    pub trace: SolveTrace,
}

impl SolveReport {
    /// Whether the tolerances were met.
    pub fn converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }
}

/// Evolving state of one solve. Sole owner of the pose while the loop
/// runs.
struct SolverState {
    pose: Pose,
    iteration: usize,
}

/// Damped proportional-control solver for the floating equilibrium
/// pose.
///
/// Heave uses the linearized hydrostatic stiffness (fluid density × g ×
/// waterplane area); trim treats the horizontal COG/COB offset as a
/// proportional tipping error. Per-step clamps bound both corrections
/// so that discontinuous submerged-geometry changes (a corner crossing
/// the waterline) cannot cause divergence.
pub struct EquilibriumSolver {
    config: SolverConfig,
    kernel: Box<dyn ClipKernel>,
}

impl EquilibriumSolver {
    /// Solver with the default half-space clipping kernel.
    pub fn new(config: SolverConfig) -> Self {
        Self::with_kernel(config, Box::new(HalfSpaceClipper))
    }

    /// Solver with a custom geometry kernel.
    pub fn with_kernel(config: SolverConfig, kernel: Box<dyn ClipKernel>) -> Self {
        Self { config, kernel }
    }

    /// Iterate from the body's pose until buoyancy balances weight and
    /// the center of buoyancy sits under the center of gravity, or the
    /// iteration cap is reached.
    pub fn solve(
        &self,
        body: &RigidBody,
        auxiliaries: &[AuxiliaryMass],
        fluid: &Fluid,
    ) -> SolveReport {
        let cfg = &self.config;
        let mass = aggregate(body, auxiliaries);
        let weight = mass.total_mass * GRAVITY;

        // The COG rides with the body: fix it in the body frame once,
        // from the initial pose.
        let cog_local = body.pose.inverse_transform_point(&mass.cog);

        info!(
            "solving hydrostatic equilibrium: mass {:.2} kg, cog ({:.3}, {:.3}, {:.3})",
            mass.total_mass, mass.cog.x, mass.cog.y, mass.cog.z
        );

        let mut trace = SolveTrace::new(mass.total_mass, &mass.cog);
        let mut state = SolverState {
            pose: body.pose,
            iteration: 0,
        };

        for i in 0..cfg.max_iterations {
            state.iteration = i;

            let sub = submerged_properties(
                &body.mesh,
                &state.pose,
                &fluid.plane,
                self.kernel.as_ref(),
            );
            let buoyancy = sub.volume * fluid.density * GRAVITY;
            let net_force = buoyancy - weight;

            let cog_world = state.pose.transform_point(&cog_local);
            let dx = cog_world.x - sub.centroid.x;
            let dy = cog_world.y - sub.centroid.y;

            if net_force.abs() < cfg.force_tolerance
                && dx.abs() < cfg.alignment_tolerance
                && dy.abs() < cfg.alignment_tolerance
            {
                info!("converged in {} iterations", state.iteration);
                return SolveReport {
                    pose: state.pose,
                    status: SolveStatus::Converged,
                    iterations: state.iteration,
                    trace,
                };
            }

            if i % cfg.trace_interval.max(1) == 0 {
                trace.record(TraceSample {
                    iteration: i,
                    net_force,
                    misalignment: [dx, dy],
                    waterplane_area: sub.waterplane_area,
                });
                debug!(
                    "iter {}: f_net={:.1} N, d=({:.3}, {:.3}) m, wpa={:.2} m2",
                    i, net_force, dx, dy, sub.waterplane_area
                );
            }

            let reducer = step_reducer(i);
            state.pose = self.step(&state.pose, net_force, dx, dy, &sub, fluid, reducer);
        }

        warn!(
            "did not converge within {} iterations",
            cfg.max_iterations
        );
        SolveReport {
            pose: state.pose,
            status: SolveStatus::ExhaustedIterations,
            iterations: cfg.max_iterations,
            trace,
        }
    }

    /// One correction step: a new pose from the current pose and this
    /// iteration's force and alignment errors.
    fn step(
        &self,
        pose: &Pose,
        net_force: f64,
        dx: f64,
        dy: f64,
        sub: &SubmergedProperties,
        fluid: &Fluid,
        reducer: f64,
    ) -> Pose {
        let cfg = &self.config;

        // Linearized hydrostatic stiffness. When the waterline
        // cross-section has vanished (fully submerged, fully emerged,
        // or a degenerate cap) fall back to a volume-based estimate,
        // then to a constant.
        let mut stiffness = fluid.density * GRAVITY * sub.waterplane_area;
        if stiffness < 1.0 {
            stiffness = if sub.volume > 0.0 {
                fluid.density * GRAVITY * sub.volume.powf(2.0 / 3.0)
            } else {
                DRY_STIFFNESS
            };
        }
        let dz = (net_force / stiffness).clamp(-cfg.max_heave_step, cfg.max_heave_step);
        let heave = dz * cfg.damping_heave * reducer;

        // COG ahead of COB in +x sinks the +x side: pitch about +Y, and
        // symmetrically roll about -X for the y error.
        let rot_y =
            (dx * cfg.damping_rot * reducer).clamp(-cfg.max_rotation_step, cfg.max_rotation_step);
        let rot_x =
            (-dy * cfg.damping_rot * reducer).clamp(-cfg.max_rotation_step, cfg.max_rotation_step);
        let increment = Quat::from_euler_xyz(rot_x, rot_y, 0.0);

        pose.translated(Vec3::new(0.0, 0.0, heave))
            .rotated_world(&increment)
    }
}

/// Annealing schedule: shrink steps as the iteration count grows to
/// suppress oscillation near the solution.
fn step_reducer(iteration: usize) -> f64 {
    if iteration > 80 {
        0.2
    } else if iteration > 50 {
        0.5
    } else {
        1.0
    }
}

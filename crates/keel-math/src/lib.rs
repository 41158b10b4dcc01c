//! Math primitives for the keel hydrostatics solver.
//!
//! Type aliases over nalgebra, a unit quaternion, and the TRS pose type
//! the equilibrium solver iterates on.

pub mod pose;
pub mod quaternion;

pub use pose::Pose;
pub use quaternion::Quat;

use nalgebra as na;

/// 3D vector alias.
pub type Vec3 = na::Vector3<f64>;
/// 2D vector alias.
pub type Vec2 = na::Vector2<f64>;
/// 3x3 matrix alias.
pub type Mat3 = na::Matrix3<f64>;

/// Standard gravity (m/s²).
pub const GRAVITY: f64 = 9.81;

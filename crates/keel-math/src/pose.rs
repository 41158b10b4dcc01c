//! World placement of a body: translation, rotation, scale.

use serde::{Deserialize, Serialize};

use crate::{Mat3, Quat, Vec3};

/// Position, orientation, and scale of a body in world space.
///
/// Transform order is scale, then rotation, then translation. During an
/// equilibrium solve only position and orientation evolve; scale is held
/// constant. Scale components must be non-zero for the inverse transform
/// to be meaningful.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pose {
    /// World translation.
    pub position: Vec3,
    /// World orientation.
    pub orientation: Quat,
    /// Per-axis scale applied in the body frame.
    pub scale: Vec3,
}

impl Pose {
    /// Identity pose: origin, no rotation, unit scale.
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Pose translated to `position` with no rotation and unit scale.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Rotation part as a 3x3 matrix.
    pub fn rotation_matrix(&self) -> Mat3 {
        self.orientation.to_matrix()
    }

    /// Map a local-space point to world space.
    pub fn transform_point(&self, p: &Vec3) -> Vec3 {
        self.position + self.orientation.rotate(&self.scale.component_mul(p))
    }

    /// Map a world-space point back to local space.
    pub fn inverse_transform_point(&self, p: &Vec3) -> Vec3 {
        self.orientation
            .conjugate()
            .rotate(&(p - self.position))
            .component_div(&self.scale)
    }

    /// New pose displaced by `offset` in world space.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            position: self.position + offset,
            ..*self
        }
    }

    /// New pose with `increment` applied in the world frame
    /// (left-composed onto the orientation), renormalized.
    pub fn rotated_world(&self, increment: &Quat) -> Self {
        Self {
            orientation: increment.mul(&self.orientation).normalize(),
            ..*self
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    #[test]
    fn test_transform_roundtrip() {
        let pose = Pose {
            position: Vec3::new(1.0, -2.0, 3.0),
            orientation: Quat::from_axis_angle(&Vec3::new(1.0, 1.0, 0.0).normalize(), 0.8),
            scale: Vec3::new(2.0, 0.5, 1.5),
        };
        let p = Vec3::new(0.3, 0.7, -1.1);
        let back = pose.inverse_transform_point(&pose.transform_point(&p));
        assert!((back - p).norm() < EPS);
    }

    #[test]
    fn test_scale_then_rotate_then_translate() {
        // 90 degrees about Z: local +X ends up along world +Y.
        let pose = Pose {
            position: Vec3::new(0.0, 0.0, 5.0),
            orientation: Quat::from_axis_angle(&Vec3::z(), std::f64::consts::FRAC_PI_2),
            scale: Vec3::new(3.0, 1.0, 1.0),
        };
        let p = pose.transform_point(&Vec3::x());
        assert!((p - Vec3::new(0.0, 3.0, 5.0)).norm() < EPS);
    }

    #[test]
    fn test_translated_is_pure() {
        let pose = Pose::identity();
        let moved = pose.translated(Vec3::new(0.0, 0.0, -0.25));
        assert_eq!(pose.position.z, 0.0);
        assert_eq!(moved.position.z, -0.25);
    }

    #[test]
    fn test_rotated_world_left_composes() {
        let base = Pose {
            orientation: Quat::from_axis_angle(&Vec3::x(), 0.3),
            ..Pose::identity()
        };
        let inc = Quat::from_axis_angle(&Vec3::y(), 0.2);
        let rotated = base.rotated_world(&inc);

        let expected = inc.mul(&base.orientation);
        assert!((rotated.orientation.w - expected.w).abs() < EPS);
        assert!((rotated.orientation.v - expected.v).norm() < EPS);
    }
}

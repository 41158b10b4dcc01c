//! Quaternion utilities for 3D rotations.
//!
//! Convention: q = [w; x, y, z] where w is the scalar part and (x, y, z)
//! the vector part.

use serde::{Deserialize, Serialize};

use crate::{Mat3, Vec3};

/// A unit quaternion representing a 3D rotation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quat {
    /// Scalar part (w).
    pub w: f64,
    /// Vector part (x, y, z).
    pub v: Vec3,
}

impl Quat {
    /// Create a new quaternion from scalar and vector parts.
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            w,
            v: Vec3::new(x, y, z),
        }
    }

    /// Identity quaternion (no rotation).
    pub fn identity() -> Self {
        Self {
            w: 1.0,
            v: Vec3::zeros(),
        }
    }

    /// Create a quaternion from axis-angle representation.
    /// `axis` should be a unit vector, `angle` in radians.
    pub fn from_axis_angle(axis: &Vec3, angle: f64) -> Self {
        let half_angle = angle * 0.5;
        let (s, c) = half_angle.sin_cos();
        Self { w: c, v: axis * s }
    }

    /// Create a quaternion from intrinsic XYZ Euler angles (radians):
    /// rotation about X, then Y, then Z.
    pub fn from_euler_xyz(rx: f64, ry: f64, rz: f64) -> Self {
        let qx = Self::from_axis_angle(&Vec3::x(), rx);
        let qy = Self::from_axis_angle(&Vec3::y(), ry);
        let qz = Self::from_axis_angle(&Vec3::z(), rz);
        qx.mul(&qy).mul(&qz)
    }

    /// Normalize this quaternion to unit length.
    pub fn normalize(&self) -> Self {
        let norm = (self.w * self.w + self.v.norm_squared()).sqrt();
        if norm < 1e-12 {
            return Self::identity();
        }
        Self {
            w: self.w / norm,
            v: self.v / norm,
        }
    }

    /// Quaternion multiplication: self * other.
    pub fn mul(&self, other: &Quat) -> Quat {
        Quat {
            w: self.w * other.w - self.v.dot(&other.v),
            v: self.v.cross(&other.v) + other.v * self.w + self.v * other.w,
        }
    }

    /// Conjugate of the quaternion (inverse for unit quaternions).
    pub fn conjugate(&self) -> Quat {
        Quat {
            w: self.w,
            v: -self.v,
        }
    }

    /// Rotate a vector: q v q*.
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        let t = 2.0 * self.v.cross(v);
        v + self.w * t + self.v.cross(&t)
    }

    /// Rotation angle (radians) in [0, pi].
    pub fn angle(&self) -> f64 {
        2.0 * self.v.norm().atan2(self.w.abs())
    }

    /// Convert quaternion to a 3x3 rotation matrix.
    pub fn to_matrix(&self) -> Mat3 {
        let w = self.w;
        let x = self.v.x;
        let y = self.v.y;
        let z = self.v.z;

        let x2 = x * x;
        let y2 = y * y;
        let z2 = z * z;
        let xy = x * y;
        let xz = x * z;
        let yz = y * z;
        let wx = w * x;
        let wy = w * y;
        let wz = w * z;

        Mat3::new(
            1.0 - 2.0 * (y2 + z2),
            2.0 * (xy - wz),
            2.0 * (xz + wy),
            2.0 * (xy + wz),
            1.0 - 2.0 * (x2 + z2),
            2.0 * (yz - wx),
            2.0 * (xz - wy),
            2.0 * (yz + wx),
            1.0 - 2.0 * (x2 + y2),
        )
    }
}

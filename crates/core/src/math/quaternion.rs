//! Unit quaternion algebra for orientation
//!
//! Quaternions are stored as `(w, x, y, z)` with `w` the scalar part.
//! Constructors that derive a rotation (Euler angles, axis-angle, from-to)
//! always return a unit quaternion.
//!
//! # Conventions
//!
//! - `a * b` is the Hamilton product: rotate by `b` first, then by `a`
//! - [`Quaternion::inverse`] is the conjugate and is only correct for unit
//!   quaternions; no norm division is performed
//! - Degenerate input (zero norm) yields the identity instead of NaN

use core::ops::Mul;
use libm::fabsf;
use nalgebra::{Unit, UnitQuaternion};

use super::vector3::Vector3;

/// Threshold on `cos θ` below which two directions are treated as antipodal
const ANTIPODAL_EPSILON: f32 = 1e-6;

/// Quaternion `(w, x, y, z)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// Identity rotation
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    /// Create a quaternion from scalar and vector components
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Four-dimensional Euclidean norm
    pub fn norm(&self) -> f32 {
        nalgebra::Quaternion::from(*self).norm()
    }

    /// Vector part `(x, y, z)`
    pub fn vector(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Inverse of a unit quaternion (its conjugate)
    ///
    /// Callers must guarantee `‖self‖ == 1`; the result is wrong otherwise.
    pub fn inverse(&self) -> Self {
        nalgebra::Quaternion::from(*self).conjugate().into()
    }

    /// Scale to unit norm
    ///
    /// Returns [`Quaternion::IDENTITY`] when the norm is zero.
    pub fn normalized(&self) -> Self {
        let q = nalgebra::Quaternion::from(*self);
        if q.norm() > 0.0 {
            q.normalize().into()
        } else {
            Self::IDENTITY
        }
    }

    /// Rotation from roll/pitch/yaw in degrees
    ///
    /// Roll about X, pitch about Y, yaw about Z, applied in that order. The
    /// result is unit by construction.
    pub fn from_euler_degrees(roll_deg: f32, pitch_deg: f32, yaw_deg: f32) -> Self {
        UnitQuaternion::from_euler_angles(
            roll_deg.to_radians(),
            pitch_deg.to_radians(),
            yaw_deg.to_radians(),
        )
        .into_inner()
        .into()
    }

    /// Rotation of `angle_rad` about `axis`
    ///
    /// The axis is normalized first. A zero axis yields a pure scalar
    /// quaternion `(cos(angle/2), 0, 0, 0)`.
    pub fn from_axis_angle(axis: &Vector3, angle_rad: f32) -> Self {
        match Unit::try_new(nalgebra::Vector3::from(*axis), 0.0) {
            Some(axis) => UnitQuaternion::from_axis_angle(&axis, angle_rad)
                .into_inner()
                .into(),
            None => Self::new(libm::cosf(angle_rad * 0.5), 0.0, 0.0, 0.0),
        }
    }

    /// Shortest-arc rotation taking direction `from` onto direction `to`
    ///
    /// Both inputs are normalized. For (nearly) opposite directions the axis
    /// is ambiguous; it is taken as `X × from`, or `Y × from` when `from` is
    /// collinear with X, and the result is a half turn about it. A zero
    /// input has no direction and yields the identity.
    pub fn from_to_rotation(from: &Vector3, to: &Vector3) -> Self {
        let f = from.normalized();
        let t = to.normalized();

        if f.dot(&t) < -1.0 + ANTIPODAL_EPSILON {
            let mut axis = Vector3::X.cross(&f);
            if axis.norm() < ANTIPODAL_EPSILON {
                axis = Vector3::Y.cross(&f);
            }
            return Self::from_axis_angle(&axis, core::f32::consts::PI);
        }

        let (f, t) = (nalgebra::Vector3::from(f), nalgebra::Vector3::from(t));
        UnitQuaternion::rotation_between(&f, &t)
            .map(|q| q.into_inner().into())
            .unwrap_or(Self::IDENTITY)
    }

    /// Rotate a vector by this (unit) quaternion: `q · (v, 0) · q⁻¹`
    pub fn rotate(&self, v: &Vector3) -> Vector3 {
        let q = UnitQuaternion::new_unchecked(nalgebra::Quaternion::from(*self));
        (q * nalgebra::Vector3::from(*v)).into()
    }

    /// Component-wise comparison within `epsilon`
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        fabsf(self.w - other.w) <= epsilon
            && fabsf(self.x - other.x) <= epsilon
            && fabsf(self.y - other.y) <= epsilon
            && fabsf(self.z - other.z) <= epsilon
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Hamilton product
    fn mul(self, q: Self) -> Self {
        (nalgebra::Quaternion::from(self) * nalgebra::Quaternion::from(q)).into()
    }
}

impl From<nalgebra::Quaternion<f32>> for Quaternion {
    fn from(q: nalgebra::Quaternion<f32>) -> Self {
        Self::new(q.w, q.i, q.j, q.k)
    }
}

impl From<Quaternion> for nalgebra::Quaternion<f32> {
    fn from(q: Quaternion) -> Self {
        nalgebra::Quaternion::new(q.w, q.x, q.y, q.z)
    }
}

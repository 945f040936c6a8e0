//! Minimal 3D vector algebra
//!
//! Only what the orientation pipeline needs: dot/cross products, length,
//! normalization and the angle between two directions.
//!
//! Zero-length input never produces NaN. `normalized()` of the zero vector
//! is the zero vector, which keeps control loops fed with a defined value.

use core::ops::{Add, Div, Mul, Neg, Sub};
use libm::acosf;

/// 3D vector of `f32` components
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// World X axis
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// World Y axis
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// World Z axis
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        nalgebra::Vector3::from(*self).dot(&nalgebra::Vector3::from(*other))
    }

    pub fn cross(&self, other: &Self) -> Self {
        nalgebra::Vector3::from(*self)
            .cross(&nalgebra::Vector3::from(*other))
            .into()
    }

    /// Euclidean length
    pub fn norm(&self) -> f32 {
        nalgebra::Vector3::from(*self).norm()
    }

    /// Unit vector in the same direction
    ///
    /// Returns [`Vector3::ZERO`] when the length is zero.
    pub fn normalized(&self) -> Self {
        nalgebra::Vector3::from(*self)
            .try_normalize(0.0)
            .map_or(Self::ZERO, Self::from)
    }

    /// Angle to `other` in radians, in `[0, π]`
    ///
    /// The cosine is clamped to `[-1, 1]` before `acos` so rounding at
    /// parallel/antiparallel inputs cannot yield NaN. A zero-length `self`
    /// has no direction and reads as angle 0.
    pub fn angle_to(&self, other: &Self) -> f32 {
        let n = self.norm();
        if n == 0.0 {
            return 0.0;
        }
        let cos = self.dot(&other.normalized()) / n;
        acosf(cos.clamp(-1.0, 1.0))
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vector3 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl From<nalgebra::Vector3<f32>> for Vector3 {
    fn from(v: nalgebra::Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for nalgebra::Vector3<f32> {
    fn from(v: Vector3) -> Self {
        nalgebra::Vector3::new(v.x, v.y, v.z)
    }
}

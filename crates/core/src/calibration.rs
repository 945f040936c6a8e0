//! Mount and user calibration of raw sensor orientation
//!
//! A [`CalibrationOffset`] holds one quaternion that is left-multiplied onto
//! every raw reading:
//!
//! ```text
//! corrected = offset * raw
//! ```
//!
//! Before any user calibration the offset is the fixed mount correction
//! between the sensor package and the body segment (a 90° roll in the
//! reference tracker). Calibrating replaces it wholesale with the inverse
//! of a reference reading, so that reference pose reads as identity.
//!
//! Waiting for the reference sample is the caller's concern; see
//! `TrackerNode::calibrate` in the `body_tracker` crate for the bounded wait.

use core::fmt;

use crate::math::Quaternion;

/// Default mount correction, roll/pitch/yaw in degrees
pub const DEFAULT_MOUNT_EULER_DEG: (f32, f32, f32) = (90.0, 0.0, 0.0);

/// Calibration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// No orientation sample arrived before the deadline
    Timeout {
        /// How long the caller waited (milliseconds)
        waited_ms: u64,
    },
    /// The orientation source was never initialized, so no sample can arrive
    SourceNotReady,
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::Timeout { waited_ms } => {
                write!(f, "No orientation sample within {} ms", waited_ms)
            }
            CalibrationError::SourceNotReady => write!(f, "Orientation source not ready"),
        }
    }
}

/// Active orientation correction
///
/// Exactly one offset is active at a time. [`CalibrationOffset::apply`] is a
/// pure function of the stored offset and its argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationOffset {
    offset: Quaternion,
    calibrated: bool,
}

impl Default for CalibrationOffset {
    /// Reference mount correction (90° roll), not calibrated
    fn default() -> Self {
        let (roll, pitch, yaw) = DEFAULT_MOUNT_EULER_DEG;
        Self::with_mount_euler(roll, pitch, yaw)
    }
}

impl CalibrationOffset {
    /// Use an explicit mount correction
    pub fn with_mount(mount: Quaternion) -> Self {
        Self {
            offset: mount,
            calibrated: false,
        }
    }

    /// Use a mount correction given as roll/pitch/yaw in degrees
    pub fn with_mount_euler(roll_deg: f32, pitch_deg: f32, yaw_deg: f32) -> Self {
        Self::with_mount(Quaternion::from_euler_degrees(roll_deg, pitch_deg, yaw_deg))
    }

    /// Store the inverse of `reference` as the new offset
    ///
    /// `reference` must be a unit quaternion (sensor output is).
    pub fn calibrate(&mut self, reference: Quaternion) {
        self.offset = reference.inverse();
        self.calibrated = true;
    }

    /// Corrected orientation: `offset * raw`
    ///
    /// The operand order is fixed: the raw device rotation is applied first,
    /// then the stored offset.
    pub fn apply(&self, raw: Quaternion) -> Quaternion {
        self.offset * raw
    }

    /// The quaternion currently left-multiplied onto readings
    pub fn offset(&self) -> Quaternion {
        self.offset
    }

    /// Whether a user calibration has replaced the mount correction
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    const TOLERANCE: f32 = 1e-5;

    #[test]
    fn test_default_is_mount_offset() {
        let cal = CalibrationOffset::default();
        let expected = Quaternion::from_euler_degrees(90.0, 0.0, 0.0);

        assert!(!cal.is_calibrated());
        assert_eq!(cal.offset(), expected);
        assert_ne!(cal.offset(), Quaternion::IDENTITY);
    }

    #[test]
    fn test_apply_identity_sample_yields_mount_offset() {
        let cal = CalibrationOffset::default();
        let corrected = cal.apply(Quaternion::IDENTITY);
        assert_eq!(corrected, cal.offset());
    }

    #[test]
    fn test_apply_is_left_multiplication() {
        let cal = CalibrationOffset::with_mount(Quaternion::from_axis_angle(&Vector3::X, 0.7));
        let raw = Quaternion::from_axis_angle(&Vector3::Y, -1.1);

        let expected: Quaternion =
            (nalgebra::Quaternion::from(cal.offset()) * nalgebra::Quaternion::from(raw)).into();
        let corrected = cal.apply(raw);

        assert!(corrected.approx_eq(&expected, TOLERANCE));
        // Swapped operands describe a different frame
        assert!(!corrected.approx_eq(&(raw * cal.offset()), TOLERANCE));
    }

    #[test]
    fn test_calibrate_stores_inverse() {
        let mut cal = CalibrationOffset::default();
        let reference = Quaternion::from_euler_degrees(12.0, -40.0, 155.0);

        cal.calibrate(reference);

        assert!(cal.is_calibrated());
        assert_eq!(cal.offset(), reference.inverse());
        assert!(cal
            .apply(reference)
            .approx_eq(&Quaternion::IDENTITY, TOLERANCE));
    }

    #[test]
    fn test_calibrate_on_mount_offset_yields_identity() {
        let mut cal = CalibrationOffset::default();
        let mount = cal.offset();

        cal.calibrate(mount);

        assert!(cal.apply(mount).approx_eq(&Quaternion::IDENTITY, TOLERANCE));
    }

    #[test]
    fn test_recalibrate_replaces_offset() {
        let mut cal = CalibrationOffset::default();
        let first = Quaternion::from_axis_angle(&Vector3::Z, 0.4);
        let second = Quaternion::from_axis_angle(&Vector3::X, -0.9);

        cal.calibrate(first);
        cal.calibrate(second);

        assert_eq!(cal.offset(), second.inverse());
        // Relative motion after calibration is preserved
        let moved = Quaternion::from_axis_angle(&Vector3::X, -0.4);
        let relative = cal.apply(moved);
        let expected = Quaternion::from_axis_angle(&Vector3::X, 0.5);
        assert!(relative.approx_eq(&expected, TOLERANCE));
    }

    #[test]
    fn test_timeout_display() {
        let err = CalibrationError::Timeout { waited_ms: 5000 };
        let mut buf = heapless::String::<64>::new();
        core::fmt::write(&mut buf, format_args!("{}", err)).unwrap();
        assert_eq!(buf.as_str(), "No orientation sample within 5000 ms");
    }
}

//! Joint orientation text record
//!
//! One corrected orientation per datagram, as plain text:
//!
//! ```text
//! <joint>:<x>,<y>,<z>,<w>
//! HIP:0.7071,0.0000,0.0000,0.7071
//! ```
//!
//! Components are written with four decimal places, vector part first.
//! The receiving side splits on the first `:` and expects exactly four
//! comma-separated numbers.

use core::fmt::{self, Write};

use heapless::String;

use crate::math::Quaternion;

/// Maximum encoded record length in bytes
pub const MAX_RECORD_LEN: usize = 64;

/// Encoded record buffer
pub type RecordBuf = String<MAX_RECORD_LEN>;

/// Separator between joint name and quaternion components
const JOINT_SEPARATOR: char = ':';

/// Joint names the skeleton receiver understands
pub const KNOWN_JOINTS: &[&str] = &[
    "HIP",
    "WAIST",
    "CHEST",
    "UPPER_CHEST",
    "NECK",
    "HEAD",
    "LEFT_SHOULDER",
    "LEFT_ELBOW",
    "LEFT_WRIST",
    "LEFT_HAND",
    "RIGHT_SHOULDER",
    "RIGHT_ELBOW",
    "RIGHT_WRIST",
    "RIGHT_HAND",
    "LEFT_HIP",
    "LEFT_KNEE",
    "LEFT_ANKLE",
    "LEFT_FOOT",
    "RIGHT_HIP",
    "RIGHT_KNEE",
    "RIGHT_ANKLE",
    "RIGHT_FOOT",
];

/// Whether `joint` names a skeleton joint
pub fn is_known_joint(joint: &str) -> bool {
    KNOWN_JOINTS.contains(&joint)
}

/// Record encode/decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// Encoded record does not fit in [`MAX_RECORD_LEN`]
    Overflow,
    /// No `:` between joint name and components
    MissingSeparator,
    /// Joint name is empty
    EmptyJoint,
    /// Not exactly four components
    ComponentCount(usize),
    /// Component is not a number
    InvalidNumber,
    /// Component is NaN or infinite
    NonFinite,
    /// Joint name is not in [`KNOWN_JOINTS`]
    UnknownJoint,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Overflow => write!(f, "Record exceeds {} bytes", MAX_RECORD_LEN),
            RecordError::MissingSeparator => write!(f, "Missing ':' after joint name"),
            RecordError::EmptyJoint => write!(f, "Empty joint name"),
            RecordError::ComponentCount(n) => write!(f, "Expected 4 components, got {}", n),
            RecordError::InvalidNumber => write!(f, "Invalid quaternion component"),
            RecordError::NonFinite => write!(f, "Non-finite quaternion component"),
            RecordError::UnknownJoint => write!(f, "Unknown joint name"),
        }
    }
}

/// Orientation of one named joint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointRecord<'a> {
    pub joint: &'a str,
    pub orientation: Quaternion,
}

impl<'a> JointRecord<'a> {
    pub fn new(joint: &'a str, orientation: Quaternion) -> Self {
        Self { joint, orientation }
    }

    /// Encode as `<joint>:<x>,<y>,<z>,<w>`
    pub fn encode(&self) -> Result<RecordBuf, RecordError> {
        let mut buf = RecordBuf::new();
        let q = &self.orientation;
        write!(
            buf,
            "{}{}{:.4},{:.4},{:.4},{:.4}",
            self.joint, JOINT_SEPARATOR, q.x, q.y, q.z, q.w
        )
        .map_err(|_| RecordError::Overflow)?;
        Ok(buf)
    }

    /// Decode a received record
    ///
    /// Surrounding whitespace (e.g. a trailing newline from a serial
    /// console) is ignored.
    pub fn decode(line: &'a str) -> Result<Self, RecordError> {
        let (joint, values) = line
            .trim()
            .split_once(JOINT_SEPARATOR)
            .ok_or(RecordError::MissingSeparator)?;

        let joint = joint.trim();
        if joint.is_empty() {
            return Err(RecordError::EmptyJoint);
        }

        let mut components = [0.0f32; 4];
        let mut count = 0;
        for part in values.split(',') {
            if count < components.len() {
                let value = part
                    .trim()
                    .parse::<f32>()
                    .map_err(|_| RecordError::InvalidNumber)?;
                if !value.is_finite() {
                    return Err(RecordError::NonFinite);
                }
                components[count] = value;
            }
            count += 1;
        }
        if count != components.len() {
            return Err(RecordError::ComponentCount(count));
        }

        let [x, y, z, w] = components;
        Ok(Self::new(joint, Quaternion::new(w, x, y, z)))
    }

    /// Decode a record and require a skeleton joint name
    pub fn decode_known(line: &'a str) -> Result<Self, RecordError> {
        let record = Self::decode(line)?;
        if !is_known_joint(record.joint) {
            return Err(RecordError::UnknownJoint);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_format() {
        let q = Quaternion::from_euler_degrees(90.0, 0.0, 0.0);
        let record = JointRecord::new("HIP", q).encode().unwrap();
        assert_eq!(record.as_str(), "HIP:0.7071,0.0000,0.0000,0.7071");
    }

    #[test]
    fn test_encode_negative_components() {
        let q = Quaternion::new(0.5, -0.5, 0.25, -0.125);
        let record = JointRecord::new("LEFT_KNEE", q).encode().unwrap();
        assert_eq!(record.as_str(), "LEFT_KNEE:-0.5000,0.2500,-0.1250,0.5000");
    }

    #[test]
    fn test_encode_overflow() {
        let joint = "A_VERY_LONG_JOINT_NAME_THAT_DOES_NOT_FIT_IN_ONE_RECORD";
        let result = JointRecord::new(joint, Quaternion::IDENTITY).encode();
        assert_eq!(result, Err(RecordError::Overflow));
    }

    #[test]
    fn test_decode() {
        let record = JointRecord::decode("CHEST:0.1000,-0.2000,0.3000,0.9274\n").unwrap();
        assert_eq!(record.joint, "CHEST");
        assert_eq!(record.orientation, Quaternion::new(0.9274, 0.1, -0.2, 0.3));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            JointRecord::decode("HIP 0,0,0,1"),
            Err(RecordError::MissingSeparator)
        );
        assert_eq!(JointRecord::decode(":0,0,0,1"), Err(RecordError::EmptyJoint));
        assert_eq!(
            JointRecord::decode("HIP:0,0,1"),
            Err(RecordError::ComponentCount(3))
        );
        assert_eq!(
            JointRecord::decode("HIP:0,0,0,1,0"),
            Err(RecordError::ComponentCount(5))
        );
        assert_eq!(
            JointRecord::decode("HIP:0,x,0,1"),
            Err(RecordError::InvalidNumber)
        );
    }

    #[test]
    fn test_decode_rejects_non_finite() {
        for line in ["HIP:NaN,0,0,1", "HIP:0,inf,0,1", "HIP:0,0,-inf,1", "HIP:0,0,0,nan"] {
            assert_eq!(JointRecord::decode(line), Err(RecordError::NonFinite));
        }
    }

    #[test]
    fn test_known_joints() {
        assert!(is_known_joint("HIP"));
        assert!(is_known_joint("RIGHT_FOOT"));
        assert!(!is_known_joint("hip"));
        assert!(!is_known_joint("TAIL"));
    }

    #[test]
    fn test_decode_known() {
        let record = JointRecord::decode_known("LEFT_WRIST:0,0,0,1").unwrap();
        assert_eq!(record.joint, "LEFT_WRIST");
        assert_eq!(
            JointRecord::decode_known("TAIL:0,0,0,1"),
            Err(RecordError::UnknownJoint)
        );
        // Format errors take precedence over the joint check
        assert_eq!(
            JointRecord::decode_known("TAIL:0,0,1"),
            Err(RecordError::ComponentCount(3))
        );
    }

    #[test]
    fn test_decode_encoded_record() {
        let q = Quaternion::from_euler_degrees(-30.0, 45.0, 10.0);
        let encoded = JointRecord::new("WAIST", q).encode().unwrap();
        let decoded = JointRecord::decode(&encoded).unwrap();

        assert_eq!(decoded.joint, "WAIST");
        assert!(decoded.orientation.approx_eq(&q, 1e-4));
    }
}

//! BNO08x Sensor Hub Reports
//!
//! Parsing of the SH-2 reports the tracker consumes and builders for the
//! control commands it sends.
//!
//! # Report Types
//!
//! - Rotation Vector (0x05): fused quaternion with heading accuracy
//! - Game Rotation Vector (0x08): fused quaternion without magnetometer
//! - Base Timestamp (0xFB) / Timestamp Rebase (0xFA): prefix of batched input reports
//! - Product ID Response (0xF8): device identification
//!
//! # Fixed-Point Formats
//!
//! - Q14: quaternion components (scale = 1/16384)
//! - Q12: accuracy in radians (scale = 1/4096)

use body_tracker_core::math::Quaternion;

/// SH-2 report IDs used by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReportId {
    /// Rotation Vector (quaternion with magnetometer)
    RotationVector = 0x05,
    /// Game Rotation Vector (quaternion without magnetometer)
    GameRotationVector = 0x08,
    /// Timestamp rebase inside a batch
    TimestampRebase = 0xFA,
    /// Base timestamp reference opening a batch
    BaseTimestamp = 0xFB,
    /// Product ID Response
    ProductIdResponse = 0xF8,
}

impl ReportId {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x05 => Some(Self::RotationVector),
            0x08 => Some(Self::GameRotationVector),
            0xFA => Some(Self::TimestampRebase),
            0xFB => Some(Self::BaseTimestamp),
            0xF8 => Some(Self::ProductIdResponse),
            _ => None,
        }
    }
}

/// Length of an input-channel report, ID byte included
///
/// Needed to walk a batch; `None` for IDs the length table does not know.
fn input_report_len(id: u8) -> Option<usize> {
    match id {
        0x01..=0x04 | 0x06 => Some(10), // accel, gyro, mag, linear accel, gravity
        0x05 | 0x09 => Some(14),        // rotation vector, geomagnetic RV
        0x07 => Some(16),               // uncalibrated gyro
        0x08 => Some(12),               // game rotation vector
        0xFA | 0xFB => Some(5),         // timestamps
        _ => None,
    }
}

/// Q14 fixed-point scale factor (1/16384)
const Q14_SCALE: f32 = 1.0 / 16384.0;

/// Q12 fixed-point scale factor (1/4096)
const Q12_SCALE: f32 = 1.0 / 4096.0;

/// Largest Q14 magnitude accepted for a unit quaternion component (~1.04)
const MAX_Q14: i16 = 17000;

/// One sensor report inside an input-channel payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputReport<'a> {
    pub id: u8,
    /// Report bytes, ID byte first
    pub bytes: &'a [u8],
}

/// Iterator over the sensor reports of an input-channel payload
///
/// The hub batches reports back to back after a base timestamp. Timestamp
/// entries are skipped; iteration stops at the first report whose length
/// is unknown or that is cut short.
pub struct InputReports<'a> {
    payload: &'a [u8],
    offset: usize,
}

/// Walk the reports of an input-channel payload
pub fn input_reports(payload: &[u8]) -> InputReports<'_> {
    InputReports { payload, offset: 0 }
}

impl<'a> Iterator for InputReports<'a> {
    type Item = InputReport<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = *self.payload.get(self.offset)?;
            let len = input_report_len(id)?;
            let bytes = self.payload.get(self.offset..self.offset + len)?;
            self.offset += len;

            if id == ReportId::BaseTimestamp as u8 || id == ReportId::TimestampRebase as u8 {
                continue;
            }
            return Some(InputReport { id, bytes });
        }
    }
}

/// Rotation Vector / Game Rotation Vector report
///
/// # Layout
///
/// ```text
/// Offset  Size  Description
/// 0       1     Report ID (0x05 or 0x08)
/// 1       1     Sequence number
/// 2       1     Status (accuracy in bits 1:0)
/// 3       1     Delay
/// 4-5     2     Q_i (Q14)
/// 6-7     2     Q_j (Q14)
/// 8-9     2     Q_k (Q14)
/// 10-11   2     Q_real (Q14)
/// 12-13   2     Accuracy (Q12, radians, 0x05 only)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationVectorReport {
    pub sequence: u8,
    pub status: u8,
    pub q_i: i16,
    pub q_j: i16,
    pub q_k: i16,
    pub q_real: i16,
    /// Q12 radians; `None` for the Game Rotation Vector
    pub accuracy: Option<i16>,
}

impl RotationVectorReport {
    /// Size of a Rotation Vector report (0x05)
    pub const ROTATION_VECTOR_SIZE: usize = 14;

    /// Size of a Game Rotation Vector report (0x08)
    pub const GAME_ROTATION_VECTOR_SIZE: usize = 12;

    /// Parse either quaternion report
    ///
    /// Returns `None` for other IDs, short input or components outside the
    /// unit range.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let id = ReportId::from_u8(*bytes.first()?)?;
        let has_accuracy = match id {
            ReportId::RotationVector => true,
            ReportId::GameRotationVector => false,
            _ => return None,
        };
        let min_len = if has_accuracy {
            Self::ROTATION_VECTOR_SIZE
        } else {
            Self::GAME_ROTATION_VECTOR_SIZE
        };
        if bytes.len() < min_len {
            return None;
        }

        let word = |at: usize| i16::from_le_bytes([bytes[at], bytes[at + 1]]);
        let (q_i, q_j, q_k, q_real) = (word(4), word(6), word(8), word(10));

        if [q_i, q_j, q_k, q_real]
            .iter()
            .any(|c| c.unsigned_abs() > MAX_Q14 as u16)
        {
            return None;
        }

        Some(Self {
            sequence: bytes[1],
            status: bytes[2],
            q_i,
            q_j,
            q_k,
            q_real,
            accuracy: has_accuracy.then(|| word(12)),
        })
    }

    /// Orientation as a quaternion (w = real part)
    pub fn to_quaternion(&self) -> Quaternion {
        Quaternion::new(
            self.q_real as f32 * Q14_SCALE,
            self.q_i as f32 * Q14_SCALE,
            self.q_j as f32 * Q14_SCALE,
            self.q_k as f32 * Q14_SCALE,
        )
    }

    /// Heading accuracy estimate in radians, if reported
    pub fn accuracy_radians(&self) -> Option<f32> {
        self.accuracy.map(|raw| raw as f32 * Q12_SCALE)
    }

    /// Status accuracy (0 unreliable, 1 low, 2 medium, 3 high)
    pub fn accuracy_status(&self) -> u8 {
        self.status & 0x03
    }
}

/// Product ID Response (0xF8)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductIdResponse {
    pub reset_cause: u8,
    pub sw_version_major: u8,
    pub sw_version_minor: u8,
    pub sw_part_number: u32,
    pub sw_build_number: u32,
    pub sw_version_patch: u16,
}

impl ProductIdResponse {
    /// Size of one Product ID entry
    pub const SIZE: usize = 16;

    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || bytes[0] != ReportId::ProductIdResponse as u8 {
            return None;
        }

        let long = |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        Some(Self {
            reset_cause: bytes[1],
            sw_version_major: bytes[2],
            sw_version_minor: bytes[3],
            sw_part_number: long(4),
            sw_build_number: long(8),
            sw_version_patch: u16::from_le_bytes([bytes[12], bytes[13]]),
        })
    }
}

/// SH-2 control command IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ControlCommand {
    /// Set Feature Command: enable/configure a sensor report
    SetFeature = 0xFD,
    /// Product ID Request
    ProductIdRequest = 0xF9,
}

/// Build a Set Feature command enabling `report_id` every `report_interval_us`
pub fn build_set_feature_command_for(report_id: u8, report_interval_us: u32) -> [u8; 17] {
    let mut cmd = [0u8; 17];
    cmd[0] = ControlCommand::SetFeature as u8;
    cmd[1] = report_id;
    // Bytes 2-4: feature flags and change sensitivity (unused)
    cmd[5..9].copy_from_slice(&report_interval_us.to_le_bytes());
    // Bytes 9-16: batch interval and sensor-specific config (unused)
    cmd
}

/// Build a Product ID Request payload
pub fn build_product_id_request() -> [u8; 2] {
    [ControlCommand::ProductIdRequest as u8, 0x00]
}

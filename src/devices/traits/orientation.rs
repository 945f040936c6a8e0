//! Orientation Source Trait
//!
//! Device-independent interface for sensors that output a fused absolute
//! orientation, such as the BNO08x family.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --begin() Ok--> Ready
//!       ^   |
//!       +---+ begin() Err (retry or halt is the caller's choice)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use body_tracker::devices::traits::OrientationSource;
//!
//! fn run<S: OrientationSource>(source: &mut S) {
//!     loop {
//!         if source.update() {
//!             let q = source.current_orientation();
//!             // ...
//!         }
//!     }
//! }
//! ```

use core::fmt;

use body_tracker_core::math::Quaternion;

use crate::platform::PlatformError;

/// Orientation source error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum OrientationError {
    /// Device did not answer the identification handshake
    DeviceAbsent,
    /// Bus could not be configured or a command could not be sent
    Bus(PlatformError),
    /// Sample-ready pin could not be configured
    Pin(PlatformError),
    /// Operation requires a successful `begin()`
    NotInitialized,
}

impl fmt::Display for OrientationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrientationError::DeviceAbsent => write!(f, "Orientation sensor not responding"),
            OrientationError::Bus(e) => write!(f, "Orientation sensor bus: {}", e),
            OrientationError::Pin(e) => write!(f, "Orientation sensor pin: {}", e),
            OrientationError::NotInitialized => write!(f, "Orientation sensor not initialized"),
        }
    }
}

/// Accuracy of the latest sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationAccuracy {
    /// Device status accuracy, 0 (unreliable) to 3 (high)
    pub status: u8,
    /// Estimated heading error in radians, when the report carries one
    pub radians: Option<f32>,
}

impl OrientationAccuracy {
    /// Accuracy before any sample arrived
    pub const UNRELIABLE: Self = Self {
        status: 0,
        radians: None,
    };
}

impl Default for OrientationAccuracy {
    fn default() -> Self {
        Self::UNRELIABLE
    }
}

/// Source of fused absolute orientation
///
/// # Implementation Notes
///
/// - `update()` never blocks: it checks for a new sample and returns
/// - Absence of a sample is the normal state between samples, not an error
/// - `current_orientation()` is a value copy, valid at any time; before the
///   first sample it is the identity rotation
pub trait OrientationSource {
    /// Configure bus and pin, identify the device, start the sample stream
    ///
    /// On failure the source stays uninitialized and may be retried.
    ///
    /// # Errors
    ///
    /// - `OrientationError::Bus` if the bus cannot be configured
    /// - `OrientationError::Pin` if the sample-ready pin cannot be configured
    /// - `OrientationError::DeviceAbsent` if the device does not identify
    fn begin(&mut self) -> Result<(), OrientationError>;

    /// Poll for a new sample
    ///
    /// Returns `true` if a new sample was stored. When `false`, the stored
    /// orientation and accuracy are unchanged.
    fn update(&mut self) -> bool;

    /// Latest raw orientation
    fn current_orientation(&self) -> Quaternion;

    /// Accuracy of the latest sample
    fn accuracy(&self) -> OrientationAccuracy;

    /// Whether `begin()` has succeeded
    fn is_ready(&self) -> bool;

    /// Whether the source is ready and not failing repeatedly
    fn is_healthy(&self) -> bool {
        self.is_ready()
    }
}

impl<S: OrientationSource + ?Sized> OrientationSource for &mut S {
    fn begin(&mut self) -> Result<(), OrientationError> {
        (**self).begin()
    }

    fn update(&mut self) -> bool {
        (**self).update()
    }

    fn current_orientation(&self) -> Quaternion {
        (**self).current_orientation()
    }

    fn accuracy(&self) -> OrientationAccuracy {
        (**self).accuracy()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn is_healthy(&self) -> bool {
        (**self).is_healthy()
    }
}

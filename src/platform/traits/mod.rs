//! Platform abstraction traits
//!
//! The traits a board (or a simulator) must provide to host the tracker.

pub mod gpio;
pub mod i2c;

// Re-export trait interfaces
pub use gpio::{DigitalInputPin, PinLabel, PinMode};
pub use i2c::{I2cConfig, I2cInterface};

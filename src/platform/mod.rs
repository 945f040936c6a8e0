//! Platform abstraction layer
//!
//! Hardware access for the tracker goes through the traits defined here.
//! Board-specific code lives in feature-gated submodules.

pub mod error;
pub mod hal;
pub mod traits;

// Platform implementations (feature-gated)
#[cfg(feature = "pico2_w")]
pub mod rp2350;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{DigitalInputPin, I2cInterface, PinMode};

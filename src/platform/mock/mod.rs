//! Mock platform implementation for testing
//!
//! Deterministic stand-ins for the bus, the sample-ready pin, the delay
//! provider and the record sink, so the orientation pipeline runs on the
//! host.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```
//! use body_tracker::platform::mock::MockGpio;
//! use body_tracker::platform::traits::DigitalInputPin;
//!
//! let mut pin = MockGpio::new(5);
//! pin.script_levels(&[true, false]);
//! assert!(pin.read());
//! assert!(!pin.read());
//! ```

#![cfg(any(test, feature = "mock"))]

mod delay;
mod gpio;
mod i2c;
mod sink;

pub use delay::MockDelay;
pub use gpio::MockGpio;
pub use i2c::{I2cTransaction, MockI2c};
pub use sink::{MockSink, MockSinkError};

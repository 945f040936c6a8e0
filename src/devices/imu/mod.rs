//! IMU Drivers
//!
//! ## Available Drivers
//!
//! - `bno08x`: CEVA BNO080/BNO085/BNO086 with on-chip fusion (SHTP over I2C)

pub mod bno08x;

pub use bno08x::{Bno08x, Bno08xConfig};

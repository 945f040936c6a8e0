//! Device drivers
//!
//! Drivers here only touch hardware through the platform traits, so they
//! run unchanged against the RP2350, any `embedded-hal` board or the mocks.
//!
//! ## Modules
//!
//! - `imu`: BNO08x orientation sensor driver
//! - `traits`: Device trait definitions (`OrientationSource`)

pub mod imu;
pub mod traits;

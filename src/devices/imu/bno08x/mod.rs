//! BNO08x Orientation Sensor Driver
//!
//! Driver for the CEVA BNO080/BNO085/BNO086 sensor hubs. The hub runs its
//! own sensor fusion and streams a quaternion; the driver only configures
//! the stream and collects samples over SHTP/I2C.
//!
//! ## Hardware
//!
//! - I2C at 100 kHz, address 0x4A (SA0 high)
//! - INT: active low while the hub has data queued
//!
//! ## Usage
//!
//! ```ignore
//! use body_tracker::devices::imu::{Bno08x, Bno08xConfig};
//! use body_tracker::devices::traits::OrientationSource;
//!
//! let mut imu = Bno08x::new(i2c, &mut int_pin, delay, Bno08xConfig::default());
//! imu.begin()?;
//!
//! loop {
//!     if imu.update() {
//!         let q = imu.current_orientation();
//!     }
//! }
//! ```

mod driver;
mod reports;

pub use driver::{Bno08x, Bno08xConfig};
pub use reports::{
    build_product_id_request, build_set_feature_command_for, input_reports, ControlCommand,
    InputReport, InputReports, ProductIdResponse, ReportId, RotationVectorReport,
};

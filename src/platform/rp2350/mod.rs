//! RP2350 (Raspberry Pi Pico 2 W) platform support
//!
//! Built on `embassy-rp` in blocking mode: the tracker polls its sensor
//! from a single loop, so no executor is required for bus access.
//!
//! # Example
//!
//! ```ignore
//! use body_tracker::platform::rp2350::{i2c_config, EmbassyTime, Rp2350I2c, Rp2350Pin};
//! use embassy_rp::gpio::Flex;
//!
//! let p = embassy_rp::init(Default::default());
//! let bus = embassy_rp::i2c::I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config(100_000));
//! let mut i2c = Rp2350I2c::new(bus, 100_000);
//! let mut int_pin = Rp2350Pin::new(Flex::new(p.PIN_6), 6);
//! let time = EmbassyTime;
//! ```

mod gpio;
mod time;

pub use gpio::Rp2350Pin;
pub use time::EmbassyTime;

pub use embassy_time::Delay as EmbassyDelay;

use crate::platform::hal::HalI2c;

/// Blocking RP2350 I2C bus as an [`I2cInterface`](crate::platform::traits::I2cInterface)
pub type Rp2350I2c<'d, T> = HalI2c<embassy_rp::i2c::I2c<'d, T, embassy_rp::i2c::Blocking>>;

/// Embassy I2C configuration for the given bus clock
pub fn i2c_config(frequency: u32) -> embassy_rp::i2c::Config {
    let mut config = embassy_rp::i2c::Config::default();
    config.frequency = frequency;
    config
}

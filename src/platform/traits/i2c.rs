//! I2C interface trait
//!
//! Blocking bus access for the orientation sensor. The tracker reads the
//! sensor from its single polling loop, so the bus never needs to be shared
//! between execution contexts.

use crate::platform::Result;

/// Standard-mode bus clock used by the tracker (Hz)
pub const STANDARD_MODE_HZ: u32 = 100_000;

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2cConfig {
    /// Bus frequency in Hz (typically 100_000 or 400_000)
    pub frequency: u32,
    /// Timeout in microseconds
    pub timeout_us: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: STANDARD_MODE_HZ,
            timeout_us: 1_000_000, // 1 second
        }
    }
}

/// I2C interface trait
///
/// # Safety Invariants
///
/// - Only one owner per I2C bus instance
/// - Address must be 7-bit (valid range: 0x00..=0x7F)
pub trait I2cInterface {
    /// Write data to I2C device
    ///
    /// START - ADDR(W) - DATA - STOP
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` if the device does not acknowledge, a bus
    /// error occurs or the timeout expires.
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()>;

    /// Read data from I2C device
    ///
    /// START - ADDR(R) - DATA - STOP
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` if the device does not acknowledge, a bus
    /// error occurs or the timeout expires.
    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()>;

    /// Write then read with a repeated START
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` on NACK, bus error or timeout.
    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()>;

    /// Set I2C bus frequency
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidConfig` if the frequency cannot be
    /// achieved with the current clock configuration.
    fn set_frequency(&mut self, frequency: u32) -> Result<()>;
}

impl<I: I2cInterface + ?Sized> I2cInterface for &mut I {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        (**self).write(addr, data)
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        (**self).read(addr, buffer)
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        (**self).write_read(addr, write_data, read_buffer)
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        (**self).set_frequency(frequency)
    }
}

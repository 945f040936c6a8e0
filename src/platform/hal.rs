//! embedded-hal adapters
//!
//! Bridge any `embedded-hal` 1.0 pin or blocking I2C bus into the tracker's
//! platform traits, so boards other than the RP2350 only need to hand over
//! their HAL objects.
//!
//! # Example
//!
//! ```ignore
//! use body_tracker::platform::hal::{HalI2c, HalPin};
//!
//! let bus = HalI2c::new(board_i2c, 100_000);
//! let int_pin = HalPin::new(board_int_pin, 5);
//! ```

use core::fmt::Write;

use embedded_hal::digital::InputPin;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use crate::platform::{
    error::{GpioError, I2cError, PlatformError},
    traits::{DigitalInputPin, I2cInterface, PinLabel, PinMode},
    Result,
};

/// [`DigitalInputPin`] over an `embedded-hal` input pin
///
/// Pull configuration belongs to the HAL pin type, so `set_mode` only
/// records input modes. A failed level read reports high, the released
/// level of an active-low ready line.
pub struct HalPin<P> {
    pin: P,
    number: u8,
    mode: PinMode,
}

impl<P: InputPin> HalPin<P> {
    pub fn new(pin: P, number: u8) -> Self {
        Self {
            pin,
            number,
            mode: PinMode::Input,
        }
    }

    /// Release the HAL pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> DigitalInputPin for HalPin<P> {
    fn init(&mut self) -> Result<()> {
        // The HAL pin is configured by construction
        Ok(())
    }

    fn read(&mut self) -> bool {
        self.pin.is_high().unwrap_or(true)
    }

    fn set_mode(&mut self, mode: PinMode) -> Result<()> {
        if mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.mode = mode;
        Ok(())
    }

    fn write(&mut self, _high: bool) -> Result<()> {
        Err(PlatformError::Gpio(GpioError::InvalidMode))
    }

    fn describe(&self) -> PinLabel {
        let mut label = PinLabel::new();
        let _ = write!(label, "GPIO{} ({:?})", self.number, self.mode);
        label
    }
}

/// [`I2cInterface`] over a blocking `embedded-hal` I2C bus
///
/// `embedded-hal` has no clock control; the bus is clocked when the HAL
/// object is created. `set_frequency` accepts that frequency and rejects
/// any other.
pub struct HalI2c<I> {
    bus: I,
    frequency: u32,
}

impl<I: I2c> HalI2c<I> {
    /// Wrap a bus that was created running at `frequency` Hz
    pub fn new(bus: I, frequency: u32) -> Self {
        Self { bus, frequency }
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Release the HAL bus
    pub fn release(self) -> I {
        self.bus
    }
}

impl<I: I2c> I2cInterface for HalI2c<I> {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.bus.write(addr, data).map_err(map_error)
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.bus.read(addr, buffer).map_err(map_error)
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        self.bus
            .write_read(addr, write_data, read_buffer)
            .map_err(map_error)
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        if frequency == self.frequency {
            Ok(())
        } else {
            Err(PlatformError::InvalidConfig)
        }
    }
}

/// Map an `embedded-hal` I2C error to a platform error
fn map_error<E: embedded_hal::i2c::Error>(error: E) -> PlatformError {
    let kind = match error.kind() {
        ErrorKind::NoAcknowledge(_) => I2cError::Nack,
        ErrorKind::ArbitrationLoss => I2cError::ArbitrationLost,
        _ => I2cError::BusError,
    };
    PlatformError::I2c(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType as PinErrorType;
    use embedded_hal::i2c::{ErrorType, NoAcknowledgeSource, Operation};

    struct FakePin {
        high: bool,
    }

    impl PinErrorType for FakePin {
        type Error = Infallible;
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> core::result::Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> core::result::Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    /// Bus that NACKs every transaction
    struct NackBus;

    impl ErrorType for NackBus {
        type Error = ErrorKind;
    }

    impl I2c for NackBus {
        fn transaction(
            &mut self,
            _address: u8,
            _operations: &mut [Operation<'_>],
        ) -> core::result::Result<(), ErrorKind> {
            Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
        }
    }

    #[test]
    fn test_hal_pin_reads_level() {
        let mut pin = HalPin::new(FakePin { high: false }, 5);
        pin.init().unwrap();
        assert!(!pin.read());
    }

    #[test]
    fn test_hal_pin_rejects_output() {
        let mut pin = HalPin::new(FakePin { high: true }, 5);
        pin.set_mode(PinMode::InputPullUp).unwrap();
        assert_eq!(
            pin.set_mode(PinMode::Output),
            Err(PlatformError::Gpio(GpioError::InvalidMode))
        );
        assert!(pin.write(true).is_err());
        assert_eq!(pin.describe().as_str(), "GPIO5 (InputPullUp)");
    }

    #[test]
    fn test_hal_i2c_maps_nack() {
        let mut bus = HalI2c::new(NackBus, 100_000);
        let mut buf = [0u8; 4];
        assert_eq!(
            bus.read(0x4A, &mut buf),
            Err(PlatformError::I2c(I2cError::Nack))
        );
    }

    #[test]
    fn test_hal_i2c_frequency_fixed_at_construction() {
        let mut bus = HalI2c::new(NackBus, 100_000);
        assert!(bus.set_frequency(100_000).is_ok());
        assert_eq!(
            bus.set_frequency(400_000),
            Err(PlatformError::InvalidConfig)
        );
    }
}

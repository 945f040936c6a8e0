//! RP2350 digital pin
//!
//! Wraps an `embassy_rp::gpio::Flex` so one pin type can serve every
//! [`PinMode`] the trait exposes.

use core::fmt::Write;

use embassy_rp::gpio::{Flex, Level, Pull};

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{DigitalInputPin, PinLabel, PinMode},
    Result,
};

/// RP2350 GPIO pin
pub struct Rp2350Pin<'d> {
    pin: Flex<'d>,
    number: u8,
    mode: PinMode,
}

impl<'d> Rp2350Pin<'d> {
    /// Wrap a flex pin; `number` is the GPIO number used in diagnostics
    pub fn new(pin: Flex<'d>, number: u8) -> Self {
        Self {
            pin,
            number,
            mode: PinMode::Input,
        }
    }
}

impl DigitalInputPin for Rp2350Pin<'_> {
    fn init(&mut self) -> Result<()> {
        if !self.mode.is_output() {
            self.pin.set_as_input();
        }
        Ok(())
    }

    fn read(&mut self) -> bool {
        self.pin.is_high()
    }

    fn set_mode(&mut self, mode: PinMode) -> Result<()> {
        match mode {
            PinMode::Input => {
                self.pin.set_pull(Pull::None);
                self.pin.set_as_input();
            }
            PinMode::InputPullUp => {
                self.pin.set_pull(Pull::Up);
                self.pin.set_as_input();
            }
            PinMode::InputPullDown => {
                self.pin.set_pull(Pull::Down);
                self.pin.set_as_input();
            }
            PinMode::Output => self.pin.set_as_output(),
        }
        self.mode = mode;
        Ok(())
    }

    fn write(&mut self, high: bool) -> Result<()> {
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.pin.set_level(if high { Level::High } else { Level::Low });
        Ok(())
    }

    fn describe(&self) -> PinLabel {
        let mut label = PinLabel::new();
        let _ = write!(label, "GPIO{} ({:?})", self.number, self.mode);
        label
    }
}

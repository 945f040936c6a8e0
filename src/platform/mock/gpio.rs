//! Mock digital pin for testing

use core::fmt::Write;
use std::collections::VecDeque;

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{DigitalInputPin, PinLabel, PinMode},
    Result,
};

/// Mock digital pin
///
/// Reads return scripted levels first, then the steady level. Mode changes,
/// writes and initialization are recorded for test verification.
#[derive(Debug)]
pub struct MockGpio {
    pin: u8,
    level: bool,
    script: VecDeque<bool>,
    mode: PinMode,
    init_count: u32,
    read_count: u32,
    fail_init: bool,
}

impl MockGpio {
    /// Create a mock input pin idling high (INT released)
    pub fn new(pin: u8) -> Self {
        Self {
            pin,
            level: true,
            script: VecDeque::new(),
            mode: PinMode::Input,
            init_count: 0,
            read_count: 0,
            fail_init: false,
        }
    }

    /// Set the steady level returned once the script is exhausted
    pub fn set_level(&mut self, high: bool) {
        self.level = high;
    }

    /// Queue levels returned by the next reads, in order
    pub fn script_levels(&mut self, levels: &[bool]) {
        self.script.extend(levels.iter().copied());
    }

    /// Make every later `init()` fail
    pub fn fail_init(&mut self) {
        self.fail_init = true;
    }

    pub fn mode(&self) -> PinMode {
        self.mode
    }

    /// Number of successful `init()` calls
    pub fn init_count(&self) -> u32 {
        self.init_count
    }

    /// Number of `read()` calls
    pub fn read_count(&self) -> u32 {
        self.read_count
    }
}

impl DigitalInputPin for MockGpio {
    fn init(&mut self) -> Result<()> {
        if self.fail_init {
            return Err(PlatformError::Gpio(GpioError::InitFailed));
        }
        if self.mode.is_output() {
            self.mode = PinMode::Input;
        }
        self.init_count += 1;
        Ok(())
    }

    fn read(&mut self) -> bool {
        self.read_count += 1;
        self.script.pop_front().unwrap_or(self.level)
    }

    fn set_mode(&mut self, mode: PinMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }

    fn write(&mut self, high: bool) -> Result<()> {
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.level = high;
        Ok(())
    }

    fn describe(&self) -> PinLabel {
        let mut label = PinLabel::new();
        let _ = write!(label, "MOCK{} ({:?})", self.pin, self.mode);
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_levels_then_steady() {
        let mut pin = MockGpio::new(5);
        pin.set_level(false);
        pin.script_levels(&[true, true]);

        assert!(pin.read());
        assert!(pin.read());
        assert!(!pin.read());
        assert!(!pin.read());
        assert_eq!(pin.read_count(), 4);
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut pin = MockGpio::new(5);
        pin.init().unwrap();
        pin.init().unwrap();
        assert_eq!(pin.init_count(), 2);
        assert_eq!(pin.mode(), PinMode::Input);
    }

    #[test]
    fn test_init_failure() {
        let mut pin = MockGpio::new(5);
        pin.fail_init();
        assert_eq!(
            pin.init(),
            Err(PlatformError::Gpio(GpioError::InitFailed))
        );
    }

    #[test]
    fn test_write_requires_output_mode() {
        let mut pin = MockGpio::new(5);
        assert!(pin.write(false).is_err());

        pin.set_mode(PinMode::Output).unwrap();
        pin.write(false).unwrap();
        assert!(!pin.read());
    }

    #[test]
    fn test_describe() {
        let mut pin = MockGpio::new(5);
        pin.set_mode(PinMode::InputPullUp).unwrap();
        assert_eq!(pin.describe().as_str(), "MOCK5 (InputPullUp)");
    }
}

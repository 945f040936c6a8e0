//! Digital pin interface trait
//!
//! The orientation source learns that a new sample is waiting by polling a
//! single digital line. Hiding that line behind [`DigitalInputPin`] lets the
//! source run against a real RP2350 pin, an `embedded-hal` pin or a scripted
//! test double.

use crate::platform::Result;

/// Maximum length of a pin description
pub const PIN_LABEL_LEN: usize = 24;

/// Human-readable pin identity, for diagnostics only
pub type PinLabel = heapless::String<PIN_LABEL_LEN>;

/// GPIO pin mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum PinMode {
    /// Input mode (high impedance)
    Input,
    /// Input mode with pull-up resistor
    InputPullUp,
    /// Input mode with pull-down resistor
    InputPullDown,
    /// Output mode (push-pull)
    Output,
}

impl PinMode {
    /// Whether the mode drives the line
    pub fn is_output(self) -> bool {
        matches!(self, PinMode::Output)
    }
}

/// Digital pin capability set
///
/// The orientation source only calls [`init`](Self::init),
/// [`set_mode`](Self::set_mode) and [`read`](Self::read). `write` exists so
/// one trait covers both directions; a test double may accept it as a no-op.
///
/// # Safety Invariants
///
/// - Only one owner per pin instance
/// - No concurrent access to the same pin from multiple contexts
pub trait DigitalInputPin {
    /// Configure the line for input
    ///
    /// Idempotent: calling it again on a configured pin succeeds.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InitFailed)` if the line
    /// cannot be configured.
    fn init(&mut self) -> Result<()>;

    /// Current logic level, `true` for high
    ///
    /// Has no side effects on the line.
    fn read(&mut self) -> bool;

    /// Change the pin mode
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the
    /// implementation cannot provide the mode.
    fn set_mode(&mut self, mode: PinMode) -> Result<()>;

    /// Drive the line
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the pin is
    /// not configured as an output.
    fn write(&mut self, high: bool) -> Result<()>;

    /// Pin identity, e.g. `"GPIO5 (IMU INT)"`
    fn describe(&self) -> PinLabel;
}

impl<P: DigitalInputPin + ?Sized> DigitalInputPin for &mut P {
    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn read(&mut self) -> bool {
        (**self).read()
    }

    fn set_mode(&mut self, mode: PinMode) -> Result<()> {
        (**self).set_mode(mode)
    }

    fn write(&mut self, high: bool) -> Result<()> {
        (**self).write(high)
    }

    fn describe(&self) -> PinLabel {
        (**self).describe()
    }
}

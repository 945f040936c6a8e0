//! Time source abstraction for sample pacing and bounded waits.
//!
//! The tracker loop and the calibration wait read time through
//! [`TimeSource`], so they run unchanged against the Embassy clock on
//! hardware, `std::time::Instant` in the simulator and [`MockTime`] in
//! tests.

use core::cell::Cell;

/// Monotonic time since system start.
///
/// # Example
///
/// ```
/// use body_tracker_core::traits::{TimeSource, MockTime};
///
/// fn sample_due<T: TimeSource>(time: &T, last_sample_us: u64, period_us: u64) -> bool {
///     time.elapsed_since(last_sample_us) >= period_us
/// }
///
/// let time = MockTime::new();
/// assert!(!sample_due(&time, 0, 10_000));
/// time.advance(10_000);
/// assert!(sample_due(&time, 0, 10_000));
/// ```
pub trait TimeSource {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    /// Returns current time in microseconds since system start.
    fn now_us(&self) -> u64;

    /// Returns elapsed time in microseconds since a reference point.
    ///
    /// Uses saturating subtraction so a reference in the future reads as zero.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source with manual advancement.
///
/// Shared by reference between the code under test and whatever drives
/// time forward (e.g. a mock delay).
///
/// ```
/// use body_tracker_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// time.advance(1500);
/// assert_eq!(time.now_us(), 1500);
/// assert_eq!(time.now_ms(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get().saturating_add(us));
    }
}

impl TimeSource for MockTime {
    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_initial_value() {
        let time = MockTime::new();
        assert_eq!(time.now_us(), 0);
        assert_eq!(time.now_ms(), 0);
    }

    #[test]
    fn mock_time_with_initial() {
        let time = MockTime::with_initial(5_000_000);
        assert_eq!(time.now_us(), 5_000_000);
        assert_eq!(time.now_ms(), 5000);
    }

    #[test]
    fn mock_time_advance() {
        let time = MockTime::new();
        time.advance(500_000);
        time.advance(500_000);
        assert_eq!(time.now_us(), 1_000_000);
        assert_eq!(time.now_ms(), 1000);
    }

    #[test]
    fn mock_time_elapsed_since_saturates() {
        let time = MockTime::new();
        time.set(1_000);
        assert_eq!(time.elapsed_since(300), 700);
        assert_eq!(time.elapsed_since(5_000), 0);
    }

    #[test]
    fn reference_forwards_to_source() {
        let time = MockTime::with_initial(2_500);
        let by_ref = &time;
        assert_eq!(TimeSource::now_us(&by_ref), 2_500);
        time.advance(1_000);
        assert_eq!(by_ref.now_ms(), 3);
    }
}

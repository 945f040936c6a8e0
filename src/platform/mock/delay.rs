//! Mock delay provider driven by simulated time

use body_tracker_core::traits::MockTime;
use embedded_hal::delay::DelayNs;

/// Delay that advances a shared [`MockTime`] instead of sleeping
///
/// Lets bounded waits (sensor boot, calibration timeout) run instantly in
/// tests while the code under test still observes time passing.
#[derive(Debug, Clone, Copy)]
pub struct MockDelay<'t> {
    time: &'t MockTime,
}

impl<'t> MockDelay<'t> {
    pub fn new(time: &'t MockTime) -> Self {
        Self { time }
    }
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        // Sub-microsecond delays round up so a wait loop always progresses
        self.time.advance(u64::from(ns).div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.time.advance(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.time.advance(u64::from(ms) * 1000);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use body_tracker_core::traits::TimeSource;

    #[test]
    fn test_delay_advances_time() {
        let time = MockTime::new();
        let mut delay = MockDelay::new(&time);

        delay.delay_ms(100);
        assert_eq!(time.now_ms(), 100);

        delay.delay_us(250);
        assert_eq!(time.now_us(), 100_250);

        delay.delay_ns(1);
        assert_eq!(time.now_us(), 100_251);
    }
}

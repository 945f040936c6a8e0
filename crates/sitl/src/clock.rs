//! Wall-clock time and delay for running the tracker node on the host.

use std::thread;
use std::time::{Duration, Instant};

use body_tracker_core::traits::TimeSource;
use embedded_hal::delay::DelayNs;

/// Time since construction, from the host's monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct StdTime {
    start: Instant,
}

impl StdTime {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for StdTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for StdTime {
    fn now_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// Delay that sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

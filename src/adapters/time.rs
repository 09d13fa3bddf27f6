//! Host time adapter.
//!
//! Monotonic milliseconds since construction, from `std::time::Instant`.
//! A board build reads its hardware timer instead.

use std::time::Instant;

use crate::app::ports::ClockPort;

pub struct HostClock {
    start: Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl ClockPort for HostClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

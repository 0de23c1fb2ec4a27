//! A configurable spin/yield/sleep backoff.
//!
//! Phased the same way as a yielding wait strategy: busy-spin for a
//! configurable number of attempts, then yield to the scheduler for a bounded
//! number of further attempts, then fall back to a brief sleep. Unlike a
//! fixed-schedule backoff, the spin phase length is caller-supplied so
//! `QueueConfig::spin_limit` is an actual knob rather than a recorded-but-unread
//! setting.

use std::thread;
use std::time::Duration;

use crate::constants::MAX_YIELD_BACKOFF;

pub(crate) struct Backoff {
    spin_limit: usize,
    attempts: usize,
}

impl Backoff {
    pub(crate) fn new(spin_limit: usize) -> Self {
        Self { spin_limit, attempts: 0 }
    }

    /// Advance the backoff by one step: spin, then yield, then sleep.
    pub(crate) fn snooze(&mut self) {
        if self.attempts < self.spin_limit {
            std::hint::spin_loop();
        } else if self.attempts < self.spin_limit + MAX_YIELD_BACKOFF {
            thread::yield_now();
        } else {
            thread::sleep(Duration::from_nanos(1));
        }
        self.attempts += 1;
    }
}

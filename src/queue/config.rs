//! Configuration for [`super::MpmcQueue`].

use crate::constants::{DEFAULT_CAPACITY, DEFAULT_SPIN_LIMIT, MIN_CAPACITY};
use crate::error::{Error, Result};

/// Builder-style configuration for a ring buffer.
///
/// Validates eagerly: every setter fails before any allocation happens.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Requested capacity. Rounded up to the next power of two, minimum 2,
    /// at construction time.
    pub capacity: usize,
    /// Iterations of `spin_loop` attempted before falling back to
    /// `yield_now` (and eventually a brief sleep) in every blocking backoff
    /// that touches this queue: `enqueue_blocking`, `dequeue_blocking`, and
    /// `Pool::wait`.
    pub spin_limit: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            spin_limit: DEFAULT_SPIN_LIMIT,
        }
    }
}

impl QueueConfig {
    /// Create a configuration requesting the given capacity.
    ///
    /// A capacity of 0 is rejected; anything else is accepted here and
    /// rounded up to a power of two (minimum [`MIN_CAPACITY`]) when the
    /// queue is actually built.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::config("queue capacity must be greater than 0"));
        }
        Ok(Self { capacity, ..Default::default() })
    }

    /// Override the spin/yield backoff limit.
    pub fn with_spin_limit(mut self, spin_limit: usize) -> Result<Self> {
        if spin_limit == 0 {
            return Err(Error::config("spin_limit must be greater than 0"));
        }
        self.spin_limit = spin_limit;
        Ok(self)
    }

    /// The capacity actually used once rounded up to a power of two
    /// (minimum [`MIN_CAPACITY`]).
    pub fn rounded_capacity(&self) -> usize {
        self.capacity.max(MIN_CAPACITY).next_power_of_two()
    }
}

//! Configuration for [`super::Pool`].

use crate::error::{Error, Result};
use crate::queue::QueueConfig;

/// Builder-style configuration for a [`super::Pool`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads. Immutable once the pool is created.
    pub n_threads: usize,
    /// Configuration for the underlying ring buffer.
    pub queue: QueueConfig,
    /// Policy used by the `Drop` safety net if a [`super::Pool`] is dropped
    /// without an explicit call to [`super::Pool::shutdown`].
    pub wait_for_jobs_on_drop: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            n_threads: num_cpus::get().max(1),
            queue: QueueConfig::default(),
            wait_for_jobs_on_drop: false,
        }
    }
}

impl PoolConfig {
    /// Create a configuration with the given thread count and queue capacity.
    pub fn new(n_threads: usize, capacity: usize) -> Result<Self> {
        if n_threads == 0 {
            return Err(Error::config("n_threads must be at least 1"));
        }
        Ok(Self {
            n_threads,
            queue: QueueConfig::new(capacity)?,
            ..Default::default()
        })
    }

    /// Override the number of worker threads.
    pub fn with_threads(mut self, n_threads: usize) -> Result<Self> {
        if n_threads == 0 {
            return Err(Error::config("n_threads must be at least 1"));
        }
        self.n_threads = n_threads;
        Ok(self)
    }

    /// Override the queue configuration wholesale.
    pub fn with_queue(mut self, queue: QueueConfig) -> Self {
        self.queue = queue;
        self
    }

    /// Set the policy used when a [`super::Pool`] is dropped without an
    /// explicit [`super::Pool::shutdown`] call.
    pub fn with_wait_for_jobs_on_drop(mut self, wait: bool) -> Self {
        self.wait_for_jobs_on_drop = wait;
        self
    }
}

//! Error types for the queue and pool.

use thiserror::Error;

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`crate::Pool`] and [`crate::queue::MpmcQueue`].
///
/// `Transient` dequeue wake-ups (a semaphore wait returning without a matching
/// slot becoming visible) are an internal worker-loop concern and are never
/// constructed here; see the module docs on `queue::ring`.
#[derive(Error, Debug)]
pub enum Error {
    /// Returned by [`crate::Pool::new`] when a worker thread could not be spawned.
    #[error("failed to allocate pool resources: {message}")]
    AllocationFailure {
        /// Description of what failed to allocate.
        message: String,
    },

    /// Returned by `QueueConfig`/`PoolConfig` validation before any allocation occurs.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the invalid configuration value.
        message: String,
    },

    /// Submission was refused because the pool's acceptance gate is closed.
    #[error("pool is not accepting submissions")]
    Rejected,

    /// Non-blocking submission was refused because the ring buffer is saturated.
    #[error("queue is full")]
    QueueFull,
}

impl Error {
    /// Create a new allocation-failure error.
    pub fn allocation(message: impl Into<String>) -> Self {
        Self::AllocationFailure { message: message.into() }
    }

    /// Create a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    /// Whether a caller can reasonably retry the operation that produced this error.
    ///
    /// `Rejected` and `QueueFull` are both transient with respect to pool state
    /// (the gate may reopen, the queue may drain); `AllocationFailure` and
    /// `InvalidConfig` are not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Rejected | Self::QueueFull)
    }
}

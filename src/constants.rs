//! Tuning constants shared by the queue and pool.

/// Minimum ring buffer capacity. A requested capacity at or below this is
/// rounded up to exactly this value.
pub const MIN_CAPACITY: usize = 2;

/// Default ring buffer capacity used by [`crate::queue::QueueConfig::default`].
pub const DEFAULT_CAPACITY: usize = 4096;

/// Cache line size used to pad the ring's producer/consumer cursors apart so
/// that contending producers and consumers don't false-share.
pub const CACHE_LINE_SIZE: usize = 64;

/// Default number of `spin_loop` iterations attempted before a blocking
/// enqueue or `Pool::wait` falls back to `thread::yield_now`.
pub const DEFAULT_SPIN_LIMIT: usize = 64;

/// Number of `thread::yield_now` attempts a backoff makes once its spin
/// phase is exhausted, before falling back to a brief sleep.
pub const MAX_YIELD_BACKOFF: usize = 1024;

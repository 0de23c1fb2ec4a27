//! A bounded, lock-free multi-producer/multi-consumer job queue and the
//! worker-pool façade built on top of it.
//!
//! Clients submit short-lived, fire-and-forget closures; a fixed population
//! of OS threads drains a Vyukov-style sequence-numbered ring buffer and
//! runs them. The queue never takes a lock on its fast path — enqueue and
//! the slot-acquisition half of dequeue are CAS loops over per-slot sequence
//! numbers, cache-padded apart so producers and consumers don't false-share.
//!
//! ```
//! use vyukov_pool::{Pool, PoolConfig};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let pool = Pool::new(PoolConfig::new(2, 16).unwrap()).unwrap();
//! let counter = Arc::new(AtomicUsize::new(0));
//!
//! let c = counter.clone();
//! pool.submit(move || { c.fetch_add(1, Ordering::SeqCst); }).unwrap();
//!
//! pool.wait();
//! assert_eq!(counter.load(Ordering::SeqCst), 1);
//! pool.shutdown(true);
//! ```
//!
//! See `DESIGN.md` for the full design: the queue's slot-sequence
//! invariant, the pool's submission/shutdown protocol, and the open design
//! decisions recorded along the way.

pub(crate) mod backoff;
pub mod constants;
pub mod error;
pub mod job;
pub mod pool;
pub mod queue;
pub mod semaphore;

pub use error::{Error, Result};
pub use job::Job;
pub use pool::{Pool, PoolConfig};
pub use queue::{MpmcQueue, QueueConfig};
pub use semaphore::Semaphore;

/// Crate version, re-exported for diagnostics/logging.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

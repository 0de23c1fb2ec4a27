//! The lock-free bounded MPMC ring buffer.

mod config;
mod ring;
mod slot;

pub use config::QueueConfig;
pub use ring::MpmcQueue;

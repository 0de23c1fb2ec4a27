//! The lock-free bounded MPMC ring buffer (Vyukov's sequence-numbered queue).

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

use super::config::QueueConfig;
use super::slot::Slot;
use crate::backoff::Backoff;
use crate::semaphore::Semaphore;

/// A fixed-capacity, lock-free, multi-producer multi-consumer queue.
///
/// `enqueue_pos` and `dequeue_pos` are each cache-padded so that producers
/// and consumers contending on their own cursor never false-share with the
/// other side's cursor.
pub struct MpmcQueue<T> {
    buffer: Box<[Slot<T>]>,
    mask: usize,
    enqueue_pos: CachePadded<AtomicUsize>,
    dequeue_pos: CachePadded<AtomicUsize>,
    available: Semaphore,
    spin_limit: usize,
}

impl<T> MpmcQueue<T> {
    /// Build a queue from a validated [`QueueConfig`].
    ///
    /// The requested capacity is rounded up to the next power of two
    /// (minimum 2); slot `i` is initialized with `seq = i`.
    pub fn new(config: QueueConfig) -> Self {
        let capacity = config.rounded_capacity();
        let buffer: Box<[Slot<T>]> = (0..capacity).map(Slot::new).collect();

        Self {
            buffer,
            mask: capacity - 1,
            enqueue_pos: CachePadded::new(AtomicUsize::new(0)),
            dequeue_pos: CachePadded::new(AtomicUsize::new(0)),
            available: Semaphore::new(0),
            spin_limit: config.spin_limit,
        }
    }

    /// Number of slots in the ring (always a power of two, >= 2).
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// `capacity - 1`, used to index slots modulo capacity.
    pub fn mask(&self) -> usize {
        self.mask
    }

    #[inline]
    fn slot(&self, pos: usize) -> &Slot<T> {
        &self.buffer[pos & self.mask]
    }

    /// Signed difference between a slot's sequence and a cursor position.
    ///
    /// Cast through `isize`: this is what lets the algorithm distinguish
    /// "producer lapped the consumer" (negative) from "a concurrent peer
    /// just reserved this slot" (positive).
    #[inline]
    fn signed_diff(seq: usize, pos: usize) -> isize {
        seq.wrapping_sub(pos) as isize
    }

    /// Publish `value` without blocking. Returns `Err(value)` if the ring is
    /// full, handing the value back so callers can decide what to do with it.
    pub fn try_enqueue(&self, value: T) -> Result<(), T> {
        let mut pos = self.enqueue_pos.load(Ordering::Relaxed);
        loop {
            let slot = self.slot(pos);
            let seq = slot.seq.load(Ordering::Acquire);
            let diff = Self::signed_diff(seq, pos);

            if diff == 0 {
                match self.enqueue_pos.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        // SAFETY: we just won the CAS that reserved this slot
                        // for round `pos`; no other thread can write to it
                        // until we publish the new sequence below.
                        unsafe { slot.write(value) };
                        slot.seq.store(pos.wrapping_add(1), Ordering::Release);
                        self.available.post();
                        return Ok(());
                    }
                    Err(actual) => pos = actual,
                }
            } else if diff < 0 {
                tracing::trace!(pos, "try_enqueue found the ring full");
                return Err(value);
            } else {
                tracing::trace!(pos, "try_enqueue lost the CAS race, retrying");
                pos = self.enqueue_pos.load(Ordering::Relaxed);
            }
        }
    }

    /// Publish `value`, retrying with a spin/yield backoff until it fits.
    /// Never reports "full" — it only returns once the value is enqueued.
    pub fn enqueue_blocking(&self, mut value: T) {
        let mut backoff = Backoff::new(self.spin_limit);
        let mut retries = 0u32;
        loop {
            match self.try_enqueue(value) {
                Ok(()) => return,
                Err(v) => {
                    if retries == 0 {
                        tracing::debug!("enqueue_blocking waiting for ring to drain");
                    }
                    value = v;
                    retries += 1;
                    backoff.snooze();
                }
            }
        }
    }

    /// Block until a value is available, then dequeue and return it.
    ///
    /// Never reports "empty": the semaphore guarantees that once a waiter is
    /// admitted, a matching enqueue has already posted and the slot will
    /// become visible to the acquire load below.
    pub fn dequeue_blocking(&self) -> T {
        self.available.wait();

        let mut backoff = Backoff::new(self.spin_limit);
        let mut pos = self.dequeue_pos.load(Ordering::Relaxed);
        loop {
            let slot = self.slot(pos);
            let seq = slot.seq.load(Ordering::Acquire);
            let diff = Self::signed_diff(seq, pos.wrapping_add(1));

            if diff == 0 {
                match self.dequeue_pos.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        // SAFETY: we just won the CAS that claimed this slot
                        // for round `pos`; the semaphore wait above ensures a
                        // producer's release store already made the value
                        // visible.
                        let value = unsafe { slot.take() };
                        slot.seq
                            .store(pos.wrapping_add(self.capacity()), Ordering::Release);
                        return value;
                    }
                    Err(actual) => {
                        tracing::trace!(pos, "dequeue_blocking lost the CAS race, retrying");
                        pos = actual;
                    }
                }
            } else {
                pos = self.dequeue_pos.load(Ordering::Relaxed);
            }
            backoff.snooze();
        }
    }
}

impl<T> Drop for MpmcQueue<T> {
    fn drop(&mut self) {
        // Any slots still holding an initialized value between dequeue_pos
        // and enqueue_pos must be dropped in place, or a queue torn down
        // with jobs still resident would leak them.
        let head = *self.dequeue_pos.get_mut();
        let tail = *self.enqueue_pos.get_mut();
        let mut pos = head;
        while pos != tail {
            // SAFETY: every slot strictly between dequeue_pos and
            // enqueue_pos was published by `try_enqueue` and never taken, so
            // it still holds a live value; `&mut self` guarantees no
            // concurrent access.
            unsafe { self.slot(pos).drop_in_place() };
            pos = pos.wrapping_add(1);
        }
    }
}

unsafe impl<T: Send> Send for MpmcQueue<T> {}
unsafe impl<T: Send> Sync for MpmcQueue<T> {}

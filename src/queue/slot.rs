//! A single ring-buffer cell.
//!
//! `seq` is the only synchronization variable; `value` is published and
//! consumed under the release/acquire fences tied to it. Each slot is
//! cache-line aligned so that adjacent slots contended by different
//! producer/consumer pairs don't false-share.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::AtomicUsize;

use crate::constants::CACHE_LINE_SIZE;

static_assertions::const_assert_eq!(CACHE_LINE_SIZE, 64);

#[repr(align(64))]
pub struct Slot<T> {
    pub(crate) seq: AtomicUsize,
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    /// Create a slot whose sequence is initialized to `index`, matching the
    /// "after initialization slot i has seq = i" invariant.
    pub(crate) fn new(index: usize) -> Self {
        Self {
            seq: AtomicUsize::new(index),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Write `value` into the slot.
    ///
    /// # Safety
    /// The caller must hold exclusive producer access to this slot for the
    /// current round (i.e. have just won the CAS on `enqueue_pos` that
    /// reserved it) and must not call this twice without an intervening
    /// `take`.
    #[inline]
    pub(crate) unsafe fn write(&self, value: T) {
        (*self.value.get()).write(value);
    }

    /// Read the value out of the slot, leaving it logically uninitialized.
    ///
    /// # Safety
    /// The caller must hold exclusive consumer access to this slot for the
    /// current round (i.e. have just won the CAS on `dequeue_pos` that
    /// claimed it) and the slot must have been `write`-ed since its last
    /// `take`.
    #[inline]
    pub(crate) unsafe fn take(&self) -> T {
        (*self.value.get()).assume_init_read()
    }

    /// Drop a value left resident in the slot without a matching `take`.
    ///
    /// # Safety
    /// Same obligations as `take`: the slot must currently hold an
    /// initialized value and no other thread may be touching it.
    pub(crate) unsafe fn drop_in_place(&self) {
        (*self.value.get()).assume_init_drop();
    }
}

unsafe impl<T: Send> Send for Slot<T> {}
unsafe impl<T: Send> Sync for Slot<T> {}

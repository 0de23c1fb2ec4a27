//! A blocking counting semaphore.
//!
//! This is the "abstract counting semaphore" collaborator the queue is
//! specified against. Hosts without unnamed POSIX semaphores would normally
//! need a named-semaphore emulation; Rust doesn't need that shim because
//! `parking_lot`'s `Mutex`/`Condvar` are already portable, so this type wraps
//! those directly instead of binding to a platform primitive.

use parking_lot::{Condvar, Mutex};

/// A counting semaphore: `post` increments and wakes one waiter, `wait`
/// blocks until the count is positive and then atomically decrements it.
///
/// No ordering guarantee across waiters is provided beyond "every `post`
/// eventually wakes exactly one waiter if any are waiting". `wait` loops on
/// the condition variable, so a spurious OS-level wakeup never causes it to
/// return without having actually claimed a count.
pub struct Semaphore {
    count: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    /// Create a new semaphore with the given initial count.
    pub fn new(initial: usize) -> Self {
        Self {
            count: Mutex::new(initial),
            available: Condvar::new(),
        }
    }

    /// Increment the count and wake one waiter. Never blocks.
    pub fn post(&self) {
        let mut count = self.count.lock();
        *count += 1;
        self.available.notify_one();
    }

    /// Block until the count is positive, then decrement it.
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count == 0 {
            self.available.wait(&mut count);
        }
        *count -= 1;
    }

    /// Decrement the count if it is already positive, without blocking.
    pub fn try_wait(&self) -> bool {
        let mut count = self.count.lock();
        if *count > 0 {
            *count -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn post_then_wait_does_not_block() {
        let sem = Semaphore::new(0);
        sem.post();
        sem.wait();
    }

    #[test]
    fn try_wait_on_empty_fails() {
        let sem = Semaphore::new(0);
        assert!(!sem.try_wait());
        sem.post();
        assert!(sem.try_wait());
        assert!(!sem.try_wait());
    }

    #[test]
    fn wait_blocks_until_posted() {
        let sem = Arc::new(Semaphore::new(0));
        let waiter = {
            let sem = sem.clone();
            thread::spawn(move || sem.wait())
        };

        thread::sleep(Duration::from_millis(20));
        sem.post();
        waiter.join().unwrap();
    }

    #[test]
    fn every_post_wakes_exactly_one_waiter() {
        let sem = Arc::new(Semaphore::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sem = sem.clone();
                thread::spawn(move || sem.wait())
            })
            .collect();

        for _ in 0..8 {
            sem.post();
        }

        for h in handles {
            h.join().unwrap();
        }
    }
}

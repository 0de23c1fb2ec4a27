//! The worker-pool façade built on top of the MPMC ring buffer.

mod config;
mod worker;

pub use config::PoolConfig;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::backoff::Backoff;
use crate::error::{Error, Result};
use crate::job::Job;
use crate::queue::MpmcQueue;

/// A fixed population of worker threads draining a bounded lock-free MPMC
/// queue of fire-and-forget jobs.
///
/// `submit`/`submit_blocking` admit work while the pool is accepting,
/// `wait` blocks until the pool is quiescent, and `shutdown` closes the
/// gate, drains (optionally), appends one poison pill per worker, and joins
/// every thread.
pub struct Pool {
    queue: Arc<MpmcQueue<Job>>,
    workers: Vec<JoinHandle<()>>,
    n_threads: usize,
    running: Arc<AtomicBool>,
    accepting: Arc<AtomicBool>,
    queued: Arc<AtomicUsize>,
    busy: Arc<AtomicUsize>,
    spin_limit: usize,
    wait_for_jobs_on_drop: bool,
    shut_down: bool,
}

impl Pool {
    /// Build a pool and spawn its workers.
    ///
    /// If a worker thread fails to spawn partway through, every
    /// already-spawned worker is sent a poison pill and joined before the
    /// error is returned, so a failed `Pool::new` never leaks threads.
    pub fn new(config: PoolConfig) -> Result<Self> {
        if config.n_threads == 0 {
            return Err(Error::config("n_threads must be at least 1"));
        }

        let spin_limit = config.queue.spin_limit;
        let queue = Arc::new(MpmcQueue::new(config.queue));
        let running = Arc::new(AtomicBool::new(true));
        let accepting = Arc::new(AtomicBool::new(true));
        let queued = Arc::new(AtomicUsize::new(0));
        let busy = Arc::new(AtomicUsize::new(0));

        let mut workers = Vec::with_capacity(config.n_threads);
        for id in 0..config.n_threads {
            let worker_queue = queue.clone();
            let queued = queued.clone();
            let busy = busy.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("pool-worker-{id}"))
                .spawn(move || worker::run(id, worker_queue, queued, busy));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(spawn_err) => {
                    tracing::warn!(
                        error = %spawn_err,
                        spawned = workers.len(),
                        requested = config.n_threads,
                        "failed to spawn worker thread, rolling back"
                    );
                    for _ in 0..workers.len() {
                        queue.enqueue_blocking(Job::Poison);
                    }
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(Error::allocation(format!(
                        "failed to spawn worker thread {id}: {spawn_err}"
                    )));
                }
            }
        }

        tracing::debug!(n_threads = config.n_threads, capacity = queue.capacity(), "pool created");

        Ok(Self {
            queue,
            workers,
            n_threads: config.n_threads,
            running,
            accepting,
            queued,
            busy,
            spin_limit,
            wait_for_jobs_on_drop: config.wait_for_jobs_on_drop,
            shut_down: false,
        })
    }

    /// Number of worker threads (immutable after creation).
    pub fn n_threads(&self) -> usize {
        self.n_threads
    }

    /// Current ring buffer capacity.
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Jobs admitted but not yet fully completed.
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Acquire)
    }

    /// Workers currently inside a user callable.
    pub fn busy(&self) -> usize {
        self.busy.load(Ordering::Acquire)
    }

    /// Whether the pool is still in the `RUNNING`/`DRAINING` state, i.e.
    /// `shutdown` has not yet cleared the running flag. Once this returns
    /// `false` the pool's workers have been told to exit.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Submit `f` without blocking. Fails if the pool is not accepting
    /// submissions or the queue is currently full.
    pub fn submit<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.accepting.load(Ordering::Acquire) {
            return Err(Error::Rejected);
        }

        match self.queue.try_enqueue(Job::new(f)) {
            Ok(()) => {
                self.queued.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(_job) => Err(Error::QueueFull),
        }
    }

    /// Submit `f`, retrying until it fits. Only fails if the pool is not
    /// accepting submissions at call entry.
    ///
    /// Callers must not invoke this after initiating `shutdown` on another
    /// handle to the same pool: the backoff loop is not interruptible, so if
    /// the queue is saturated and `shutdown` is simultaneously draining it,
    /// this call may spin for an extended period.
    pub fn submit_blocking<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.accepting.load(Ordering::Acquire) {
            return Err(Error::Rejected);
        }

        self.queue.enqueue_blocking(Job::new(f));
        self.queued.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Block until no job is queued and no worker is busy.
    ///
    /// Not fair, and only meaningful when called from a thread that has
    /// stopped submitting: a concurrent submitter can keep this spinning
    /// indefinitely.
    pub fn wait(&self) {
        let mut backoff = Backoff::new(self.spin_limit);
        while self.queued.load(Ordering::Acquire) != 0 || self.busy.load(Ordering::Acquire) != 0 {
            backoff.snooze();
        }
    }

    /// Close the pool: stop accepting submissions, optionally drain
    /// outstanding jobs, then append one poison pill per worker and join
    /// every thread.
    ///
    /// Because the ring is FIFO per producer and the gate closes before any
    /// poison pill is enqueued, every already-admitted real job is always
    /// dequeued ahead of the pills that follow it.
    pub fn shutdown(mut self, wait_for_jobs: bool) {
        self.shutdown_impl(wait_for_jobs);
    }

    fn shutdown_impl(&mut self, wait_for_jobs: bool) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        tracing::debug!(wait_for_jobs, "pool shutdown initiated");
        self.accepting.store(false, Ordering::Release);

        if wait_for_jobs {
            self.wait();
        }

        for _ in 0..self.n_threads {
            self.queue.enqueue_blocking(Job::Poison);
        }
        self.running.store(false, Ordering::Release);

        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }

        tracing::debug!("pool shutdown complete");
    }
}

impl Drop for Pool {
    /// Safety net: if a `Pool` is dropped without an explicit call to
    /// [`Pool::shutdown`], run the shutdown protocol using
    /// `wait_for_jobs_on_drop` from the originating [`PoolConfig`] so
    /// workers are never leaked.
    fn drop(&mut self) {
        if !self.shut_down {
            let wait_for_jobs = self.wait_for_jobs_on_drop;
            self.shutdown_impl(wait_for_jobs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_when_not_accepting() {
        let pool = Pool::new(PoolConfig::new(1, 4).unwrap()).unwrap();
        pool.accepting.store(false, Ordering::Release);

        let result = pool.submit(|| {});
        assert!(matches!(result, Err(Error::Rejected)));

        let result = pool.submit_blocking(|| {});
        assert!(matches!(result, Err(Error::Rejected)));

        // Reopen so shutdown's own gate-close doesn't double with this test's.
        pool.accepting.store(true, Ordering::Release);
        pool.shutdown(true);
    }

    #[test]
    fn queue_full_is_reported_without_blocking() {
        let pool = Pool::new(PoolConfig::new(1, 2).unwrap()).unwrap();

        // The single worker picks this up immediately and is then pinned
        // inside it for 200ms, unable to drain anything else meanwhile.
        pool.submit(|| std::thread::sleep(std::time::Duration::from_millis(200)))
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));

        // Capacity is 2: two more submissions fill the ring, a third must
        // be rejected deterministically since the worker cannot drain.
        pool.submit(|| {}).unwrap();
        pool.submit(|| {}).unwrap();
        assert!(matches!(pool.submit(|| {}), Err(Error::QueueFull)));

        pool.shutdown(false);
    }

    #[test]
    fn drop_without_shutdown_still_joins_workers() {
        let config = PoolConfig::new(2, 8).unwrap();
        let pool = Pool::new(config).unwrap();
        pool.submit(|| {}).unwrap();
        drop(pool);
    }

    #[test]
    fn new_rejects_zero_threads_via_config_bypass() {
        let mut config = PoolConfig::new(1, 4).unwrap();
        config.n_threads = 0;
        assert!(matches!(Pool::new(config), Err(Error::InvalidConfig { .. })));
    }
}

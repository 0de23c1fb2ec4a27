//! The per-thread worker loop.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::job::Job;
use crate::queue::MpmcQueue;

/// Run until a poison pill is dequeued, then return.
///
/// A platform counting semaphore can have its wait return spuriously (e.g.
/// `EINTR`), which is why some worker-loop designs also consult a `running`
/// flag after each wake. [`crate::semaphore::Semaphore::wait`] has no such
/// failure mode, so the only way a worker ever exits is by dequeuing a
/// poison pill; `running` is read only by the pool's shutdown/Drop
/// bookkeeping, not by this loop.
pub(crate) fn run(id: usize, queue: Arc<MpmcQueue<Job>>, queued: Arc<AtomicUsize>, busy: Arc<AtomicUsize>) {
    let span = tracing::debug_span!("pool_worker", id);
    let _enter = span.enter();

    loop {
        let job = queue.dequeue_blocking();
        if job.is_poison() {
            tracing::trace!("poison pill received, exiting");
            return;
        }

        busy.fetch_add(1, Ordering::AcqRel);
        // A panicking job must not poison the counters a concurrent `wait`
        // depends on, nor take this worker down with it.
        if catch_unwind(AssertUnwindSafe(|| job.run())).is_err() {
            tracing::warn!("job panicked, worker continuing");
        }
        // Decrement queued before busy: pool_wait observes both under
        // acquire loads, so this ordering guarantees it can't witness
        // busy == 0 before the matching queued decrement has retired.
        queued.fetch_sub(1, Ordering::Release);
        busy.fetch_sub(1, Ordering::AcqRel);
    }
}

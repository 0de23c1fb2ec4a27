//! Minimal end-to-end demonstration of the lock-free MPMC job queue and
//! worker pool.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use vyukov_pool::{Pool, PoolConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("vyukov-pool - lock-free MPMC job queue demo");
    println!("=============================================");

    let config = PoolConfig::new(4, 1024)?;
    println!("workers: {}", config.n_threads);
    println!("ring capacity (requested): {}", config.queue.capacity);

    let pool = Pool::new(config)?;
    println!("ring capacity (rounded):  {}", pool.capacity());

    const JOBS: usize = 100_000;
    let completed = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();
    for _ in 0..JOBS {
        let completed = completed.clone();
        pool.submit_blocking(move || {
            completed.fetch_add(1, Ordering::Relaxed);
        })?;
    }
    pool.wait();
    let elapsed = start.elapsed();

    println!("\nsubmitted {JOBS} jobs");
    println!("completed: {}", completed.load(Ordering::Relaxed));
    println!("elapsed:   {elapsed:?}");
    println!(
        "throughput: {:.2} jobs/ms",
        JOBS as f64 / elapsed.as_millis().max(1) as f64
    );

    pool.shutdown(true);
    println!("\npool shut down cleanly");

    Ok(())
}

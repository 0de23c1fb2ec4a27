//! Criterion-based throughput benchmark for `MpmcQueue` and `Pool`.
//!
//! Run: cargo bench --bench bench_queue

use std::hint::black_box;
use std::sync::Arc;
use std::thread;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use vyukov_pool::{MpmcQueue, Pool, PoolConfig, QueueConfig};

const RING_CAPACITY: usize = 4096;
const TOTAL_EVENTS: u64 = 200_000;

fn single_producer_single_consumer(events: u64) -> u64 {
    let q = Arc::new(MpmcQueue::<u64>::new(QueueConfig::new(RING_CAPACITY).unwrap()));

    let q_cons = q.clone();
    let consumer = thread::spawn(move || {
        let mut received = 0u64;
        loop {
            let v = q_cons.dequeue_blocking();
            if v == u64::MAX {
                return received;
            }
            black_box(v);
            received += 1;
        }
    });

    for i in 0..events {
        q.enqueue_blocking(i);
    }
    q.enqueue_blocking(u64::MAX);

    consumer.join().unwrap()
}

fn multi_producer_multi_consumer(events: u64, producers: usize, consumers: usize) -> u64 {
    let q = Arc::new(MpmcQueue::<u64>::new(QueueConfig::new(RING_CAPACITY).unwrap()));
    let per_producer = events / producers as u64;

    let producer_handles: Vec<_> = (0..producers)
        .map(|_| {
            let q = q.clone();
            thread::spawn(move || {
                for i in 0..per_producer {
                    q.enqueue_blocking(i);
                }
            })
        })
        .collect();

    let consumer_handles: Vec<_> = (0..consumers)
        .map(|_| {
            let q = q.clone();
            thread::spawn(move || {
                let mut received = 0u64;
                loop {
                    let v = q.dequeue_blocking();
                    if v == u64::MAX {
                        return received;
                    }
                    black_box(v);
                    received += 1;
                }
            })
        })
        .collect();

    for p in producer_handles {
        p.join().unwrap();
    }
    for _ in 0..consumers {
        q.enqueue_blocking(u64::MAX);
    }

    consumer_handles.into_iter().map(|c| c.join().unwrap()).sum()
}

fn pool_roundtrip(events: u64, n_threads: usize) {
    let pool = Pool::new(PoolConfig::new(n_threads, RING_CAPACITY).unwrap()).unwrap();
    for _ in 0..events {
        pool.submit_blocking(|| {
            black_box(1 + 1);
        })
        .unwrap();
    }
    pool.wait();
    pool.shutdown(true);
}

fn benchmark_queue_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("MpmcQueue throughput");
    group.throughput(Throughput::Elements(TOTAL_EVENTS));
    group.sample_size(20);

    group.bench_function(BenchmarkId::new("shape", "1p1c"), |b| {
        b.iter(|| single_producer_single_consumer(TOTAL_EVENTS))
    });

    group.bench_function(BenchmarkId::new("shape", "4p4c"), |b| {
        b.iter(|| multi_producer_multi_consumer(TOTAL_EVENTS, 4, 4))
    });

    group.bench_function(BenchmarkId::new("shape", "8p2c"), |b| {
        b.iter(|| multi_producer_multi_consumer(TOTAL_EVENTS, 8, 2))
    });

    group.finish();
}

fn benchmark_pool_threads(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pool job throughput");
    group.throughput(Throughput::Elements(50_000));
    group.sample_size(10);

    for n_threads in [1, 2, 4, 8] {
        group.bench_function(BenchmarkId::new("threads", n_threads), |b| {
            b.iter(|| pool_roundtrip(50_000, n_threads))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_queue_shapes, benchmark_pool_threads);
criterion_main!(benches);

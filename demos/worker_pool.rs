// Fanning work out to a thread pool and collecting results with promises.
//
// Each chunk of the input is summed by a pool job that delivers its partial
// total through a promise; the main thread blocks on the futures in order
// and combines them. Dropping the pool drains and joins the workers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tether::{ThreadPool, pair};

fn main() {
    env_logger::init();

    let pool = ThreadPool::new(0).expect("spawning workers");
    println!("pool started with {} workers", pool.worker_count());

    let numbers: Vec<i64> = (1..=10_000).collect();
    let mut futures = Vec::new();
    for chunk in numbers.chunks(2500) {
        let chunk = chunk.to_vec();
        let (promise, future) = pair();
        pool.push_task(move || {
            let sum: i64 = chunk.iter().sum();
            promise.set_value(sum).expect("first and only result");
        });
        futures.push(future);
    }

    let total: i64 = futures
        .iter()
        .map(|future| future.get().expect("worker delivers"))
        .sum();
    println!("total = {total}");

    // Plain fire-and-forget work is fine too.
    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..10 {
        let counter = Arc::clone(&counter);
        pool.push_task(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
    }
    drop(pool);
    println!("ticks = {}", counter.load(Ordering::Relaxed));
}

// Integration tests for the public API of tether.
//
// The single-threaded engine is unit-tested inside the crate; these tests
// exercise the cross-thread surface: promises and futures handed between
// real OS threads, the blocking work queue, and the worker pool.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tether::{Error, Promise, SyncEvent, ThreadPool, WorkQueue, pair};

#[test]
fn value_round_trips_between_threads() {
    let (promise, future) = pair();

    let producer = thread::spawn(move || {
        thread::sleep(Duration::from_secs(1));
        promise.set_value(String::from("hello future")).unwrap();
    });

    let start = Instant::now();
    let value = future.get().unwrap();
    let waited = start.elapsed();

    producer.join().unwrap();
    assert_eq!(value, "hello future");
    // get() must actually have blocked for the producer's artificial delay.
    assert!(waited >= Duration::from_millis(900), "waited {waited:?}");
}

#[test]
fn second_result_is_rejected_and_first_wins() {
    let (promise, future) = pair();

    promise.set_value(1).unwrap();
    assert_eq!(promise.set_value(2), Err(Error::AlreadySet));
    assert_eq!(promise.set_error(Error::failed("too late")), Err(Error::AlreadySet));

    assert_eq!(future.get(), Ok(1));
    // Reading does not consume: the same outcome again.
    assert_eq!(future.get(), Ok(1));
}

#[test]
fn an_error_is_redelivered_to_every_get() {
    let (promise, future) = pair::<i32>();
    promise.set_error(Error::failed("computation failed")).unwrap();
    assert_eq!(future.get(), Err(Error::failed("computation failed")));
    assert_eq!(future.get(), Err(Error::failed("computation failed")));
}

#[test]
fn the_future_is_vended_at_most_once() {
    let mut promise = Promise::new();
    let future = promise.get_future().unwrap();
    assert!(matches!(
        promise.get_future(),
        Err(Error::FutureAlreadyRetrieved)
    ));
    assert!(matches!(
        promise.get_future(),
        Err(Error::FutureAlreadyRetrieved)
    ));

    // The first future is unaffected.
    promise.set_value(7).unwrap();
    assert_eq!(future.get(), Ok(7));
}

#[test]
fn the_vended_flag_travels_with_a_moved_promise() {
    let mut promise = Promise::new();
    let future = promise.get_future().unwrap();

    // Moving the promise moves the cell and the vended flag with it; the
    // old binding is unusable from here on, by construction.
    let mut moved = promise;
    assert!(matches!(
        moved.get_future(),
        Err(Error::FutureAlreadyRetrieved)
    ));

    let producer = thread::spawn(move || {
        moved.set_value(200).unwrap();
    });
    assert_eq!(future.get(), Ok(200));
    producer.join().unwrap();
}

#[test]
fn a_dropped_producer_wakes_the_consumer() {
    let (promise, future) = pair::<i32>();

    let producer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        drop(promise);
    });

    let start = Instant::now();
    let outcome = future.get();
    let waited = start.elapsed();

    producer.join().unwrap();
    assert_eq!(outcome, Err(Error::Abandoned));
    assert_eq!(
        outcome.unwrap_err().to_string(),
        "producer destroyed before a result was produced"
    );
    // Woken by the drop, not by any timeout.
    assert!(waited < Duration::from_secs(5), "waited {waited:?}");
}

#[test]
fn a_fulfilled_promise_dropping_is_not_abandonment() {
    let (promise, future) = pair();
    promise.set_value("done").unwrap();
    drop(promise);
    assert_eq!(future.get(), Ok("done"));
}

#[test]
fn void_signal_unblocks_only_after_set() {
    let (promise, future) = pair::<()>();
    let gate = Arc::new(SyncEvent::new());
    let ran = Arc::new(AtomicBool::new(false));

    let producer = {
        let gate = Arc::clone(&gate);
        let ran = Arc::clone(&ran);
        thread::spawn(move || {
            gate.wait();
            ran.store(true, Ordering::SeqCst);
            promise.set_value(()).unwrap();
        })
    };

    // The producer is parked on the gate, so the cell cannot be ready yet.
    assert!(!future.is_ready());
    assert!(!future.wait_for(Duration::from_millis(50)));

    gate.notify();
    future.get().unwrap();
    assert!(ran.load(Ordering::SeqCst));
    producer.join().unwrap();
}

#[test]
fn wait_for_times_out_without_an_error() {
    let (promise, future) = pair::<i32>();

    let start = Instant::now();
    assert!(!future.wait_for(Duration::from_millis(50)));
    assert!(start.elapsed() >= Duration::from_millis(50));

    promise.set_value(3).unwrap();
    assert!(future.wait_for(Duration::from_millis(50)));
    assert_eq!(future.get(), Ok(3));
}

#[test]
fn wait_until_with_a_past_deadline_returns_immediately() {
    let (_promise, future) = pair::<i32>();
    assert!(!future.wait_until(Instant::now()));
}

#[test]
fn wait_observes_without_consuming() {
    let (promise, future) = pair();
    let producer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        promise.set_value(5).unwrap();
    });
    future.wait();
    assert!(future.is_ready());
    assert_eq!(future.get(), Ok(5));
    producer.join().unwrap();
}

#[test]
fn a_pending_future_can_be_awaited() {
    let (promise, future) = pair();

    let producer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        promise.set_value(String::from("hello future")).unwrap();
    });

    let value = futures::executor::block_on(future);
    assert_eq!(value.unwrap(), "hello future");
    producer.join().unwrap();
}

#[test]
fn awaiting_an_abandoned_cell_resolves_to_an_error() {
    let (promise, future) = pair::<i32>();
    let producer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        drop(promise);
    });
    assert_eq!(futures::executor::block_on(future), Err(Error::Abandoned));
    producer.join().unwrap();
}

#[test]
fn queue_hands_items_to_a_blocked_consumer() {
    let queue = Arc::new(WorkQueue::new());
    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.pop())
    };

    thread::sleep(Duration::from_millis(50));
    queue.push(42);
    assert_eq!(consumer.join().unwrap(), Some(42));
}

#[test]
fn a_stopped_queue_drains_before_reporting_not_available() {
    let queue = WorkQueue::new();
    queue.push(1);
    queue.push(2);
    queue.stop();

    assert_eq!(queue.pop(), Some(1));
    assert_eq!(queue.pop(), Some(2));
    assert_eq!(queue.pop(), None);
    assert_eq!(queue.pop(), None);
}

#[test]
fn stop_wakes_a_blocked_consumer() {
    let queue = Arc::new(WorkQueue::<i32>::new());
    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.pop())
    };

    thread::sleep(Duration::from_millis(50));
    queue.stop();
    assert_eq!(consumer.join().unwrap(), None);
}

#[test]
fn the_pool_drains_queued_work_before_shutdown() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let pool = ThreadPool::new(4).unwrap();
        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            pool.push_task(move || {
                for _ in 0..1000 {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    }
    // Drop joined the workers after draining every job.
    assert_eq!(counter.load(Ordering::Relaxed), 10_000);
}

#[test]
fn zero_workers_means_hardware_concurrency() {
    let pool = ThreadPool::new(0).unwrap();
    assert!(pool.worker_count() >= 1);
}

#[test]
fn a_promise_rides_the_pool() {
    let pool = ThreadPool::new(2).unwrap();
    let (promise, future) = pair();

    let numbers = vec![1, 2, 3, 4, 5, 6];
    pool.push_task(move || {
        let sum: i32 = numbers.iter().sum();
        promise.set_value(sum).unwrap();
    });

    assert_eq!(future.get(), Ok(21));
}

#[test]
fn a_job_panic_surfaces_when_the_pool_is_dropped() {
    let pool = ThreadPool::new(1).unwrap();
    pool.push_task(|| panic!("job exploded"));
    // Give the worker time to pick the job up.
    thread::sleep(Duration::from_millis(50));
    catch_unwind(AssertUnwindSafe(|| drop(pool))).unwrap_err();
}

#[test]
fn sync_event_orders_two_threads() {
    let event = Arc::new(SyncEvent::new());
    let flag = Arc::new(AtomicBool::new(false));

    let waiter = {
        let event = Arc::clone(&event);
        let flag = Arc::clone(&flag);
        thread::spawn(move || {
            event.wait();
            flag.load(Ordering::SeqCst)
        })
    };

    thread::sleep(Duration::from_millis(50));
    flag.store(true, Ordering::SeqCst);
    event.notify();
    assert!(waiter.join().unwrap());
}

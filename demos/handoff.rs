// Handing results between threads with promise/future pairs.
//
// A worker thread sums a chunk of numbers and delivers the total through a
// promise while the main thread blocks on the paired future. A second,
// value-less pair then acts as a completion barrier.

use std::thread;
use std::time::Duration;

use tether::pair;

fn main() {
    env_logger::init();

    // Transmit a computed value.
    let numbers = vec![1, 2, 3, 4, 5, 6];
    let (promise, future) = pair();
    let worker = thread::spawn(move || {
        let sum: i64 = numbers.iter().sum();
        promise.set_value(sum).expect("first and only result");
    });

    println!("sum = {}", future.get().expect("worker delivers"));
    worker.join().expect("worker thread panicked");

    // Signal completion without a value.
    let (barrier, done) = pair::<()>();
    let worker = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        println!("worker: finished the slow part");
        barrier.set_value(()).expect("first and only signal");
    });

    done.wait();
    println!("main: observed the barrier");
    worker.join().expect("worker thread panicked");
}

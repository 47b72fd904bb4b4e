// Interleaving tasks on a single-threaded scheduler.
//
// Two multi-segment tasks are spawned onto the run queue. Each time one
// parks at a suspension point it goes to the back of the queue, so their
// segments alternate on one thread. The scheduler publishes each task's
// outcome through a future once its frame finishes.

use tether::{Scheduler, Step, Task, suspend};

fn staged(name: &'static str, result: i32) -> Task<i32> {
    Task::new(move || {
        println!("{name}: stage 1");
        Ok(suspend(move || {
            println!("{name}: stage 2");
            Ok(suspend(move || {
                println!("{name}: stage 3");
                Ok(Step::Done(result))
            }))
        }))
    })
}

fn main() {
    env_logger::init();

    let scheduler = Scheduler::new();
    let alpha = scheduler.spawn(staged("alpha", 1));
    let beta = scheduler.spawn(staged("beta", 2));

    scheduler.run();

    println!("alpha -> {:?}", alpha.get());
    println!("beta  -> {:?}", beta.get());
}

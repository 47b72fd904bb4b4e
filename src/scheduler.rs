use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use either::Either;

use crate::promise::{Future, Promise, pair};
use crate::task::{Task, drive_once};

type Action = Box<dyn FnOnce()>;

/// A single-threaded run queue that drives tasks to completion.
///
/// The scheduler itself is plain producer/consumer plumbing: it stores
/// "resume this frame" actions and runs them in order. Its purpose is to
/// show how the cooperative engine plugs into a real driver — a task that
/// parks at a suspension point is simply re-posted to the back of the
/// queue, so several tasks interleave their segments on one thread.
///
/// Handles are cheap clones of one shared queue.
///
/// # Examples
///
/// ```rust
/// use tether::{Scheduler, Step, Task};
///
/// let scheduler = Scheduler::new();
/// let future = scheduler.spawn(Task::new(|| Ok(Step::Done(6 * 7))));
/// scheduler.run();
/// assert_eq!(future.get(), Ok(42));
/// ```
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Rc<RunQueue>,
}

#[derive(Default)]
struct RunQueue {
    actions: RefCell<VecDeque<Action>>,
}

impl Scheduler {
    /// An empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues an action to run on the next turn of [`run`](Scheduler::run).
    pub fn post(&self, action: impl FnOnce() + 'static) {
        self.inner.actions.borrow_mut().push_back(Box::new(action));
    }

    /// Runs queued actions — including any they post — until the queue is
    /// empty.
    pub fn run(&self) {
        loop {
            // The borrow must end before the action runs: actions post.
            let next = self.inner.actions.borrow_mut().pop_front();
            match next {
                Some(action) => action(),
                None => break,
            }
        }
    }

    /// Adopts a task: resumes it one segment per turn until it finishes,
    /// then publishes its outcome through the returned [`Future`].
    ///
    /// After [`run`](Scheduler::run) returns, the future is ready and
    /// `get` does not block.
    pub fn spawn<T: 'static>(&self, task: Task<T>) -> Future<T> {
        let (promise, future) = pair();
        let scheduler = self.clone();
        self.post(move || scheduler.pump(task, promise));
        future
    }

    fn pump<T: 'static>(&self, task: Task<T>, promise: Promise<T>) {
        match drive_once(task) {
            Either::Left(outcome) => {
                let published = match outcome {
                    Ok(value) => promise.set_value(value),
                    Err(error) => promise.set_error(error),
                };
                if let Err(error) = published {
                    log::debug!("spawned task outcome discarded: {error}");
                }
            }
            Either::Right(task) => {
                let scheduler = self.clone();
                self.post(move || scheduler.pump(task, promise));
            }
        }
    }
}

//! The `tether` crate provides primitives for deferring, chaining, and
//! transporting the result of a computation — within one thread or across
//! several.
//!
//! Two collaborating families make up the core:
//!
//!   * [`Task`]: a *cooperative continuation frame*. A task is a deferred
//!     computation that starts suspended, is driven by explicit
//!     [`resume`](Task::resume) calls, may park at explicit suspension
//!     points, and may [`delegate`] to another task — suspending itself,
//!     registering the rest of its body as the inner task's continuation,
//!     and transferring control. Exactly one value or error comes out the
//!     other end.
//!   * [`Promise`] / [`Future`]: a *thread-safe one-shot result cell*. The
//!     promise is moved to a producing thread; the future stays with the
//!     consumer and blocks in [`get`](Future::get) until a value or error
//!     arrives — or until the producer is dropped without delivering, which
//!     the consumer observes as an [`Error::Abandoned`] result rather than
//!     a hang.
//!
//! Both are built on the same [`Slot`]: a tagged {empty, value, error} cell
//! with exactly-once write discipline.
//!
//! The two families live under different concurrency regimes and must not
//! be confused. Tasks are single-threaded and cooperative: nothing suspends
//! implicitly, no locks are involved, and `&mut` access makes "one driver
//! at a time" a compile-time fact. The result cell is preemptive: every
//! transition is serialized under one mutex per cell, and its blocking
//! reads park the calling OS thread. The only source of real parallelism
//! here is the [`ThreadPool`] (fed by a blocking [`WorkQueue`]); the task
//! engine never spawns a thread.
//!
//! # Examples
//!
//! Chaining tasks with delegation:
//!
//! ```rust
//! use tether::{Step, Task};
//!
//! let inner = Task::new(|| Ok(Step::Done(40)));
//! let mut outer = inner.then(|n| Ok(Step::Done(n + 2)));
//!
//! // Tasks start suspended; nothing has run yet.
//! assert!(!outer.is_ready());
//!
//! // One resume drives the outer frame, which delegates to the inner
//! // frame, which finishes and feeds the continuation — all before
//! // control comes back here.
//! outer.resume();
//! assert_eq!(outer.result(), Ok(&42));
//! ```
//!
//! Handing a result between threads:
//!
//! ```rust
//! use std::thread;
//! use std::time::Duration;
//!
//! let (promise, future) = tether::pair();
//!
//! let producer = thread::spawn(move || {
//!     thread::sleep(Duration::from_millis(10));
//!     promise.set_value(String::from("hello future")).unwrap();
//! });
//!
//! // Blocks until the producer delivers.
//! assert_eq!(future.get().unwrap(), "hello future");
//! producer.join().unwrap();
//! ```
//!
//! Driving a batch of tasks with the illustrative [`Scheduler`], which
//! bridges finished tasks into futures:
//!
//! ```rust
//! use tether::{Scheduler, Step, Task, suspend};
//!
//! let scheduler = Scheduler::new();
//! let a = scheduler.spawn(Task::new(|| Ok(suspend(|| Ok(Step::Done(1))))));
//! let b = scheduler.spawn(Task::new(|| Ok(Step::Done(2))));
//! scheduler.run();
//! assert_eq!(a.get(), Ok(1));
//! assert_eq!(b.get(), Ok(2));
//! ```
//!
//! # Error handling
//!
//! Every failure in the crate is a value of the one [`Error`] enum, and
//! every failure is delivered to the caller that triggered it — there is no
//! global error sink and no silent-drop path. A body segment that returns
//! `Err`, or panics, finishes its frame with the failure stored; readers
//! see the same error re-delivered on every access. Writes after the first
//! are rejected with [`Error::AlreadySet`]; the first result always wins.
//!
//! # What this crate does not do
//!
//! There is no cancellation anywhere in a delegation chain — a driver that
//! wants to stop a computation simply stops resuming it (and drops it).
//! There is no broadcast: each cell has one producer and at most one
//! future, and each frame has exactly one logical driver. And the task
//! engine performs no scheduling of its own beyond "resume what you were
//! told to resume" — policy belongs to drivers like [`Scheduler`] or an
//! external pool.

mod error;
mod event;
mod generator;
mod pool;
mod promise;
mod queue;
mod scheduler;
mod slot;
mod step;
mod task;

pub use error::Error;
pub use error::Result;
pub use event::SyncEvent;
pub use generator::GenIter;
pub use generator::GenStep;
pub use generator::Generator;
pub use pool::ThreadPool;
pub use promise::Future;
pub use promise::Promise;
pub use promise::pair;
pub use queue::WorkQueue;
pub use scheduler::Scheduler;
pub use slot::Slot;
pub use step::Step;
pub use step::StepFn;
pub use step::delegate;
pub use step::suspend;
pub use task::Task;
pub use task::drive_once;

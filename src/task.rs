use std::any::Any;
use std::mem;
use std::panic::{self, AssertUnwindSafe};

use either::Either;

use crate::error::Error;
use crate::slot::Slot;
use crate::step::{Advanced, Delegated, Step, StepFn, delegate};

/// A move-only handle to a deferred, suspend/resume-capable computation
/// that produces exactly one value or error.
///
/// A task starts suspended: constructing one runs none of its body. The
/// driver calls [`resume`](Task::resume) until [`is_ready`](Task::is_ready)
/// reports that the frame has finished, then reads the outcome through
/// [`result`](Task::result), [`take_result`](Task::take_result), or
/// [`into_result`](Task::into_result).
///
/// The frame is owned exclusively by its handle. Moving the handle moves the
/// computation; there is no way to alias it, and `resume` takes `&mut self`,
/// so the single-logical-driver rule of the engine is enforced by the
/// borrow checker rather than by a lock. Dropping a handle whose frame never
/// finished silently discards the pending computation.
///
/// Tasks compose by delegation: a body step can [`delegate`] to an inner
/// task, which suspends the outer frame, records the rest of the outer body
/// as the inner frame's continuation, and transfers control to the inner
/// frame. When the inner frame finishes, the continuation runs before
/// control returns to whoever called `resume` on the outer handle — a chain
/// of tasks unwinds back to its driver without the driver polling each
/// link.
///
/// # Examples
///
/// ```rust
/// use tether::{Step, Task};
///
/// let inner = Task::new(|| Ok(Step::Done("hello".to_owned())));
/// let mut outer = inner.then(|greeting| Ok(Step::Done(format!("{greeting} world"))));
///
/// assert!(!outer.is_ready());
/// outer.resume();
/// assert_eq!(outer.result().unwrap(), "hello world");
/// ```
pub struct Task<T> {
    frame: Frame<T>,
    slot: Slot<T>,
}

/// The frame's continuation state: what happens on the next resume.
enum Frame<T> {
    /// Not yet started, or parked at an explicit suspension point.
    Ready(StepFn<T>),
    /// Parked on an inner task.
    Delegated(Delegated<T>),
    /// The body has run to completion; the slot holds the outcome.
    Finished,
}

impl<T> Task<T> {
    /// Creates a task from the first segment of its body.
    ///
    /// The task starts suspended; `body` does not run until the first call
    /// to [`resume`](Task::resume).
    pub fn new(body: impl FnOnce() -> crate::Result<Step<T>> + 'static) -> Self {
        Task {
            frame: Frame::Ready(Box::new(body)),
            slot: Slot::new(),
        }
    }

    /// A task whose body immediately finishes with `value`.
    ///
    /// Like every task it starts suspended, so one `resume` call is still
    /// required before the result is readable.
    pub fn ready(value: T) -> Self
    where
        T: 'static,
    {
        Task::new(move || Ok(Step::Done(value)))
    }

    /// Chains `continuation` to run on this task's value, producing the
    /// combined computation as a new task.
    ///
    /// Equivalent to a task whose body delegates to `self` and continues
    /// with `continuation`. If this task fails, the continuation is skipped
    /// and the combined task fails with the same error.
    pub fn then<U>(
        self,
        continuation: impl FnOnce(T) -> crate::Result<Step<U>> + 'static,
    ) -> Task<U>
    where
        T: 'static,
        U: 'static,
    {
        Task::new(move || Ok(delegate(self, continuation)))
    }

    /// Drives the frame until it finishes or parks at a suspension point.
    ///
    /// Returns `false` — and runs nothing — if the frame had already
    /// finished; otherwise `true`, including the call that finished it.
    ///
    /// A delegation encountered while driving transfers control to the
    /// inner frame within the same call; only an explicit suspension point
    /// or the end of the body hands control back. A body with N explicit
    /// suspension points therefore reaches readiness after exactly N+1
    /// resumes: the initial suspension plus one per suspension point.
    ///
    /// Failures — an `Err` from a body segment, or a panic — are captured
    /// here, stored in the frame's slot, and the frame finishes; they are
    /// observed through the result accessors, never propagated out of
    /// `resume`.
    pub fn resume(&mut self) -> bool {
        if matches!(self.frame, Frame::Finished) {
            return false;
        }
        loop {
            let outcome = match mem::replace(&mut self.frame, Frame::Finished) {
                Frame::Ready(segment) => run_guarded(segment),
                Frame::Delegated(link) => {
                    match run_guarded(move || link.advance()) {
                        Ok(Advanced::Parked(link)) => {
                            self.frame = Frame::Delegated(link);
                            return true;
                        }
                        Ok(Advanced::Continue(step)) => Ok(step),
                        Err(error) => Err(error),
                    }
                }
                Frame::Finished => unreachable!("checked before the loop"),
            };
            match outcome {
                Ok(Step::Done(value)) => {
                    if let Err(error) = self.slot.put(value) {
                        self.slot.fail(error);
                    }
                    return true;
                }
                Ok(Step::Suspend(next)) => {
                    self.frame = Frame::Ready(next);
                    return true;
                }
                Ok(Step::Delegate(link)) => {
                    // Control transfers to the inner frame immediately.
                    self.frame = Frame::Delegated(link);
                }
                Err(error) => {
                    log::debug!("task finished with an error: {error}");
                    self.slot.fail(error);
                    return true;
                }
            }
        }
    }

    /// True once the frame has finished, with a value or an error.
    pub fn is_ready(&self) -> bool {
        matches!(self.frame, Frame::Finished)
    }

    /// Reads the outcome by reference.
    ///
    /// Fails with [`Error::NotSet`] if the frame has not finished —
    /// including before the first resume — and never blocks. A stored
    /// failure is re-delivered identically on every call.
    pub fn result(&self) -> crate::Result<&T> {
        self.slot.get()
    }

    /// Reads the outcome by move.
    ///
    /// The first successful call moves the value out, leaving the type's
    /// moved-from residual (its `Default` value) behind; a later call
    /// returns that residual rather than an error. Do not read twice and
    /// expect the original value.
    pub fn take_result(&mut self) -> crate::Result<T>
    where
        T: Default,
    {
        self.slot.take()
    }

    /// Consumes the task, returning the outcome.
    pub fn into_result(self) -> crate::Result<T> {
        self.slot.into_inner()
    }
}

/// Resumes a task once, handing back either its final outcome or the
/// still-suspended task.
///
/// This is the natural shape for drivers that own their tasks and park them
/// between resumes, such as a run queue.
///
/// # Examples
///
/// ```rust
/// use either::Either;
/// use tether::{Step, Task, drive_once, suspend};
///
/// let task = Task::new(|| Ok(suspend(|| Ok(Step::Done(3)))));
/// let task = match drive_once(task) {
///     Either::Right(task) => task,
///     Either::Left(_) => unreachable!("one suspension point remains"),
/// };
/// assert_eq!(drive_once(task).left(), Some(Ok(3)));
/// ```
pub fn drive_once<T>(mut task: Task<T>) -> Either<crate::Result<T>, Task<T>> {
    task.resume();
    if task.is_ready() {
        Either::Left(task.into_result())
    } else {
        Either::Right(task)
    }
}

/// Runs one unit of frame work, converting a panic into a stored error so
/// that arbitrary failures become a normal finished state.
fn run_guarded<R>(work: impl FnOnce() -> crate::Result<R>) -> crate::Result<R> {
    match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(outcome) => outcome,
        Err(payload) => Err(Error::Panicked(panic_message(payload))),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_owned()
    }
}

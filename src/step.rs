use crate::task::Task;

/// A boxed segment of a task body: runs to the frame's next suspension
/// point (or to the end) and reports how the frame should proceed.
pub type StepFn<T> = Box<dyn FnOnce() -> crate::Result<Step<T>>>;

/// The state of a task frame after one segment of its body has run.
///
/// Each time a task is resumed, the engine runs the frame's current segment
/// and inspects the `Step` it produced:
///
///   * `Done(value)`: the body has finished; `value` lands in the frame's
///     result slot and the task becomes ready.
///   * `Suspend(next)`: an explicit suspension point. Control returns to the
///     driver, and the *next* call to `resume()` continues with `next`.
///   * `Delegate(link)`: the frame hands control to an inner task. The inner
///     frame is resumed immediately — before anything after the delegation
///     point in this frame runs — and when it finishes, its value feeds the
///     continuation recorded in the link.
///
/// Segments return `crate::Result<Step<T>>`, so a body can bail out with
/// `?`; the failure is captured at the frame boundary and stored as the
/// frame's outcome.
pub enum Step<T> {
    /// Finish the frame with a value.
    Done(T),
    /// Park at an explicit suspension point; resume continues with the
    /// boxed segment.
    Suspend(StepFn<T>),
    /// Transfer control to an inner task, continuing with its result.
    Delegate(Delegated<T>),
}

/// Builds an explicit suspension point from the segment that should run on
/// the next resume.
///
/// # Examples
///
/// ```rust
/// use tether::{Step, Task, suspend};
///
/// let mut task = Task::new(|| Ok(suspend(|| Ok(Step::Done("second resume")))));
/// assert!(task.resume());
/// assert!(!task.is_ready());
/// assert!(task.resume());
/// assert_eq!(task.result(), Ok(&"second resume"));
/// ```
pub fn suspend<T>(next: impl FnOnce() -> crate::Result<Step<T>> + 'static) -> Step<T> {
    Step::Suspend(Box::new(next))
}

/// Builds a delegation step: suspend the current frame, register
/// `continuation` as what runs when `inner` finishes, and transfer control
/// to `inner`.
///
/// The inner frame is driven by the same `resume()` call that reached this
/// step. If the inner frame parks at one of its own suspension points, the
/// whole chain parks with it, and later resumes of the outer task keep
/// driving the inner frame. When the inner frame finishes with a value, the
/// continuation runs before control returns to the driver; when it finishes
/// with an error, the continuation is skipped and the error becomes the
/// outer frame's outcome.
///
/// # Examples
///
/// ```rust
/// use tether::{Step, Task, delegate};
///
/// let inner = Task::new(|| Ok(Step::Done(40)));
/// let mut outer = Task::new(|| Ok(delegate(inner, |n| Ok(Step::Done(n + 2)))));
/// outer.resume();
/// assert_eq!(outer.result(), Ok(&42));
/// ```
pub fn delegate<U, T>(
    inner: Task<U>,
    continuation: impl FnOnce(U) -> crate::Result<Step<T>> + 'static,
) -> Step<T>
where
    U: 'static,
    T: 'static,
{
    Step::Delegate(Delegated {
        link: Box::new(Delegation {
            inner,
            continuation: Box::new(continuation),
        }),
    })
}

/// An in-flight delegation: the inner task plus the continuation that its
/// result will feed. Opaque to callers; built with [`delegate`].
pub struct Delegated<T> {
    link: Box<dyn Link<T>>,
}

impl<T> Delegated<T> {
    /// Drives the inner frame one step on behalf of the outer frame.
    pub(crate) fn advance(self) -> crate::Result<Advanced<T>> {
        self.link.advance()
    }
}

/// What a delegation step produced when advanced.
pub(crate) enum Advanced<T> {
    /// The inner frame parked at a suspension point; the outer frame stays
    /// delegated.
    Parked(Delegated<T>),
    /// The inner frame finished and the continuation produced the outer
    /// frame's next step.
    Continue(Step<T>),
}

/// Type-erasing link between an outer frame and the inner task it awaits.
/// The erasure is what lets a `Task<T>` delegate to a `Task<U>` of any
/// result type.
pub(crate) trait Link<T> {
    fn advance(self: Box<Self>) -> crate::Result<Advanced<T>>;
}

struct Delegation<U, T> {
    inner: Task<U>,
    continuation: Box<dyn FnOnce(U) -> crate::Result<Step<T>>>,
}

impl<U: 'static, T: 'static> Link<T> for Delegation<U, T> {
    fn advance(mut self: Box<Self>) -> crate::Result<Advanced<T>> {
        self.inner.resume();
        if self.inner.is_ready() {
            let Delegation {
                inner,
                continuation,
            } = *self;
            // An inner failure skips the continuation and becomes the outer
            // frame's outcome.
            let value = inner.into_result()?;
            continuation(value).map(Advanced::Continue)
        } else {
            Ok(Advanced::Parked(Delegated { link: self }))
        }
    }
}

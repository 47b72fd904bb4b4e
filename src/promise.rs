use std::pin::Pin;
use std::sync::{Arc, Condvar, Mutex};
use std::task::{Context, Poll, Waker};
use std::time::{Duration, Instant};

use crate::error::Error;
use crate::slot::Slot;

const POISONED: &str = "result cell mutex poisoned";

/// Creates a connected pair of [`Promise`] and [`Future`].
///
/// The future counts as already retrieved: a later
/// [`get_future`](Promise::get_future) on the returned promise fails.
///
/// # Examples
///
/// ```rust
/// use std::thread;
///
/// let (promise, future) = tether::pair();
/// let producer = thread::spawn(move || {
///     promise.set_value("hello future".to_owned()).unwrap();
/// });
/// assert_eq!(future.get().unwrap(), "hello future");
/// producer.join().unwrap();
/// ```
pub fn pair<T>() -> (Promise<T>, Future<T>) {
    let shared = Arc::new(Shared {
        state: Mutex::new(CellState {
            slot: Slot::new(),
            future_retrieved: true,
            waker: None,
        }),
        ready: Condvar::new(),
    });
    (
        Promise {
            shared: Arc::clone(&shared),
        },
        Future { shared },
    )
}

/// The state a promise/future pair shares, reference-counted by the two
/// handles. The cell is freed when the last handle — producer or consumer —
/// releases its hold.
struct Shared<T> {
    state: Mutex<CellState<T>>,
    ready: Condvar,
}

/// Everything protected by the cell's mutex, including the future-vended
/// flag: whether a consumer exists is part of the same state machine as the
/// result itself.
struct CellState<T> {
    slot: Slot<T>,
    future_retrieved: bool,
    waker: Option<Waker>,
}

impl<T> Shared<T> {
    /// Installs an outcome under the lock. Exactly-once at the cell level:
    /// an occupied cell rejects the write and keeps its first result, so
    /// every reader observes the outcome that won.
    fn complete(&self, outcome: Result<T, Error>) -> crate::Result<()> {
        let mut state = self.state.lock().expect(POISONED);
        if state.slot.is_set() {
            return Err(Error::AlreadySet);
        }
        match outcome {
            Ok(value) => state.slot.put(value)?,
            Err(error) => state.slot.fail(error),
        }
        self.ready.notify_one();
        if let Some(waker) = state.waker.take() {
            waker.wake();
        }
        Ok(())
    }
}

/// The producer side of a one-shot, cross-thread result cell.
///
/// A promise is created empty, hands out at most one [`Future`], and
/// delivers at most one result — a value via [`set_value`](Promise::set_value)
/// or an error via [`set_error`](Promise::set_error). It is move-only:
/// typically it is moved into the producing thread while the consumer keeps
/// the future.
///
/// Dropping a promise that never delivered, while a future exists, installs
/// an [`Error::Abandoned`] result under the cell's lock before the hold is
/// released — a consumer blocked in [`Future::get`] wakes with that error
/// instead of waiting forever.
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Promise<T> {
    /// Creates an empty promise. Pair it with a consumer via
    /// [`get_future`](Promise::get_future), or use [`pair`] to do both at
    /// once.
    pub fn new() -> Self {
        Promise {
            shared: Arc::new(Shared {
                state: Mutex::new(CellState {
                    slot: Slot::new(),
                    future_retrieved: false,
                    waker: None,
                }),
                ready: Condvar::new(),
            }),
        }
    }

    /// Retrieves the consumer handle for this promise's cell.
    ///
    /// At most one future exists per cell: the second call fails with
    /// [`Error::FutureAlreadyRetrieved`], and the flag moves with the
    /// promise value itself.
    pub fn get_future(&mut self) -> crate::Result<Future<T>> {
        let mut state = self.shared.state.lock().expect(POISONED);
        if state.future_retrieved {
            return Err(Error::FutureAlreadyRetrieved);
        }
        state.future_retrieved = true;
        drop(state);
        Ok(Future {
            shared: Arc::clone(&self.shared),
        })
    }

    /// Delivers the value, waking the consumer.
    ///
    /// Fails with [`Error::AlreadySet`] if the cell already holds a result;
    /// the first result stays.
    pub fn set_value(&self, value: T) -> crate::Result<()> {
        self.shared.complete(Ok(value))
    }

    /// Delivers a failure, waking the consumer. The error is re-raised by
    /// every subsequent [`Future::get`].
    ///
    /// Fails with [`Error::AlreadySet`] if the cell already holds a result.
    pub fn set_error(&self, error: Error) -> crate::Result<()> {
        self.shared.complete(Err(error))
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Promise<T> {
    /// An undelivered promise with an outstanding future abandons its
    /// consumer explicitly: the error is installed under the same lock that
    /// `set_value`/`set_error` use, so a blocked `get` can only ever
    /// observe either a real result or the abandonment, never a silently
    /// dead cell.
    fn drop(&mut self) {
        let mut state = self.shared.state.lock().expect(POISONED);
        if state.future_retrieved && !state.slot.is_set() {
            log::debug!("promise dropped before producing a result");
            state.slot.fail(Error::Abandoned);
            self.shared.ready.notify_one();
            if let Some(waker) = state.waker.take() {
                waker.wake();
            }
        }
    }
}

/// The consumer side of a one-shot, cross-thread result cell.
///
/// Obtained once per [`Promise`]. Reading does not consume the result: the
/// stored value (or error) is re-delivered on every [`get`](Future::get),
/// and the `wait*` family blocks without reading at all.
///
/// Blocking calls park the OS thread; do not call them from a thread that
/// must keep servicing cooperative task frames.
pub struct Future<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Future<T> {
    /// Blocks until the cell holds a result, without reading it.
    pub fn wait(&self) {
        let state = self.shared.state.lock().expect(POISONED);
        let _state = self
            .shared
            .ready
            .wait_while(state, |cell| !cell.slot.is_set())
            .expect(POISONED);
    }

    /// Blocks until the cell holds a result or `timeout` elapses.
    ///
    /// Returns whether the cell is ready; a timeout is a normal `false`,
    /// not an error.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let state = self.shared.state.lock().expect(POISONED);
        let (state, _timed_out) = self
            .shared
            .ready
            .wait_timeout_while(state, timeout, |cell| !cell.slot.is_set())
            .expect(POISONED);
        state.slot.is_set()
    }

    /// Blocks until the cell holds a result or `deadline` passes. Returns
    /// whether the cell is ready.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        self.wait_for(deadline.saturating_duration_since(Instant::now()))
    }

    /// True once the producer has delivered a result (or abandoned the
    /// cell).
    pub fn is_ready(&self) -> bool {
        self.shared.state.lock().expect(POISONED).slot.is_set()
    }
}

impl<T: Clone> Future<T> {
    /// Blocks until the cell holds a result, then returns it.
    ///
    /// A value is cloned out; an error — including [`Error::Abandoned`] —
    /// is re-raised. Calling `get` again re-delivers the same outcome; the
    /// cell is never cleared.
    pub fn get(&self) -> crate::Result<T> {
        let state = self.shared.state.lock().expect(POISONED);
        let state = self
            .shared
            .ready
            .wait_while(state, |cell| !cell.slot.is_set())
            .expect(POISONED);
        state.slot.get().cloned()
    }
}

/// Polling a pending cell parks the caller's waker in the cell; the
/// producer wakes it on delivery or abandonment. This lets a consumer
/// `.await` the result from an async executor instead of blocking a
/// thread.
impl<T: Clone> std::future::Future for Future<T> {
    type Output = crate::Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.shared.state.lock().expect(POISONED);
        if state.slot.is_set() {
            Poll::Ready(state.slot.get().cloned())
        } else {
            state.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

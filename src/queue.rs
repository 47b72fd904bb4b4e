use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

const POISONED: &str = "work queue mutex poisoned";

/// A blocking FIFO handed between threads: producers [`push`](WorkQueue::push),
/// consumers [`pop`](WorkQueue::pop) and sleep while the queue is empty.
///
/// [`stop`](WorkQueue::stop) wakes every blocked consumer; a stopped queue
/// keeps handing out whatever items were already queued and reports
/// not-available (`None`) only once drained.
pub struct WorkQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

struct QueueState<T> {
    items: VecDeque<T>,
    stopped: bool,
}

impl<T> WorkQueue<T> {
    /// An empty, running queue.
    pub fn new() -> Self {
        WorkQueue {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                stopped: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Appends an item and wakes one blocked consumer.
    pub fn push(&self, item: T) {
        let mut state = self.state.lock().expect(POISONED);
        state.items.push_back(item);
        self.available.notify_one();
    }

    /// Removes the oldest item, blocking while the queue is empty and still
    /// running. Returns `None` once the queue has been stopped and drained.
    pub fn pop(&self) -> Option<T> {
        let state = self.state.lock().expect(POISONED);
        let mut state = self
            .available
            .wait_while(state, |queue| queue.items.is_empty() && !queue.stopped)
            .expect(POISONED);
        state.items.pop_front()
    }

    /// Removes the oldest item without blocking.
    pub fn try_pop(&self) -> Option<T> {
        self.state.lock().expect(POISONED).items.pop_front()
    }

    /// Stops the queue: wakes every blocked consumer, and makes `pop`
    /// return `None` once the remaining items are drained.
    pub fn stop(&self) {
        let mut state = self.state.lock().expect(POISONED);
        state.stopped = true;
        self.available.notify_all();
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.state.lock().expect(POISONED).items.len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.state.lock().expect(POISONED).items.is_empty()
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

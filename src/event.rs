use std::sync::{Condvar, Mutex};

const POISONED: &str = "sync event mutex poisoned";

/// A one-shot flag for forcing an ordering between two threads: waiters
/// block until some thread calls [`notify`](SyncEvent::notify).
///
/// Unlike a result cell, the event carries no payload and can be
/// [`reset`](SyncEvent::reset) for reuse.
pub struct SyncEvent {
    flag: Mutex<bool>,
    signal: Condvar,
}

impl SyncEvent {
    /// An unsignaled event.
    pub fn new() -> Self {
        SyncEvent {
            flag: Mutex::new(false),
            signal: Condvar::new(),
        }
    }

    /// Blocks until the event is signaled. Returns immediately if it
    /// already was.
    pub fn wait(&self) {
        let flag = self.flag.lock().expect(POISONED);
        let _flag = self
            .signal
            .wait_while(flag, |signaled| !*signaled)
            .expect(POISONED);
    }

    /// Signals the event, waking every waiter.
    pub fn notify(&self) {
        *self.flag.lock().expect(POISONED) = true;
        self.signal.notify_all();
    }

    /// Clears the signal so the event can be waited on again.
    pub fn reset(&self) {
        *self.flag.lock().expect(POISONED) = false;
    }
}

impl Default for SyncEvent {
    fn default() -> Self {
        Self::new()
    }
}

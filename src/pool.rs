use std::io;
use std::panic;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::queue::WorkQueue;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed set of worker threads pulling boxed jobs from a shared
/// [`WorkQueue`].
///
/// Dropping the pool stops the queue, lets the workers drain whatever was
/// already queued, joins them, and forwards the first worker panic to the
/// dropping thread — a job that panicked takes its worker down, and the
/// failure surfaces where the pool is torn down rather than disappearing
/// with a detached thread.
pub struct ThreadPool {
    queue: Arc<WorkQueue<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawns a pool with `worker_count` threads; 0 means one per available
    /// CPU.
    pub fn new(worker_count: usize) -> io::Result<Self> {
        let count = if worker_count == 0 {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        } else {
            worker_count
        };
        let queue = Arc::new(WorkQueue::<Job>::new());
        let mut workers = Vec::with_capacity(count);
        for id in 0..count {
            let queue = Arc::clone(&queue);
            let handle = thread::Builder::new()
                .name(format!("tether-worker-{id}"))
                .spawn(move || {
                    log::trace!("worker {id} starting");
                    while let Some(job) = queue.pop() {
                        job();
                    }
                    log::trace!("worker {id} exiting");
                })?;
            workers.push(handle);
        }
        Ok(ThreadPool { queue, workers })
    }

    /// Enqueues a job for the next idle worker.
    pub fn push_task(&self, job: impl FnOnce() + Send + 'static) {
        self.queue.push(Box::new(job));
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.queue.stop();
        for handle in self.workers.drain(..) {
            match handle.join() {
                Ok(()) => {}
                Err(payload) => {
                    if !thread::panicking() {
                        panic::resume_unwind(payload);
                    }
                }
            }
        }
    }
}

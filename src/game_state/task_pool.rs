//! # Task Pool
//!
//! A fixed pool of worker threads consuming a shared double-ended job queue.
//! Generation and first-pass meshing go to the back of the queue; remeshing
//! after a player edit goes to the front so it preempts the backlog and the
//! edit shows up next frame.
//!
//! ## Contract
//!
//! - Workers block on an empty queue and wake on any submission or on
//!   shutdown.
//! - [`TaskPool::shutdown`] sets a stop flag, wakes every worker, and joins
//!   them. A worker finishes at most the job it already holds; queued but
//!   unstarted jobs are never run.
//! - Submitting after shutdown is a programming error and panics.
//!
//! [`TaskSender`] is a cheap clonable handle, so a running job can schedule
//! follow-up work (chunk generation enqueues that chunk's first meshing
//! pass from inside the worker).

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct PoolState {
    queue: VecDeque<Job>,
    stopped: bool,
}

struct PoolShared {
    state: Mutex<PoolState>,
    signal: Condvar,
}

/// Clonable submission handle to a [`TaskPool`].
#[derive(Clone)]
pub struct TaskSender {
    shared: Arc<PoolShared>,
}

impl TaskSender {
    /// Appends a job to the back of the queue (background/bulk work).
    ///
    /// # Panics
    /// Panics if the pool has been shut down.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) {
        self.push(Box::new(job), false);
    }

    /// Prepends a job to the front of the queue (interactive work that must
    /// run before the backlog).
    ///
    /// # Panics
    /// Panics if the pool has been shut down.
    pub fn submit_priority(&self, job: impl FnOnce() + Send + 'static) {
        self.push(Box::new(job), true);
    }

    fn push(&self, job: Job, front: bool) {
        {
            let mut state = self.shared.state.lock().unwrap();
            if state.stopped {
                // Release the lock before panicking so the pool's mutex is
                // not poisoned for the threads still shutting down.
                drop(state);
                panic!("task submitted to a task pool after shutdown");
            }
            if front {
                state.queue.push_front(job);
            } else {
                state.queue.push_back(job);
            }
        }
        self.shared.signal.notify_one();
    }
}

/// Fixed-size worker thread pool over a double-ended queue.
pub struct TaskPool {
    sender: TaskSender,
    workers: Vec<JoinHandle<()>>,
}

impl TaskPool {
    /// Spawns `worker_count` worker threads (minimum one).
    pub fn new(worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let shared = Arc::new(PoolShared {
            state: Mutex::new(PoolState {
                queue: VecDeque::new(),
                stopped: false,
            }),
            signal: Condvar::new(),
        });

        log::info!("Starting task pool with {} workers", worker_count);

        let workers = (0..worker_count)
            .map(|i| {
                let shared = shared.clone();
                std::thread::Builder::new()
                    .name(format!("voxel-worker-{}", i))
                    .spawn(move || worker_loop(shared))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        TaskPool {
            sender: TaskSender { shared },
            workers,
        }
    }

    /// Returns a submission handle that can outlive borrows of the pool.
    pub fn sender(&self) -> TaskSender {
        self.sender.clone()
    }

    /// Stops the pool: no queued-but-unstarted job will run, jobs already
    /// picked up finish, and this call returns only once every worker has
    /// exited. Idempotent.
    pub fn shutdown(&mut self) {
        {
            let mut state = self.sender.shared.state.lock().unwrap();
            if state.stopped {
                return;
            }
            state.stopped = true;
            let discarded = state.queue.len();
            state.queue.clear();
            if discarded > 0 {
                log::debug!("Discarding {} unstarted tasks on shutdown", discarded);
            }
        }
        self.sender.shared.signal.notify_all();

        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: Arc<PoolShared>) {
    loop {
        let job = {
            let mut state = shared.state.lock().unwrap();
            loop {
                if state.stopped {
                    return;
                }
                if let Some(job) = state.queue.pop_front() {
                    break job;
                }
                state = shared.signal.wait(state).unwrap();
            }
        };

        job();
    }
}

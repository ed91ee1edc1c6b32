//! Deadline scheduler for periodic targets
//!
//! One dedicated timer thread services a monotonic deadline queue. Callbacks
//! fire once; re-arming is an explicit `schedule` call made by the owner, not
//! a side effect of the callback body. Periodic targets hold the scheduler
//! through an `Arc` and capture only `Weak` state in their callbacks, so
//! dropping a target wins over a pending timer.

use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::thread;
use std::time::Instant;

type Callback = Box<dyn FnOnce() + Send>;

struct Task {
    deadline: Instant,
    seq: u64,
    callback: Callback,
}

// Min-heap by deadline; seq breaks ties in submission order.
impl Ord for Task {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Task {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Task {}

pub struct Scheduler {
    tx: Option<Sender<Task>>,
    handle: Option<thread::JoinHandle<()>>,
    next_seq: std::sync::atomic::AtomicU64,
}

impl Scheduler {
    pub fn new() -> Self {
        let (tx, rx) = unbounded::<Task>();

        let handle = thread::Builder::new()
            .name("tidelog-timer".to_string())
            .spawn(move || {
                let mut queue: BinaryHeap<Task> = BinaryHeap::new();
                loop {
                    // Fire everything that is due.
                    let now = Instant::now();
                    while queue.peek().is_some_and(|t| t.deadline <= now) {
                        let task = queue.pop().expect("peeked");
                        (task.callback)();
                    }

                    match queue.peek() {
                        Some(next) => {
                            let wait = next.deadline.saturating_duration_since(Instant::now());
                            match rx.recv_timeout(wait) {
                                Ok(task) => queue.push(task),
                                Err(RecvTimeoutError::Timeout) => {}
                                Err(RecvTimeoutError::Disconnected) => break,
                            }
                        }
                        None => match rx.recv() {
                            Ok(task) => queue.push(task),
                            Err(_) => break,
                        },
                    }
                }
            })
            .expect("failed to spawn timer thread");

        Self {
            tx: Some(tx),
            handle: Some(handle),
            next_seq: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Run `callback` once at `deadline`. Silently a no-op after shutdown.
    pub fn schedule<F>(&self, deadline: Instant, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(tx) = &self.tx {
            let seq = self
                .next_seq
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            let _ = tx.send(Task {
                deadline,
                seq,
                callback: Box::new(callback),
            });
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        // Closing the channel ends the timer thread; pending tasks are
        // dropped without firing.
        drop(self.tx.take());
        if let Some(handle) = self.handle.take() {
            // A callback can own the last reference to the scheduler, putting
            // this drop on the timer thread itself. Joining would deadlock;
            // the thread exits on its own once the channel is closed.
            if handle.thread().id() == thread::current().id() {
                return;
            }
            let _ = handle.join();
        }
    }
}

//! UI-affinity task queue.
//!
//! Anything that must touch tree state from outside the UI turn (animation
//! completions, timers, requests from callbacks) is posted here and run when
//! the owner drains the queue. Delayed tasks run on the same explicit clock
//! as the animator.

use std::time::Duration;

use tokio::sync::mpsc;

/// Handle for a delayed task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DelayedTaskId(u64);

/// Sender half of the queue.
///
/// Clone-able and `Send` when `T` is, so it can be handed to callbacks.
#[derive(Debug)]
pub struct TaskSender<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for TaskSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> TaskSender<T> {
    /// Post a task.
    ///
    /// Returns false if the executor is gone.
    pub fn post(&self, task: T) -> bool {
        self.tx.send(task).is_ok()
    }
}

struct Delayed<T> {
    id: DelayedTaskId,
    due: Duration,
    task: T,
}

pub struct TaskExecutor<T> {
    tx: mpsc::UnboundedSender<T>,
    rx: mpsc::UnboundedReceiver<T>,
    delayed: Vec<Delayed<T>>,
    now: Duration,
    next_delayed: u64,
}

impl<T> Default for TaskExecutor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskExecutor<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            delayed: Vec::new(),
            now: Duration::ZERO,
            next_delayed: 1,
        }
    }

    pub fn sender(&self) -> TaskSender<T> {
        TaskSender {
            tx: self.tx.clone(),
        }
    }

    pub fn post(&self, task: T) {
        // The receiver lives in self, so sending cannot fail.
        let _ = self.tx.send(task);
    }

    /// Run `task` once `delay` has elapsed on the executor clock.
    pub fn post_delayed(&mut self, task: T, delay: Duration) -> DelayedTaskId {
        let id = DelayedTaskId(self.next_delayed);
        self.next_delayed += 1;
        self.delayed.push(Delayed {
            id,
            due: self.now + delay,
            task,
        });
        id
    }

    /// Cancel a delayed task that has not fired yet.
    pub fn cancel_delayed(&mut self, id: DelayedTaskId) -> bool {
        let before = self.delayed.len();
        self.delayed.retain(|d| d.id != id);
        before != self.delayed.len()
    }

    pub fn has_delayed(&self, id: DelayedTaskId) -> bool {
        self.delayed.iter().any(|d| d.id == id)
    }

    /// Move the clock forward; due delayed tasks join the ready queue in due order.
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
        let now = self.now;
        let mut due: Vec<Delayed<T>> = Vec::new();
        let mut index = 0;
        while index < self.delayed.len() {
            if self.delayed[index].due <= now {
                due.push(self.delayed.remove(index));
            } else {
                index += 1;
            }
        }
        due.sort_by_key(|d| (d.due, d.id.0));
        for delayed in due {
            self.post(delayed.task);
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Time until the next delayed task is due.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.delayed
            .iter()
            .map(|d| d.due.saturating_sub(self.now))
            .min()
    }

    /// Take every ready task without blocking.
    pub fn drain(&mut self) -> Vec<T> {
        let mut tasks = Vec::new();
        while let Ok(task) = self.rx.try_recv() {
            tasks.push(task);
        }
        tasks
    }

    /// Wait for the next ready task.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    pub fn pending_delayed(&self) -> usize {
        self.delayed.len()
    }
}

#![forbid(unsafe_code)]

//! Fire-and-forget deferred tasks on a virtual clock.
//!
//! Tasks are submitted with a delay and a static label and nothing else: no
//! handle is returned, so a submitted task cannot be cancelled or awaited.
//! Time only moves when the owner calls [`TimerQueue::advance`], which makes
//! overlay lifetimes reproducible in tests.
//!
//! Ordering: a task with an earlier due time runs first; tasks due at the same
//! instant run in submission order. Nothing else is promised, in particular
//! nothing about how tasks from different submitters interleave.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::environment::Environment;

/// Deferred work run against the environment when its due time arrives.
pub type Task = Box<dyn FnOnce(&mut dyn Environment)>;

/// Single-threaded shared handle to a timer queue.
pub type SharedTimers = Rc<RefCell<TimerQueue>>;

struct Scheduled {
    due: Duration,
    seq: u64,
    label: &'static str,
    task: Task,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the earliest due time pops first,
        // then the earliest submission.
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A task whose due time has passed, detached from the queue.
pub struct DueTask {
    pub label: &'static str,
    pub due: Duration,
    task: Task,
}

impl DueTask {
    pub fn run(self, env: &mut dyn Environment) {
        tracing::trace!(
            target: "gremlins.timers",
            label = self.label,
            due_ms = self.due.as_millis() as u64,
            "running deferred task"
        );
        (self.task)(env);
    }
}

impl fmt::Debug for DueTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DueTask")
            .field("label", &self.label)
            .field("due", &self.due)
            .finish_non_exhaustive()
    }
}

/// Virtual-time queue of deferred tasks.
#[derive(Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    pending: BinaryHeap<Scheduled>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for the shared handle.
    pub fn shared() -> SharedTimers {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of tasks not yet due.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.peek().map(|scheduled| scheduled.due)
    }

    /// Schedule `task` to run `delay` after the current virtual time.
    pub fn submit(&mut self, delay: Duration, label: &'static str, task: Task) {
        let due = self.now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::trace!(
            target: "gremlins.timers",
            label,
            due_ms = due.as_millis() as u64,
            "deferred task submitted"
        );
        self.pending.push(Scheduled {
            due,
            seq,
            label,
            task,
        });
    }

    /// Move the clock forward by `by` and detach every task now due, in run order.
    ///
    /// The queue does not run tasks itself; the caller runs them once it no
    /// longer holds the queue, so a task is free to submit more work.
    pub fn advance(&mut self, by: Duration) -> Vec<DueTask> {
        self.now = self.now.saturating_add(by);
        let mut due = Vec::new();
        while self
            .pending
            .peek()
            .is_some_and(|scheduled| scheduled.due <= self.now)
        {
            if let Some(scheduled) = self.pending.pop() {
                due.push(DueTask {
                    label: scheduled.label,
                    due: scheduled.due,
                    task: scheduled.task,
                });
            }
        }
        due
    }
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now", &self.now)
            .field("pending", &self.pending.len())
            .finish()
    }
}

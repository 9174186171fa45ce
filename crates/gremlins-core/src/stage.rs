#![forbid(unsafe_code)]

//! The stage a gremlin performs on: the environment plus the deferred-task
//! queue that outlives each invocation.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::environment::{Environment, SharedEnvironment};
use crate::timers::{SharedTimers, TimerQueue};

/// Cheap-to-clone bundle of the shared environment and timer queue.
#[derive(Clone)]
pub struct Stage {
    env: SharedEnvironment,
    timers: SharedTimers,
}

impl Stage {
    /// A stage over `env` with a fresh timer queue.
    pub fn new(env: SharedEnvironment) -> Self {
        Self {
            env,
            timers: TimerQueue::shared(),
        }
    }

    /// Wrap an owned environment, returning the stage and a typed handle to it.
    pub fn from_environment<E: Environment + 'static>(env: E) -> (Self, Rc<RefCell<E>>) {
        let typed = Rc::new(RefCell::new(env));
        let shared: SharedEnvironment = typed.clone();
        (Self::new(shared), typed)
    }

    pub fn env(&self) -> &SharedEnvironment {
        &self.env
    }

    pub fn timers(&self) -> &SharedTimers {
        &self.timers
    }

    /// Current virtual time of the timer queue.
    pub fn now(&self) -> Duration {
        self.timers.borrow().now()
    }

    /// Advance virtual time by `by` and run every task that became due.
    ///
    /// Returns the number of tasks run. Due tasks are detached from the queue
    /// and the queue borrow is released before any of them runs, so a task may
    /// submit more work; such work runs on a later call. The environment is
    /// borrowed mutably for the duration of each task, so a task must reach it
    /// only through its argument.
    pub fn advance(&self, by: Duration) -> usize {
        let due = self.timers.borrow_mut().advance(by);
        let count = due.len();
        for task in due {
            let mut env = self.env.borrow_mut();
            task.run(&mut *env);
        }
        count
    }

    /// Keep advancing to the next due time until no tasks remain.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        loop {
            let next = {
                let timers = self.timers.borrow();
                timers
                    .next_due()
                    .map(|due| due.saturating_sub(timers.now()))
            };
            match next {
                Some(delta) => total += self.advance(delta),
                None => return total,
            }
        }
    }
}

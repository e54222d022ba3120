//! Deferred Tasks
//!
//! Zero-delay timer queue. Tasks posted while an event is being handled run
//! only after that event's turn completes; tasks posted while a batch runs
//! land in the next turn.

use std::collections::VecDeque;

/// FIFO of deferred tasks
#[derive(Debug)]
pub struct TaskQueue<T> {
    pending: VecDeque<T>,
    posted: u64,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            posted: 0,
        }
    }

    /// Schedule a task for a later turn
    pub fn post(&mut self, task: T) {
        self.posted += 1;
        self.pending.push_back(task);
    }

    /// Take every task that is due this turn, in posting order
    pub fn take_turn(&mut self) -> Vec<T> {
        std::mem::take(&mut self.pending).into()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total tasks ever posted
    pub fn posted(&self) -> u64 {
        self.posted
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

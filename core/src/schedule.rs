use serde::{Deserialize, Serialize};

use crate::*;

/// One-shot action that becomes due at a fixed time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Scheduled<T> {
    due_at: Millis,
    seq: u64,
    task: T,
}

/// Single-threaded queue of deferred actions.
///
/// Nothing runs on its own: the owner calls [`Scheduler::take_due`] from its
/// tick and executes what comes back. Tasks due at the same time come out in
/// the order they were scheduled. There is no cancellation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scheduler<T> {
    pending: Vec<Scheduled<T>>,
    next_seq: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due_at: Millis, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled { due_at, seq, task });
    }

    /// Removes and returns every task with `due_at <= now`, earliest first.
    pub fn take_due(&mut self, now: Millis) -> Vec<T> {
        let mut due = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].due_at <= now {
                due.push(self.pending.swap_remove(index));
            } else {
                index += 1;
            }
        }
        due.sort_by_key(|scheduled| (scheduled.due_at, scheduled.seq));
        due.into_iter().map(|scheduled| scheduled.task).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn count_matching(&self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        self.pending
            .iter()
            .filter(|scheduled| predicate(&scheduled.task))
            .count()
    }

    /// Earliest time at which something becomes due.
    pub fn next_due(&self) -> Option<Millis> {
        self.pending.iter().map(|scheduled| scheduled.due_at).min()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

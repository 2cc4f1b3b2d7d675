//! Timed one-shot tasks
//!
//! Delayed effects (freezes, overlay stages, respawn countdowns) are queued
//! here instead of being left to fire whenever a host timer gets around to
//! it. Tasks come back out in due-time order, ties in insertion order, and a
//! session reset drops every pending task with [`Scheduler::clear`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Handle returned by [`Scheduler::schedule_at`], used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(u64);

/// Queue of tasks keyed by due time (ms)
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    tasks: BTreeMap<(u64, TaskId), T>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Queue `task` to fire at absolute time `due_ms`
    pub fn schedule_at(&mut self, due_ms: u64, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.insert((due_ms, id), task);
        id
    }

    /// Queue `task` to fire `delay_ms` after `now_ms`
    pub fn schedule_in(&mut self, now_ms: u64, delay_ms: u64, task: T) -> TaskId {
        self.schedule_at(now_ms.saturating_add(delay_ms), task)
    }

    /// Drop a pending task. Returns it if it had not fired yet.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let key = self.tasks.keys().find(|(_, tid)| *tid == id).copied()?;
        self.tasks.remove(&key)
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<u64> {
        self.tasks.keys().next().map(|(due, _)| *due)
    }

    /// Remove and return the earliest task due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, T)> {
        let due = self.next_due()?;
        if due > now_ms {
            return None;
        }
        self.tasks.pop_first().map(|((due, _), task)| (due, task))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_orders_by_time_then_insertion() {
        let mut sched = Scheduler::new();
        sched.schedule_at(300, "late");
        sched.schedule_at(100, "first");
        sched.schedule_at(100, "second");

        assert_eq!(sched.pop_due(50), None);
        assert_eq!(sched.pop_due(100), Some((100, "first")));
        assert_eq!(sched.pop_due(100), Some((100, "second")));
        assert_eq!(sched.pop_due(299), None);
        assert_eq!(sched.pop_due(1000), Some((300, "late")));
        assert!(sched.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut sched = Scheduler::new();
        let a = sched.schedule_in(0, 10, 'a');
        let b = sched.schedule_in(0, 20, 'b');
        assert_eq!(sched.cancel(a), Some('a'));
        assert_eq!(sched.cancel(a), None);
        assert_eq!(sched.len(), 1);
        assert_eq!(sched.pop_due(100), Some((20, 'b')));
        assert_eq!(sched.cancel(b), None);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut sched = Scheduler::new();
        for i in 0..5 {
            sched.schedule_in(1000, i * 100, i);
        }
        assert_eq!(sched.next_due(), Some(1000));
        sched.clear();
        assert_eq!(sched.next_due(), None);
        assert_eq!(sched.pop_due(u64::MAX), None);
    }
}

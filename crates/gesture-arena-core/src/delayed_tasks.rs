//! Single-threaded queue of delayed, cancellable tasks.
//!
//! Scheduling hands back a [`TimerToken`]. Cancelling with that token removes
//! the task; owners that keep the token can also compare it when the task
//! fires, so a firing that outlived its owner's state is recognisably stale.
//!
//! The queue does not run anything by itself. The owner calls
//! [`DelayedTaskQueue::take_due`] from its own pump (pointer input, frame
//! tick) and routes the payloads.

use smallvec::SmallVec;

/// Handle identifying one scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn raw(self) -> u64 {
        self.0
    }
}

struct ScheduledTask<T> {
    token: TimerToken,
    deadline_millis: u64,
    payload: T,
}

/// A task whose deadline has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct DueTask<T> {
    pub token: TimerToken,
    pub deadline_millis: u64,
    pub payload: T,
}

pub struct DelayedTaskQueue<T> {
    next_token: u64,
    tasks: SmallVec<[ScheduledTask<T>; 4]>,
}

impl<T> Default for DelayedTaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DelayedTaskQueue<T> {
    pub fn new() -> Self {
        Self {
            next_token: 1,
            tasks: SmallVec::new(),
        }
    }

    /// Schedules `payload` to become due at `deadline_millis`.
    pub fn schedule_at(&mut self, deadline_millis: u64, payload: T) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.tasks.push(ScheduledTask {
            token,
            deadline_millis,
            payload,
        });
        token
    }

    /// Schedules `payload` to become due `delay_millis` after `now_millis`.
    pub fn schedule_after(&mut self, now_millis: u64, delay_millis: u64, payload: T) -> TimerToken {
        self.schedule_at(now_millis.saturating_add(delay_millis), payload)
    }

    /// Removes the task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        match self.tasks.iter().position(|task| task.token == token) {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.tasks.iter().any(|task| task.token == token)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.tasks.iter().map(|task| task.deadline_millis).min()
    }

    /// Removes and returns every task due at `now_millis`, ordered by
    /// deadline and then by scheduling order.
    pub fn take_due(&mut self, now_millis: u64) -> Vec<DueTask<T>> {
        let mut due = Vec::new();
        let mut index = 0;
        while index < self.tasks.len() {
            if self.tasks[index].deadline_millis <= now_millis {
                let task = self.tasks.remove(index);
                due.push(DueTask {
                    token: task.token,
                    deadline_millis: task.deadline_millis,
                    payload: task.payload,
                });
            } else {
                index += 1;
            }
        }
        due.sort_by_key(|task| (task.deadline_millis, task.token));
        if !due.is_empty() {
            log::trace!("{} delayed task(s) due at {now_millis}", due.len());
        }
        due
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_tasks_come_out_in_deadline_order() {
        let mut queue = DelayedTaskQueue::new();
        queue.schedule_at(30, "late");
        queue.schedule_at(10, "early");
        queue.schedule_at(10, "early-second");
        queue.schedule_at(100, "future");

        let due: Vec<_> = queue.take_due(30).into_iter().map(|t| t.payload).collect();
        assert_eq!(due, vec!["early", "early-second", "late"]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_deadline(), Some(100));
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut queue = DelayedTaskQueue::new();
        let token = queue.schedule_after(0, 500, 1u32);
        assert!(queue.is_pending(token));
        assert!(queue.cancel(token));
        assert!(!queue.cancel(token));
        assert!(queue.take_due(1_000).is_empty());
    }

    #[test]
    fn tokens_are_unique_across_reuse() {
        let mut queue = DelayedTaskQueue::new();
        let first = queue.schedule_after(0, 5, ());
        queue.take_due(5);
        let second = queue.schedule_after(0, 5, ());
        assert_ne!(first, second);
        assert!(second.raw() > first.raw());
    }

    #[test]
    fn nothing_due_before_deadline() {
        let mut queue = DelayedTaskQueue::new();
        queue.schedule_after(100, 500, ());
        assert!(queue.take_due(599).is_empty());
        assert_eq!(queue.take_due(600).len(), 1);
        assert!(queue.is_empty());
    }
}

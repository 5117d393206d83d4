//! Cooperative timer queue driving the widget's delayed actions.
//!
//! The widget never sleeps. Delayed work (typing indicator, bot replies,
//! quick replies, panel animation settling) is queued here as plain action
//! values on a virtual clock that the host advances from its event loop.
//! Firing is strictly ordered by `(due, insertion order)`.
//!
//! Every entry belongs to a [`TaskGroup`]. Cancelling a group drops all of
//! its pending entries at once, which is how a newer reply sequence
//! invalidates the callbacks of an older one.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

/// Handle for a set of related timers (one reply sequence, one transition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskGroup(u64);

impl TaskGroup {
    pub fn epoch(&self) -> u64 {
        self.0
    }
}

struct TimerEntry<A> {
    due: Duration,
    seq: u64,
    group: TaskGroup,
    action: A,
}

impl<A> PartialEq for TimerEntry<A> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<A> Eq for TimerEntry<A> {}

impl<A> PartialOrd for TimerEntry<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for TimerEntry<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A timer that has come due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<A> {
    pub at: Duration,
    pub group: TaskGroup,
    pub action: A,
}

/// Virtual-clock timer queue
pub struct Scheduler<A> {
    now: Duration,
    next_seq: u64,
    next_group: u64,
    queue: BinaryHeap<Reverse<TimerEntry<A>>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            next_group: 1,
            queue: BinaryHeap::new(),
        }
    }

    /// Current virtual time (elapsed since the scheduler was created)
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Allocate a fresh group; epochs increase monotonically
    pub fn new_group(&mut self) -> TaskGroup {
        let group = TaskGroup(self.next_group);
        self.next_group += 1;
        group
    }

    /// Queue `action` to fire `delay` after the current time. Deadlines past
    /// the end of the clock clamp to `Duration::MAX`.
    pub fn schedule(&mut self, group: TaskGroup, delay: Duration, action: A) {
        let entry = TimerEntry {
            due: self.now.saturating_add(delay),
            seq: self.next_seq,
            group,
            action,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(entry));
    }

    /// Drop every pending timer in `group`, returning how many were removed
    pub fn cancel_group(&mut self, group: TaskGroup) -> usize {
        let before = self.queue.len();
        self.queue.retain(|Reverse(entry)| entry.group != group);
        before - self.queue.len()
    }

    /// Drop every pending timer
    pub fn cancel_all(&mut self) -> usize {
        let count = self.queue.len();
        self.queue.clear();
        count
    }

    /// Whether any timer of `group` is still pending
    pub fn has_pending(&self, group: TaskGroup) -> bool {
        self.queue.iter().any(|Reverse(entry)| entry.group == group)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Time at which the earliest pending timer fires
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(entry)| entry.due)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its due time. Timers scheduled while handling the result are visible
    /// to the next call, so a chain of follow-ups inside the window fires in
    /// the same advance.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<A>> {
        let due = self.next_due()?;
        if due > until {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        Some(Fired {
            at: entry.due,
            group: entry.group,
            action: entry.action,
        })
    }

    /// Move the clock forward to `until` once all due timers were handled
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Fire everything due within `delta` without a handler that could
    /// schedule follow-ups; returns the fired actions in order
    pub fn advance(&mut self, delta: Duration) -> Vec<Fired<A>> {
        self.advance_to(self.now.saturating_add(delta))
    }

    /// Like [`advance`](Self::advance) with an absolute deadline. A deadline
    /// in the past fires nothing and leaves the clock alone.
    pub fn advance_to(&mut self, until: Duration) -> Vec<Fired<A>> {
        let mut fired = Vec::new();
        while let Some(f) = self.pop_due(until) {
            fired.push(f);
        }
        self.settle(until);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut sched = Scheduler::new();
        let g = sched.new_group();
        sched.schedule(g, ms(300), "c");
        sched.schedule(g, ms(100), "a");
        sched.schedule(g, ms(200), "b");

        let fired: Vec<_> = sched.advance(ms(1000)).into_iter().map(|f| f.action).collect();
        assert_eq!(fired, vec!["a", "b", "c"]);
        assert!(sched.is_idle());
        assert_eq!(sched.now(), ms(1000));
    }

    #[test]
    fn test_ties_fire_in_insertion_order() {
        let mut sched = Scheduler::new();
        let g = sched.new_group();
        sched.schedule(g, ms(50), 1);
        sched.schedule(g, ms(50), 2);
        sched.schedule(g, ms(50), 3);
        let fired: Vec<_> = sched.advance(ms(50)).into_iter().map(|f| f.action).collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_partial_advance_leaves_future_timers() {
        let mut sched = Scheduler::new();
        let g = sched.new_group();
        sched.schedule(g, ms(400), "typing");
        sched.schedule(g, ms(1900), "reply");

        assert_eq!(sched.advance(ms(399)).len(), 0);
        assert_eq!(sched.advance(ms(1)).len(), 1);
        assert_eq!(sched.next_due(), Some(ms(1900)));
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn test_cancel_group_only_affects_that_group() {
        let mut sched = Scheduler::new();
        let old = sched.new_group();
        let new = sched.new_group();
        assert!(new.epoch() > old.epoch());

        sched.schedule(old, ms(10), "stale");
        sched.schedule(old, ms(20), "stale");
        sched.schedule(new, ms(15), "fresh");

        assert_eq!(sched.cancel_group(old), 2);
        assert!(!sched.has_pending(old));
        assert!(sched.has_pending(new));
        let fired: Vec<_> = sched.advance(ms(100)).into_iter().map(|f| f.action).collect();
        assert_eq!(fired, vec!["fresh"]);
    }

    #[test]
    fn test_follow_ups_scheduled_during_handling_fire_in_same_window() {
        let mut sched = Scheduler::new();
        let g = sched.new_group();
        sched.schedule(g, ms(100), 1u32);

        let until = ms(1000);
        let mut seen = Vec::new();
        while let Some(fired) = sched.pop_due(until) {
            seen.push((fired.action, fired.at));
            if fired.action < 3 {
                // Relative to the firing time, not the window end
                sched.schedule(g, ms(100), fired.action + 1);
            }
        }
        sched.settle(until);

        assert_eq!(seen, vec![(1, ms(100)), (2, ms(200)), (3, ms(300))]);
        assert_eq!(sched.now(), until);
    }

    #[test]
    fn test_advance_to_past_deadline_is_noop() {
        let mut sched = Scheduler::new();
        let g = sched.new_group();
        sched.schedule(g, ms(500), "later");
        sched.advance_to(ms(200));
        assert_eq!(sched.now(), ms(200));

        assert!(sched.advance_to(ms(100)).is_empty());
        assert_eq!(sched.now(), ms(200));
        assert_eq!(sched.advance_to(ms(500)).len(), 1);
    }

    #[test]
    fn test_cancel_all() {
        let mut sched = Scheduler::new();
        let g = sched.new_group();
        sched.schedule(g, ms(1), ());
        sched.schedule(g, ms(2), ());
        assert_eq!(sched.cancel_all(), 2);
        assert!(sched.is_idle());
        assert_eq!(sched.next_due(), None);
    }

    #[test]
    fn test_clock_saturates_instead_of_overflowing() {
        let mut sched = Scheduler::new();
        let g = sched.new_group();
        sched.schedule(g, ms(100), "soon");
        sched.advance(ms(10));

        let fired = sched.advance(Duration::MAX);
        assert_eq!(fired.len(), 1);
        assert_eq!(sched.now(), Duration::MAX);

        // Scheduling at the end of the clock clamps the deadline
        sched.schedule(g, ms(1), "never late");
        assert_eq!(sched.next_due(), Some(Duration::MAX));
        assert_eq!(sched.advance(ms(1)).len(), 1);
    }
}

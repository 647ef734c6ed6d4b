//! Virtual-time timer queue.
//!
//! Each controller owns exactly one `Scheduler`. Timers carry plain-data
//! actions instead of closures: the owner pops due actions with
//! [`Scheduler::pop_due`] and interprets them itself. Once a timer has been
//! removed from the queue nothing can ever fire it, so cancelling is just
//! removal.
//!
//! ## Ordering
//!
//! Due timers come out in non-decreasing due-time order. Timers due at the
//! same instant come out in creation order; a repeating timer keeps its
//! original id across re-arms, so it keeps its place in that order.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timers = Scheduler::new();
//! timers.schedule_repeating(1000, Action::Tick);
//! while let Some(fired) = timers.pop_due(now_ms) {
//!     handle(fired.action);
//! }
//! timers.advance_clock(now_ms);
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

/// Handle for a scheduled timer, unique within one scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<A> {
    pub id: TimerId,
    /// Virtual time the timer was due at.
    pub at_ms: u64,
    pub action: A,
}

#[derive(Debug, Clone)]
struct Pending<A> {
    id: TimerId,
    due_ms: u64,
    period_ms: Option<u64>,
    action: A,
}

impl<A> PartialEq for Pending<A> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.id == other.id
    }
}

impl<A> Eq for Pending<A> {}

impl<A> PartialOrd for Pending<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Pending<A> {
    // Reversed so the max-heap yields the earliest (due, id) first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Single-threaded timer queue over caller-driven virtual milliseconds.
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    now_ms: u64,
    next_id: u64,
    queue: BinaryHeap<Pending<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            queue: BinaryHeap::new(),
        }
    }
}

impl<A: Clone> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Current virtual time.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Due time of the earliest pending timer.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.queue.peek().map(|p| p.due_ms)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Fire `action` once, `delay_ms` after the current virtual time.
    pub fn schedule(&mut self, delay_ms: u64, action: A) -> TimerId {
        self.push(delay_ms, None, action)
    }

    /// Fire `action` every `period_ms`, first after one period.
    ///
    /// A zero period is treated as one millisecond so the queue always
    /// makes progress.
    pub fn schedule_repeating(&mut self, period_ms: u64, action: A) -> TimerId {
        let period = period_ms.max(1);
        self.push(period, Some(period), action)
    }

    /// Cancel one timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|p| p.id != id);
        self.queue.len() != before
    }

    /// Cancel every pending timer at once. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    /// Pop the earliest timer due at or before `until_ms`.
    ///
    /// Moves the virtual clock to the timer's due time. Repeating timers are
    /// re-armed one period later before being returned, so the owner may
    /// still cancel them while handling the action.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired<A>> {
        if self.queue.peek()?.due_ms > until_ms {
            return None;
        }
        let pending = self.queue.pop()?;
        self.now_ms = self.now_ms.max(pending.due_ms);

        if let Some(period) = pending.period_ms {
            self.queue.push(Pending {
                id: pending.id,
                due_ms: pending.due_ms.saturating_add(period),
                period_ms: Some(period),
                action: pending.action.clone(),
            });
        }

        Some(Fired {
            id: pending.id,
            at_ms: pending.due_ms,
            action: pending.action,
        })
    }

    /// Move the virtual clock forward. Never moves it backwards.
    pub fn advance_clock(&mut self, to_ms: u64) {
        self.now_ms = self.now_ms.max(to_ms);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn push(&mut self, delay_ms: u64, period_ms: Option<u64>, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.push(Pending {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms),
            period_ms,
            action,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
        let mut out = Vec::new();
        while let Some(f) = s.pop_due(until) {
            out.push((f.at_ms, f.action));
        }
        s.advance_clock(until);
        out
    }

    #[test]
    fn fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(300, "c");
        s.schedule(100, "a");
        s.schedule(200, "b");
        assert_eq!(drain(&mut s, 1000), vec![(100, "a"), (200, "b"), (300, "c")]);
        assert!(s.is_idle());
    }

    #[test]
    fn ties_fire_in_creation_order() {
        let mut s = Scheduler::new();
        s.schedule(50, "first");
        s.schedule(50, "second");
        s.schedule(50, "third");
        let fired: Vec<_> = drain(&mut s, 50).into_iter().map(|(_, a)| a).collect();
        assert_eq!(fired, vec!["first", "second", "third"]);
    }

    #[test]
    fn repeating_timers_keep_their_place_at_ties() {
        let mut s = Scheduler::new();
        s.schedule_repeating(4, "phase");
        s.schedule_repeating(1, "tick");
        let at_eight: Vec<_> = drain(&mut s, 8)
            .into_iter()
            .filter(|(t, _)| *t == 8)
            .map(|(_, a)| a)
            .collect();
        assert_eq!(at_eight, vec!["phase", "tick"]);
    }

    #[test]
    fn nothing_fires_before_its_time() {
        let mut s = Scheduler::new();
        s.schedule(500, "late");
        assert!(drain(&mut s, 499).is_empty());
        assert_eq!(s.now_ms(), 499);
        assert_eq!(drain(&mut s, 500), vec![(500, "late")]);
    }

    #[test]
    fn cancel_removes_single_timer() {
        let mut s = Scheduler::new();
        let a = s.schedule(10, "a");
        s.schedule(20, "b");
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert_eq!(drain(&mut s, 100), vec![(20, "b")]);
    }

    #[test]
    fn cancel_all_drops_repeating_timers_too() {
        let mut s = Scheduler::new();
        s.schedule_repeating(1000, "tick");
        s.schedule(2500, "once");
        assert_eq!(s.cancel_all(), 2);
        assert!(drain(&mut s, 60_000).is_empty());
    }

    #[test]
    fn delays_are_relative_to_virtual_now() {
        let mut s = Scheduler::new();
        s.advance_clock(1_000);
        s.schedule(250, "x");
        assert_eq!(s.next_due_ms(), Some(1_250));
        s.advance_clock(10);
        assert_eq!(s.now_ms(), 1_000);
    }

    #[test]
    fn zero_period_still_progresses() {
        let mut s = Scheduler::new();
        s.schedule_repeating(0, "spin");
        assert_eq!(drain(&mut s, 3).len(), 3);
    }
}

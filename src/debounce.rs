//! Rearmable one-shot deadlines for the control context.

use embassy_time::Instant;
use heapless::Vec;

/// Sorted list of `(deadline, action)` pairs, one entry per action.
///
/// Rearming an action replaces its pending deadline. The owner polls
/// [`TimerQueue::pop_due`] from its own loop; a popped action stays idle until
/// rearmed, so each armed period fires exactly once.
#[derive(Debug, Clone)]
pub struct TimerQueue<A, const N: usize> {
    entries: Vec<(Instant, A), N>,
}

impl<A: Copy + PartialEq, const N: usize> TimerQueue<A, N> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Arm `action` to fire at `deadline`, dropping any earlier arming.
    pub fn rearm(&mut self, action: A, deadline: Instant) {
        self.cancel(action);
        let index = self
            .entries
            .iter()
            .position(|(at, _)| *at > deadline)
            .unwrap_or(self.entries.len());
        if self.entries.insert(index, (deadline, action)).is_err() {
            log::warn!("debounce: timer queue full, dropping deadline");
        }
    }

    pub fn cancel(&mut self, action: A) {
        self.entries.retain(|(_, pending)| *pending != action);
    }

    /// Remove and return the earliest action due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<A> {
        let (deadline, _) = self.entries.first()?;
        if *deadline > now {
            return None;
        }
        Some(self.entries.remove(0).1)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.first().map(|(deadline, _)| *deadline)
    }

    pub fn deadline_of(&self, action: A) -> Option<Instant> {
        self.entries
            .iter()
            .find(|(_, pending)| *pending == action)
            .map(|(deadline, _)| *deadline)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: Copy + PartialEq, const N: usize> Default for TimerQueue<A, N> {
    fn default() -> Self {
        Self::new()
    }
}

#![forbid(unsafe_code)]

//! Deterministic timer queue.
//!
//! Time only moves when a test says so. Timers due at the same instant
//! fire in the order they were scheduled.

use std::collections::BTreeMap;

use collapse_core::{CompletionToken, TimerId};
use web_time::Duration;

/// Virtual clock with a queue of pending completion timers.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<(Duration, u64), CompletionToken>,
}

impl VirtualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the clock was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `token` to fire `delay` from now.
    pub fn schedule(&mut self, delay: Duration, token: CompletionToken) -> TimerId {
        self.next_id += 1;
        self.timers.insert((self.now + delay, self.next_id), token);
        TimerId(self.next_id)
    }

    /// Cancel a timer. Returns `false` if it already fired or never existed.
    pub fn cancel(&mut self, timer: TimerId) -> bool {
        let key = self.timers.keys().find(|(_, id)| *id == timer.0).copied();
        key.is_some_and(|k| self.timers.remove(&k).is_some())
    }

    /// Number of timers still pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.keys().next().map(|(due, _)| *due)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<CompletionToken> {
        let (&(due, id), _) = self.timers.iter().next()?;
        if due > until {
            return None;
        }
        self.now = self.now.max(due);
        self.timers.remove(&(due, id))
    }

    /// Move the clock forward to `until` (never backwards).
    pub fn set_now(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

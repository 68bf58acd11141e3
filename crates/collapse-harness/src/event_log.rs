#![forbid(unsafe_code)]

//! Recorded lifecycle events.
//!
//! Every `emit` on a [`FakeDocument`](crate::FakeDocument) lands here with
//! the virtual time it happened at. [`EventLog::to_jsonl`] renders one JSON
//! object per line for attaching to failing test output.

use collapse_core::{CollapseEvent, ElementId};
use serde::Serialize;
use web_time::Duration;

/// One emitted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedEvent {
    /// Virtual time in milliseconds.
    pub at_ms: u64,
    pub panel: String,
    /// Event wire name, e.g. `shown.collapse`.
    pub event: &'static str,
    /// A listener cancelled it.
    pub prevented: bool,
}

impl LoggedEvent {
    #[must_use]
    pub fn is(&self, panel: &str, event: CollapseEvent) -> bool {
        self.panel == panel && self.event == event.name()
    }
}

/// Append-only event record.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<LoggedEvent>,
}

impl EventLog {
    pub(crate) fn record(
        &mut self,
        at: Duration,
        panel: &ElementId,
        event: CollapseEvent,
        prevented: bool,
    ) {
        self.entries.push(LoggedEvent {
            at_ms: u64::try_from(at.as_millis()).unwrap_or(u64::MAX),
            panel: panel.as_str().to_string(),
            event: event.name(),
            prevented,
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[LoggedEvent] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times `event` was emitted on `panel`.
    #[must_use]
    pub fn count(&self, panel: &str, event: CollapseEvent) -> usize {
        self.entries.iter().filter(|e| e.is(panel, event)).count()
    }

    /// Event names emitted on `panel`, in order.
    #[must_use]
    pub fn names_for(&self, panel: &str) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|e| e.panel == panel)
            .map(|e| e.event)
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// One JSON object per line.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        self.entries
            .iter()
            .filter_map(|e| serde_json::to_string(e).ok())
            .map(|line| line + "\n")
            .collect()
    }
}

#![forbid(unsafe_code)]

//! One-shot completion signal for a single transition.
//!
//! A transition can be finished by two independent sources: the host's
//! native transition-end notification and a fallback timer scheduled for
//! [`TRANSITION_DURATION`]. Whichever arrives first settles the transition;
//! the driver then cancels the other source. A late or duplicate delivery
//! carries a stale sequence number and is dropped.
//!
//! Hosts without transition support finish synchronously with
//! [`CompletionSource::Immediate`].

use std::fmt;

use web_time::Duration;

use crate::host::{ElementId, TimerId};

/// Fallback delay after which a transition is considered finished.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(350);

/// Direction of the transition a completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Show,
    Hide,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Hide => "hide",
        }
    }
}

/// What settled a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompletionSource {
    /// The host reported the end of the visual transition.
    TransitionEnd,
    /// The fallback timer expired first.
    Timeout,
    /// The host has no transition support.
    Immediate,
}

impl CompletionSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TransitionEnd => "transition_end",
            Self::Timeout => "timeout",
            Self::Immediate => "immediate",
        }
    }
}

impl fmt::Display for CompletionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one transition of one panel.
///
/// Handed to the host with the fallback timer and returned through
/// [`Collapse::timer_fired`](crate::Collapse::timer_fired).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompletionToken {
    panel: ElementId,
    seq: u64,
}

impl CompletionToken {
    pub(crate) fn new(panel: ElementId, seq: u64) -> Self {
        Self { panel, seq }
    }

    #[must_use]
    pub fn panel(&self) -> &ElementId {
        &self.panel
    }

    /// Registry-wide sequence number of the transition.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }
}

/// Armed completion of an in-flight transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingCompletion {
    pub(crate) seq: u64,
    pub(crate) phase: Phase,
    pub(crate) timer: TimerId,
}

impl PendingCompletion {
    /// Whether `token` refers to this completion.
    pub(crate) fn matches(&self, token: &CompletionToken) -> bool {
        self.seq == token.seq
    }
}

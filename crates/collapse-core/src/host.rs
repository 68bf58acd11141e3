#![forbid(unsafe_code)]

//! Collaborator traits.
//!
//! The core never touches a document directly. A host (a DOM binding, a
//! terminal widget tree, or the in-memory fake used by tests) implements the
//! four capability traits below and passes itself into every [`Collapse`]
//! call as `&mut H`.
//!
//! | Trait                 | Capability                                        |
//! |-----------------------|---------------------------------------------------|
//! | [`Surface`]           | classes, attributes, size read/write on one axis  |
//! | [`LifecycleEvents`]   | cancelable lifecycle notifications                |
//! | [`TransitionSupport`] | transition-end notification and a timer primitive |
//! | [`TriggerDirectory`]  | trigger discovery and target lookup               |
//!
//! [`Collapse`]: crate::Collapse

use std::fmt;

use web_time::Duration;

use crate::completion::CompletionToken;
use crate::group::GroupScope;
use crate::panel::Dimension;
use crate::trigger::TargetRef;

/// Stable identity of an element (a panel or a trigger).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(String);

impl ElementId {
    /// Create an element id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Explicit size applied to an element along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeOverride {
    /// No override; the element takes its natural size.
    Auto,
    /// Fixed size in host units.
    Px(f32),
}

/// Element primitives the transition driver reads and mutates.
pub trait Surface {
    /// Whether `el` carries `class`.
    fn has_class(&self, el: &ElementId, class: &str) -> bool;

    /// Add `class` to `el`. Adding a present class is a no-op.
    fn add_class(&mut self, el: &ElementId, class: &str);

    /// Remove `class` from `el`. Removing an absent class is a no-op.
    fn remove_class(&mut self, el: &ElementId, class: &str);

    /// Read an attribute.
    fn attribute(&self, el: &ElementId, name: &str) -> Option<String>;

    /// Write an attribute.
    fn set_attribute(&mut self, el: &ElementId, name: &str, value: &str);

    /// Currently rendered size of `el` along `dim`.
    fn size(&self, el: &ElementId, dim: Dimension) -> f32;

    /// Natural (content) size of `el` along `dim`.
    fn scroll_size(&self, el: &ElementId, dim: Dimension) -> f32;

    /// Apply or clear an explicit size along `dim`.
    fn set_size(&mut self, el: &ElementId, dim: Dimension, size: SizeOverride);

    /// Force the host to commit pending style changes on `el`.
    ///
    /// Called after fixing an explicit starting size so the following
    /// change animates from it.
    fn reflow(&mut self, _el: &ElementId) {}
}

/// Lifecycle notifications emitted on a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollapseEvent {
    /// Before an expansion starts. Cancelable.
    ShowRequested,
    /// After an expansion completed.
    Shown,
    /// Before a collapse starts. Cancelable.
    HideRequested,
    /// After a collapse completed.
    Hidden,
}

impl CollapseEvent {
    /// Wire name of the event.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ShowRequested => "show.collapse",
            Self::Shown => "shown.collapse",
            Self::HideRequested => "hide.collapse",
            Self::Hidden => "hidden.collapse",
        }
    }

    /// Whether a listener may cancel the operation this event announces.
    #[must_use]
    pub const fn is_cancelable(self) -> bool {
        matches!(self, Self::ShowRequested | Self::HideRequested)
    }
}

impl fmt::Display for CollapseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Listener verdict for an emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventDisposition {
    /// Let the operation continue.
    #[default]
    Proceed,
    /// A listener called the equivalent of `preventDefault`.
    Prevented,
}

impl EventDisposition {
    /// True when a listener prevented the default action.
    #[must_use]
    pub const fn is_prevented(self) -> bool {
        matches!(self, Self::Prevented)
    }
}

/// Cancelable event emission.
pub trait LifecycleEvents {
    /// Dispatch `event` on `panel`.
    ///
    /// The verdict is only honored for cancelable events.
    fn emit(&mut self, panel: &ElementId, event: CollapseEvent) -> EventDisposition;
}

/// Handle for a scheduled fallback timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerId(pub u64);

/// Transition-completion notification and a timer primitive.
///
/// The host delivers completions back into the registry:
/// a native transition end goes to [`Collapse::transition_ended`], an
/// expired timer goes to [`Collapse::timer_fired`] with the token it was
/// scheduled with.
///
/// [`Collapse::transition_ended`]: crate::Collapse::transition_ended
/// [`Collapse::timer_fired`]: crate::Collapse::timer_fired
pub trait TransitionSupport {
    /// Whether the host can report transition completion at all.
    ///
    /// When false, every transition completes synchronously.
    fn supports_transitions(&self) -> bool;

    /// Start listening for the next transition end on `panel`.
    fn watch_transition_end(&mut self, _panel: &ElementId) {}

    /// Stop listening for transition ends on `panel`.
    fn unwatch_transition_end(&mut self, _panel: &ElementId) {}

    /// Schedule `token` to be handed back after `delay`.
    fn set_timeout(&mut self, delay: Duration, token: CompletionToken) -> TimerId;

    /// Cancel a scheduled timer. Unknown ids are ignored.
    fn clear_timeout(&mut self, timer: TimerId);
}

/// Trigger discovery and target lookup.
pub trait TriggerDirectory {
    /// Triggers whose target reference names `panel`.
    fn triggers_for(&self, panel: &ElementId) -> Vec<ElementId>;

    /// Triggers inside `scope` that declare `scope` as their group.
    fn group_triggers(&self, scope: &GroupScope) -> Vec<ElementId>;

    /// Collapsible panels that are direct members of `scope`.
    ///
    /// Panels of nested groups must not be returned.
    fn group_members(&self, scope: &GroupScope) -> Vec<ElementId>;

    /// Resolve a target reference to a panel, if one matches.
    fn resolve(&self, target: &TargetRef) -> Option<ElementId>;
}

/// Everything the driver needs from its environment.
pub trait Host: Surface + LifecycleEvents + TransitionSupport + TriggerDirectory {}

impl<T> Host for T where T: Surface + LifecycleEvents + TransitionSupport + TriggerDirectory {}

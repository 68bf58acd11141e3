#![forbid(unsafe_code)]

//! Panel data model.
//!
//! A [`PanelState`] is created when a controller is attached to an element
//! and dropped when it is detached. Only the transition driver mutates it.
//!
//! # Invariants
//!
//! 1. Exactly one [`LifecycleState`] at any time.
//! 2. `is_transitioning()` is true exactly while the state is `Expanding` or
//!    `Collapsing`, and a pending completion is armed for the whole interval
//!    when the host supports transitions.
//! 3. `dimension` never changes after construction.

use std::fmt;

use crate::completion::PendingCompletion;
use crate::group::GroupScope;
use crate::host::{ElementId, Surface};

/// Class marking a panel that animates its width instead of its height.
pub const WIDTH_MARKER_CLASS: &str = "width";

/// Surface class present on a panel at rest.
pub const CLASS_COLLAPSE: &str = "collapse";
/// Surface class present while a panel transitions.
pub const CLASS_COLLAPSING: &str = "collapsing";
/// Surface class present on an expanded panel.
pub const CLASS_IN: &str = "in";

/// The single geometric property animated during a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dimension {
    /// Animate horizontally.
    Width,
    /// Animate vertically.
    #[default]
    Height,
}

impl Dimension {
    /// Derive the axis from the element's style marker.
    #[must_use]
    pub fn of(surface: &(impl Surface + ?Sized), el: &ElementId) -> Self {
        if surface.has_class(el, WIDTH_MARKER_CLASS) {
            Self::Width
        } else {
            Self::Height
        }
    }

    /// Lowercase axis name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of one panel.
///
/// ```text
///   Collapsed --show--> Expanding --complete--> Expanded
///   Expanded  --hide--> Collapsing --complete--> Collapsed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifecycleState {
    #[default]
    Collapsed,
    Expanding,
    Expanded,
    Collapsing,
}

impl LifecycleState {
    /// Read the resting state of an element from its surface classes.
    ///
    /// An element without a controller is never mid-transition as far as the
    /// core is concerned, so only `in` is consulted.
    #[must_use]
    pub fn observe(surface: &(impl Surface + ?Sized), el: &ElementId) -> Self {
        if surface.has_class(el, CLASS_IN) {
            Self::Expanded
        } else {
            Self::Collapsed
        }
    }

    /// Mid-animation in either direction.
    #[must_use]
    pub const fn is_transitioning(self) -> bool {
        matches!(self, Self::Expanding | Self::Collapsing)
    }

    /// Counts as open for accordion purposes.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Expanded | Self::Expanding)
    }

    #[must_use]
    pub const fn is_expanded(self) -> bool {
        matches!(self, Self::Expanded)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collapsed => "collapsed",
            Self::Expanding => "expanding",
            Self::Expanded => "expanded",
            Self::Collapsing => "collapsing",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-panel record owned by [`Collapse`](crate::Collapse).
#[derive(Debug, Clone)]
pub struct PanelState {
    id: ElementId,
    dimension: Dimension,
    lifecycle: LifecycleState,
    group: Option<GroupScope>,
    auto_open_on_init: bool,
    triggers: Vec<ElementId>,
    pending: Option<PendingCompletion>,
}

impl PanelState {
    pub(crate) fn new(
        id: ElementId,
        dimension: Dimension,
        lifecycle: LifecycleState,
        group: Option<GroupScope>,
        auto_open_on_init: bool,
        triggers: Vec<ElementId>,
    ) -> Self {
        Self {
            id,
            dimension,
            lifecycle,
            group,
            auto_open_on_init,
            triggers,
            pending: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Axis animated by this panel.
    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[must_use]
    pub const fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    /// Re-entrancy guard: true for the whole show/hide interval.
    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        self.lifecycle.is_transitioning()
    }

    /// Group scope this panel is exclusive within, if any.
    #[must_use]
    pub fn group(&self) -> Option<&GroupScope> {
        self.group.as_ref()
    }

    /// Whether the panel toggled itself when it was attached.
    #[must_use]
    pub const fn auto_open_on_init(&self) -> bool {
        self.auto_open_on_init
    }

    /// Triggers discovered for this panel at attach time.
    #[must_use]
    pub fn triggers(&self) -> &[ElementId] {
        &self.triggers
    }

    pub(crate) fn pending(&self) -> Option<&PendingCompletion> {
        self.pending.as_ref()
    }

    pub(crate) fn set_lifecycle(&mut self, state: LifecycleState) {
        self.lifecycle = state;
    }

    pub(crate) fn arm(&mut self, pending: PendingCompletion) {
        self.pending = Some(pending);
    }

    pub(crate) fn disarm(&mut self) -> Option<PendingCompletion> {
        self.pending.take()
    }
}

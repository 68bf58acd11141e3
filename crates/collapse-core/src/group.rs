#![forbid(unsafe_code)]

//! Accordion groups: sibling discovery and the exclusivity rule.
//!
//! A group is not stored anywhere. Every `show` asks the host for the
//! direct members of the panel's scope and reads their current state, so a
//! member added or removed between calls is picked up without bookkeeping.
//!
//! # Known relaxation
//!
//! [`ExclusivityPolicy::OneOpen`] requests a `hide` on every open sibling and
//! then expands the new panel without waiting for those hides to finish.
//! For up to one [`TRANSITION_DURATION`](crate::TRANSITION_DURATION) two
//! members of the same group can be mid-transition at once. Once all
//! pending completions settle at most one member is open.

use std::fmt;

use ahash::AHashMap;

use crate::error::CollapseError;
use crate::host::{ElementId, Host};
use crate::panel::{LifecycleState, PanelState};

/// Selector naming the parent context of an accordion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GroupScope(String);

impl GroupScope {
    /// Parse a scope selector. Surrounding whitespace is trimmed.
    pub fn parse(selector: &str) -> Result<Self, CollapseError> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(CollapseError::EmptyScope);
        }
        Ok(Self(selector.to_string()))
    }

    #[must_use]
    pub fn selector(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An open member of a group, as seen when a sibling asks to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSibling {
    pub id: ElementId,
    pub state: LifecycleState,
    /// Whether a controller is attached to the sibling.
    pub attached: bool,
}

impl ActiveSibling {
    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        self.attached && self.state.is_transitioning()
    }
}

/// Verdict of an [`ExclusivityPolicy`] for a pending `show`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Open the panel after requesting `hide` on these siblings.
    Proceed { close: Vec<ElementId> },
    /// A sibling is mid-transition; the `show` is dropped.
    Blocked { by: ElementId },
}

/// Whether two members of one group may be open together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusivityPolicy {
    /// No group: panels open and close independently.
    Independent,
    /// At most one member open, enforced opportunistically.
    OneOpen,
}

impl ExclusivityPolicy {
    /// Policy implied by a panel's group scope.
    #[must_use]
    pub const fn for_scope(scope: Option<&GroupScope>) -> Self {
        match scope {
            Some(_) => Self::OneOpen,
            None => Self::Independent,
        }
    }

    /// Decide whether a panel may open given its open siblings.
    #[must_use]
    pub fn admit(self, siblings: &[ActiveSibling]) -> Admission {
        match self {
            Self::Independent => Admission::Proceed { close: Vec::new() },
            Self::OneOpen => {
                if let Some(busy) = siblings.iter().find(|s| s.is_transitioning()) {
                    return Admission::Blocked {
                        by: busy.id.clone(),
                    };
                }
                Admission::Proceed {
                    close: siblings.iter().map(|s| s.id.clone()).collect(),
                }
            }
        }
    }
}

/// Finds open siblings within a scope.
///
/// Attached panels report their registry state; members without a
/// controller are read from their surface classes.
#[derive(Debug, Clone, Copy)]
pub struct GroupCoordinator<'a> {
    panels: &'a AHashMap<ElementId, PanelState>,
}

impl<'a> GroupCoordinator<'a> {
    #[must_use]
    pub fn new(panels: &'a AHashMap<ElementId, PanelState>) -> Self {
        Self { panels }
    }

    /// Current state of any element, attached or not.
    #[must_use]
    pub fn state_of<H: Host + ?Sized>(&self, host: &H, id: &ElementId) -> LifecycleState {
        self.panels
            .get(id)
            .map_or_else(|| LifecycleState::observe(host, id), PanelState::lifecycle)
    }

    /// Direct members of `scope`, other than `exclude`, that are
    /// `Expanded` or `Expanding`.
    pub fn active_siblings<H: Host + ?Sized>(
        &self,
        host: &H,
        scope: &GroupScope,
        exclude: &ElementId,
    ) -> Vec<ActiveSibling> {
        host.group_members(scope)
            .into_iter()
            .filter(|id| id != exclude)
            .filter_map(|id| {
                let state = self.state_of(host, &id);
                state.is_open().then(|| ActiveSibling {
                    attached: self.panels.contains_key(&id),
                    id,
                    state,
                })
            })
            .collect()
    }
}

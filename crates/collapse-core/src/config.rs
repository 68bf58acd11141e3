#![forbid(unsafe_code)]

//! Construction-time configuration.
//!
//! ```rust,ignore
//! let config = CollapseConfig::default()
//!     .toggle(false)
//!     .parent(GroupScope::parse("#accordion")?);
//! ```
//!
//! # Defaults
//!
//! | Field    | Default | Effect                                           |
//! |----------|---------|--------------------------------------------------|
//! | `toggle` | `true`  | call `toggle()` once right after attaching       |
//! | `parent` | `None`  | no accordion; indicators synced for this panel   |
//!
//! Element data attributes (`data-toggle`, `data-parent`) map onto the same
//! fields through [`CollapseConfig::from_data`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::CollapseError;
use crate::group::GroupScope;

/// Data attribute carrying the toggle-on-init flag.
pub const DATA_TOGGLE: &str = "data-toggle";
/// Data attribute carrying the group scope selector.
pub const DATA_PARENT: &str = "data-parent";

/// Options recognized when a controller is attached to a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CollapseConfig {
    /// Invoke `toggle()` immediately after attaching.
    pub toggle: bool,
    /// Accordion scope; enables exclusivity and one-time indicator seeding.
    pub parent: Option<GroupScope>,
}

impl Default for CollapseConfig {
    fn default() -> Self {
        Self {
            toggle: true,
            parent: None,
        }
    }
}

impl CollapseConfig {
    /// Set the toggle-on-init flag (builder pattern).
    #[must_use]
    pub fn toggle(mut self, toggle: bool) -> Self {
        self.toggle = toggle;
        self
    }

    /// Set the group scope (builder pattern).
    #[must_use]
    pub fn parent(mut self, scope: GroupScope) -> Self {
        self.parent = Some(scope);
        self
    }

    /// Build a config from data attributes, starting from the defaults.
    ///
    /// `data-toggle` is truthy unless it is `"false"` or empty, so the
    /// `data-toggle="collapse"` marker on a trigger counts as true. A blank
    /// `data-parent` means no group.
    pub fn from_data<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(DATA_TOGGLE) {
            config.toggle = is_truthy(&raw);
        }
        if let Some(raw) = lookup(DATA_PARENT) {
            config.parent = GroupScope::parse(&raw).ok();
        }
        config
    }

    /// Load from a JSON string. Missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> Result<Self, CollapseError> {
        let config: Self = serde_json::from_str(s).map_err(CollapseError::Json)?;
        match &config.parent {
            Some(scope) if scope.selector().trim().is_empty() => Err(CollapseError::EmptyScope),
            _ => Ok(config),
        }
    }
}

fn is_truthy(raw: &str) -> bool {
    let raw = raw.trim();
    !(raw.is_empty() || raw.eq_ignore_ascii_case("false"))
}

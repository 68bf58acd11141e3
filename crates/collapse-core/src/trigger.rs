#![forbid(unsafe_code)]

//! Trigger indicators and target resolution.
//!
//! A trigger carries no authoritative state. Its `collapsed` class and
//! `aria-expanded` attribute mirror its panel and are written at the start
//! of every `show`/`hide` (ahead of visual completion) and once when a group
//! is seeded at attach time. Completion never touches triggers.

use std::fmt;

use crate::host::{ElementId, Surface};

/// Indicator class present on a trigger whose panel is not expanded.
pub const CLASS_COLLAPSED: &str = "collapsed";
/// Accessibility attribute mirrored on triggers and panels.
pub const ARIA_EXPANDED: &str = "aria-expanded";
/// Explicit target reference attribute on a trigger.
pub const DATA_TARGET: &str = "data-target";
/// Fallback target reference attribute on a trigger.
pub const HREF: &str = "href";

/// Reference from a trigger to its panel (a selector such as `#faq`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetRef(String);

impl TargetRef {
    /// Wrap a raw selector.
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    /// Build the reference from a trigger's `data-target` and `href`.
    ///
    /// A non-empty `data-target` wins. Otherwise `href` is used after
    /// dropping anything before its trailing fragment, so
    /// `http://host/page#faq` becomes `#faq`.
    #[must_use]
    pub fn from_attributes(data_target: Option<&str>, href: Option<&str>) -> Option<Self> {
        if let Some(target) = data_target.filter(|t| !t.is_empty()) {
            return Some(Self::new(target));
        }
        href.map(strip_to_fragment)
            .filter(|h| !h.is_empty())
            .map(Self::new)
    }

    /// Read the reference off a trigger element.
    #[must_use]
    pub fn of_trigger(surface: &(impl Surface + ?Sized), trigger: &ElementId) -> Option<Self> {
        let data_target = surface.attribute(trigger, DATA_TARGET);
        let href = surface.attribute(trigger, HREF);
        Self::from_attributes(data_target.as_deref(), href.as_deref())
    }

    #[must_use]
    pub fn selector(&self) -> &str {
        &self.0
    }

    /// The id named by a `#id` reference.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.0.strip_prefix('#').filter(|id| !id.is_empty())
    }

    /// Whether this reference names the element `id`.
    #[must_use]
    pub fn names(&self, id: &ElementId) -> bool {
        self.fragment() == Some(id.as_str())
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keep only the trailing `#fragment` of an href.
///
/// The fragment is the longest suffix that starts with `#`, has at least
/// one character after it, and contains no whitespace. Without such a
/// suffix the href is returned unchanged.
fn strip_to_fragment(href: &str) -> &str {
    href.match_indices('#')
        .rev()
        .map(|(pos, _)| &href[pos..])
        .take_while(|tail| !tail.contains(char::is_whitespace))
        .find(|tail| tail.len() > 1)
        .unwrap_or(href)
}

/// Write the indicator for one trigger.
pub fn sync_indicator(surface: &mut (impl Surface + ?Sized), trigger: &ElementId, expanded: bool) {
    if expanded {
        surface.remove_class(trigger, CLASS_COLLAPSED);
    } else {
        surface.add_class(trigger, CLASS_COLLAPSED);
    }
    surface.set_attribute(trigger, ARIA_EXPANDED, bool_attr(expanded));
}

/// Write the indicator for a set of triggers.
pub fn sync_indicators(
    surface: &mut (impl Surface + ?Sized),
    triggers: &[ElementId],
    expanded: bool,
) {
    for trigger in triggers {
        sync_indicator(surface, trigger, expanded);
    }
}

/// Mirror `aria-expanded` on the panel itself.
pub fn sync_panel_aria(surface: &mut (impl Surface + ?Sized), panel: &ElementId, expanded: bool) {
    surface.set_attribute(panel, ARIA_EXPANDED, bool_attr(expanded));
}

/// Read back a trigger's indicator. `None` until it was first synced.
#[must_use]
pub fn indicator(surface: &(impl Surface + ?Sized), trigger: &ElementId) -> Option<bool> {
    match surface.attribute(trigger, ARIA_EXPANDED).as_deref() {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

const fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

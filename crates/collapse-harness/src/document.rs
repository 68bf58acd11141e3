#![forbid(unsafe_code)]

//! In-memory document implementing the collapse host traits.
//!
//! Elements form a tree through `parent` links. Trigger discovery follows the
//! attribute conventions of the browser binding:
//!
//! - a trigger carries `data-toggle="collapse"` and names its panel with
//!   `href="#id"` or `data-target="#id"`;
//! - a group trigger additionally carries `data-parent="<scope>"` and lives
//!   inside the scope element;
//! - group members are the collapsible children of the scope's `.panel`
//!   children.
//!
//! Only `#id` selectors resolve.

use std::collections::{BTreeMap, BTreeSet};

use ahash::{AHashMap, AHashSet};
use collapse_core::{
    CollapseEvent, CompletionToken, Dimension, ElementId, EventDisposition, GroupScope,
    LifecycleEvents, SizeOverride, Surface, TargetRef, TimerId, TransitionSupport,
    TriggerDirectory,
};
use tracing::trace;
use web_time::Duration;

use crate::clock::VirtualClock;
use crate::event_log::EventLog;

/// Marker value of `data-toggle` on trigger elements.
pub const TOGGLE_MARKER: &str = "collapse";
/// Class of the wrapper elements whose children form a group.
pub const GROUP_ITEM_CLASS: &str = "panel";

const COLLAPSIBLE_CLASSES: [&str; 3] = ["collapse", "collapsing", "in"];

/// One element of a [`FakeDocument`].
#[derive(Debug, Clone)]
pub struct FakeElement {
    id: ElementId,
    parent: Option<ElementId>,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    natural: [f32; 2],
    overrides: [Option<f32>; 2],
}

const fn axis(dim: Dimension) -> usize {
    match dim {
        Dimension::Width => 0,
        Dimension::Height => 1,
    }
}

impl FakeElement {
    /// New element with a natural size of 0 on both axes.
    #[must_use]
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            classes: BTreeSet::new(),
            attributes: BTreeMap::new(),
            natural: [0.0; 2],
            overrides: [None; 2],
        }
    }

    /// Add a class (builder pattern).
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    /// Set an attribute (builder pattern).
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Set the parent element (builder pattern).
    #[must_use]
    pub fn child_of(mut self, parent: impl Into<ElementId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the natural content size along `dim` (builder pattern).
    #[must_use]
    pub fn natural(mut self, dim: Dimension, size: f32) -> Self {
        self.natural[axis(dim)] = size;
        self
    }

    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    #[must_use]
    pub fn parent(&self) -> Option<&ElementId> {
        self.parent.as_ref()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Classes in sorted order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Explicit size currently applied along `dim`.
    #[must_use]
    pub fn size_override(&self, dim: Dimension) -> SizeOverride {
        self.overrides[axis(dim)].map_or(SizeOverride::Auto, SizeOverride::Px)
    }

    /// Rendered size: the override if any, else the natural size while
    /// shown and 0 while collapsed.
    #[must_use]
    pub fn rendered(&self, dim: Dimension) -> f32 {
        match self.overrides[axis(dim)] {
            Some(px) => px,
            None if self.has_class("in") || !self.has_class("collapse") => self.natural[axis(dim)],
            None => 0.0,
        }
    }

    fn is_trigger(&self) -> bool {
        self.attribute("data-toggle") == Some(TOGGLE_MARKER)
    }
}

/// In-memory host.
#[derive(Debug)]
pub struct FakeDocument {
    elements: AHashMap<ElementId, FakeElement>,
    order: Vec<ElementId>,
    transitions: bool,
    clock: VirtualClock,
    watched: AHashSet<ElementId>,
    prevented: AHashSet<(ElementId, CollapseEvent)>,
    log: EventLog,
    reflows: usize,
}

impl Default for FakeDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDocument {
    /// Empty document with transition support.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: AHashMap::new(),
            order: Vec::new(),
            transitions: true,
            clock: VirtualClock::new(),
            watched: AHashSet::new(),
            prevented: AHashSet::new(),
            log: EventLog::default(),
            reflows: 0,
        }
    }

    /// Toggle transition support (builder pattern).
    #[must_use]
    pub fn with_transitions(mut self, enabled: bool) -> Self {
        self.transitions = enabled;
        self
    }

    /// Insert or replace an element. Document order is insertion order.
    pub fn insert(&mut self, element: FakeElement) -> &mut Self {
        let id = element.id.clone();
        if self.elements.insert(id.clone(), element).is_none() {
            self.order.push(id);
        }
        self
    }

    /// Remove an element. Its children keep their dangling parent link.
    pub fn remove(&mut self, id: &ElementId) -> Option<FakeElement> {
        self.order.retain(|e| e != id);
        self.elements.remove(id)
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&FakeElement> {
        self.elements.get(id)
    }

    /// Make listeners cancel `event` on `panel` until [`allow`](Self::allow).
    pub fn prevent(&mut self, panel: impl Into<ElementId>, event: CollapseEvent) {
        self.prevented.insert((panel.into(), event));
    }

    /// Undo a [`prevent`](Self::prevent).
    pub fn allow(&mut self, panel: impl Into<ElementId>, event: CollapseEvent) {
        self.prevented.remove(&(panel.into(), event));
    }

    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    #[must_use]
    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut VirtualClock {
        &mut self.clock
    }

    /// Whether a transition-end listener is registered on `panel`.
    #[must_use]
    pub fn is_watching(&self, panel: &ElementId) -> bool {
        self.watched.contains(panel)
    }

    /// Number of forced reflows so far.
    #[must_use]
    pub fn reflows(&self) -> usize {
        self.reflows
    }

    /// Elements in document order.
    fn in_order(&self) -> impl Iterator<Item = &FakeElement> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    fn is_descendant_of(&self, el: &FakeElement, ancestor: &ElementId) -> bool {
        let mut cursor = el.parent.as_ref();
        let mut hops = 0;
        while let Some(parent) = cursor {
            if parent == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.elements.len() {
                return false;
            }
            cursor = self.elements.get(parent).and_then(|p| p.parent.as_ref());
        }
        false
    }

    fn children_of<'a>(&'a self, parent: &'a ElementId) -> impl Iterator<Item = &'a FakeElement> {
        self.in_order()
            .filter(move |el| el.parent.as_ref() == Some(parent))
    }

    fn scope_root(&self, scope: &GroupScope) -> Option<ElementId> {
        self.resolve(&TargetRef::new(scope.selector()))
    }
}

impl Surface for FakeDocument {
    fn has_class(&self, el: &ElementId, class: &str) -> bool {
        self.elements.get(el).is_some_and(|e| e.has_class(class))
    }

    fn add_class(&mut self, el: &ElementId, class: &str) {
        if let Some(e) = self.elements.get_mut(el) {
            e.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, el: &ElementId, class: &str) {
        if let Some(e) = self.elements.get_mut(el) {
            e.classes.remove(class);
        }
    }

    fn attribute(&self, el: &ElementId, name: &str) -> Option<String> {
        self.elements
            .get(el)
            .and_then(|e| e.attribute(name))
            .map(str::to_string)
    }

    fn set_attribute(&mut self, el: &ElementId, name: &str, value: &str) {
        if let Some(e) = self.elements.get_mut(el) {
            e.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn size(&self, el: &ElementId, dim: Dimension) -> f32 {
        self.elements.get(el).map_or(0.0, |e| e.rendered(dim))
    }

    fn scroll_size(&self, el: &ElementId, dim: Dimension) -> f32 {
        self.elements.get(el).map_or(0.0, |e| e.natural[axis(dim)])
    }

    fn set_size(&mut self, el: &ElementId, dim: Dimension, size: SizeOverride) {
        if let Some(e) = self.elements.get_mut(el) {
            e.overrides[axis(dim)] = match size {
                SizeOverride::Auto => None,
                SizeOverride::Px(px) => Some(px),
            };
        }
    }

    fn reflow(&mut self, _el: &ElementId) {
        self.reflows += 1;
    }
}

impl LifecycleEvents for FakeDocument {
    fn emit(&mut self, panel: &ElementId, event: CollapseEvent) -> EventDisposition {
        let prevented = event.is_cancelable() && self.prevented.contains(&(panel.clone(), event));
        self.log.record(self.clock.now(), panel, event, prevented);
        trace!(message = "harness.emit", panel = %panel, event = event.name(), prevented);
        if prevented {
            EventDisposition::Prevented
        } else {
            EventDisposition::Proceed
        }
    }
}

impl TransitionSupport for FakeDocument {
    fn supports_transitions(&self) -> bool {
        self.transitions
    }

    fn watch_transition_end(&mut self, panel: &ElementId) {
        self.watched.insert(panel.clone());
    }

    fn unwatch_transition_end(&mut self, panel: &ElementId) {
        self.watched.remove(panel);
    }

    fn set_timeout(&mut self, delay: Duration, token: CompletionToken) -> TimerId {
        self.clock.schedule(delay, token)
    }

    fn clear_timeout(&mut self, timer: TimerId) {
        self.clock.cancel(timer);
    }
}

impl TriggerDirectory for FakeDocument {
    fn triggers_for(&self, panel: &ElementId) -> Vec<ElementId> {
        let reference = format!("#{panel}");
        self.in_order()
            .filter(|el| el.is_trigger())
            .filter(|el| {
                el.attribute("href") == Some(reference.as_str())
                    || el.attribute("data-target") == Some(reference.as_str())
            })
            .map(|el| el.id.clone())
            .collect()
    }

    fn group_triggers(&self, scope: &GroupScope) -> Vec<ElementId> {
        let Some(root) = self.scope_root(scope) else {
            return Vec::new();
        };
        self.in_order()
            .filter(|el| el.is_trigger())
            .filter(|el| el.attribute("data-parent") == Some(scope.selector()))
            .filter(|el| self.is_descendant_of(el, &root))
            .map(|el| el.id.clone())
            .collect()
    }

    fn group_members(&self, scope: &GroupScope) -> Vec<ElementId> {
        let Some(root) = self.scope_root(scope) else {
            return Vec::new();
        };
        self.children_of(&root)
            .filter(|item| item.has_class(GROUP_ITEM_CLASS))
            .flat_map(|item| self.children_of(&item.id))
            .filter(|el| COLLAPSIBLE_CLASSES.iter().any(|c| el.has_class(c)))
            .map(|el| el.id.clone())
            .collect()
    }

    fn resolve(&self, target: &TargetRef) -> Option<ElementId> {
        let id = ElementId::from(target.fragment()?);
        self.elements.contains_key(&id).then_some(id)
    }
}

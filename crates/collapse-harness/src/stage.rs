#![forbid(unsafe_code)]

//! A registry bound to a fake document.
//!
//! [`Stage`] forwards operations by string id and plays the host's part in
//! completion delivery: [`Stage::end_transition`] stands in for a native
//! transition end, [`Stage::advance`] moves virtual time and hands every
//! expired fallback timer back to the registry.

use collapse_core::{
    Collapse, CollapseConfig, Command, Dimension, ElementId, LifecycleState, SizeOverride,
    TRANSITION_DURATION, TransitionOutcome, TriggerActivation, trigger,
};
use tracing::trace;
use web_time::Duration;

use crate::document::FakeDocument;

/// Registry plus host.
#[derive(Debug)]
pub struct Stage {
    pub doc: FakeDocument,
    pub collapse: Collapse,
}

impl Stage {
    #[must_use]
    pub fn new(doc: FakeDocument) -> Self {
        Self {
            doc,
            collapse: Collapse::new(),
        }
    }

    pub fn attach(&mut self, id: &str, config: CollapseConfig) -> Option<TransitionOutcome> {
        self.collapse.attach(&mut self.doc, id, config)
    }

    /// Attach every id without toggling.
    pub fn attach_quiet(&mut self, ids: &[&str], config: &CollapseConfig) {
        for id in ids {
            let _ = self.attach(id, config.clone().toggle(false));
        }
    }

    pub fn detach(&mut self, id: &str) -> bool {
        self.collapse
            .detach(&mut self.doc, &ElementId::from(id))
            .is_some()
    }

    pub fn show(&mut self, id: &str) -> TransitionOutcome {
        self.collapse.show(&mut self.doc, &ElementId::from(id))
    }

    pub fn hide(&mut self, id: &str) -> TransitionOutcome {
        self.collapse.hide(&mut self.doc, &ElementId::from(id))
    }

    pub fn toggle(&mut self, id: &str) -> TransitionOutcome {
        self.collapse.toggle(&mut self.doc, &ElementId::from(id))
    }

    pub fn invoke(&mut self, id: &str, command: Command) -> TransitionOutcome {
        self.collapse
            .invoke(&mut self.doc, &ElementId::from(id), command)
    }

    /// Activate (click) a trigger.
    pub fn click(&mut self, trigger: &str) -> TriggerActivation {
        self.collapse
            .activate_trigger(&mut self.doc, &ElementId::from(trigger))
    }

    /// Deliver a native transition end on `id`.
    ///
    /// Nothing is delivered unless a listener is registered, as in a real
    /// document. Returns whether a transition settled.
    pub fn end_transition(&mut self, id: &str) -> bool {
        let id = ElementId::from(id);
        if !self.doc.is_watching(&id) {
            return false;
        }
        self.collapse.transition_ended(&mut self.doc, &id)
    }

    /// Move virtual time forward, firing due timers in order.
    ///
    /// Returns how many timers settled a transition.
    pub fn advance(&mut self, by: Duration) -> usize {
        let until = self.doc.clock().now() + by;
        let mut settled = 0;
        while let Some(token) = self.doc.clock_mut().pop_due(until) {
            if self.collapse.timer_fired(&mut self.doc, &token) {
                settled += 1;
            }
        }
        self.doc.clock_mut().set_now(until);
        let now_ms = u64::try_from(until.as_millis()).unwrap_or(u64::MAX);
        trace!(message = "harness.advance", now_ms, settled);
        settled
    }

    /// Advance by the fallback duration so every pending transition settles.
    pub fn settle(&mut self) -> usize {
        self.advance(TRANSITION_DURATION)
    }

    #[must_use]
    pub fn state(&self, id: &str) -> Option<LifecycleState> {
        self.collapse.state(&ElementId::from(id))
    }

    #[must_use]
    pub fn is_transitioning(&self, id: &str) -> bool {
        self.state(id).is_some_and(LifecycleState::is_transitioning)
    }

    /// A trigger's `aria-expanded`, `None` until first synced.
    #[must_use]
    pub fn indicator(&self, trigger: &str) -> Option<bool> {
        trigger::indicator(&self.doc, &ElementId::from(trigger))
    }

    /// Whether a trigger carries the `collapsed` class.
    #[must_use]
    pub fn marked_collapsed(&self, trigger: &str) -> bool {
        self.has_class(trigger, trigger::CLASS_COLLAPSED)
    }

    #[must_use]
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.doc
            .element(&ElementId::from(id))
            .is_some_and(|e| e.has_class(class))
    }

    #[must_use]
    pub fn attribute(&self, id: &str, name: &str) -> Option<String> {
        self.doc
            .element(&ElementId::from(id))
            .and_then(|e| e.attribute(name))
            .map(str::to_string)
    }

    /// Explicit size currently applied on `id`.
    #[must_use]
    pub fn size_override(&self, id: &str, dim: Dimension) -> SizeOverride {
        self.doc
            .element(&ElementId::from(id))
            .map_or(SizeOverride::Auto, |e| e.size_override(dim))
    }
}

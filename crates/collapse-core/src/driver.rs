#![forbid(unsafe_code)]

//! Transition driver.
//!
//! [`Collapse`] owns every attached [`PanelState`] and runs the show/hide
//! algorithm against a [`Host`].
//!
//! # Show
//!
//! 1. Dropped if the panel is transitioning or already expanded.
//! 2. Open siblings in the panel's group are collected; a sibling that is
//!    itself transitioning drops the call.
//! 3. `ShowRequested` is emitted; a prevented event drops the call.
//! 4. `hide` is requested on every open sibling (not awaited).
//! 5. The panel enters `Expanding`, its size is pinned to zero and every
//!    trigger flips to expanded.
//! 6. A completion is armed (transition end + fallback timer) and the size
//!    is set to the natural content size. Without transition support the
//!    panel completes on the spot.
//! 7. On completion: `Expanded`, size override cleared, `Shown` emitted.
//!
//! `hide` mirrors this, except that the current rendered size is pinned
//! first so the collapse animates from an explicit value.
//!
//! # Invariants
//!
//! 1. No `show`/`hide` starts on a panel while it is transitioning.
//! 2. At rest, every trigger's indicator equals `state == Expanded`.
//! 3. A completion settles at most once; the losing source is cancelled.
//!
//! # Failure Modes
//!
//! None are raised. Every rejected call returns
//! [`TransitionOutcome::Ignored`] or [`TransitionOutcome::Prevented`].

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use tracing::{debug, debug_span, trace};

use crate::completion::{
    CompletionSource, CompletionToken, PendingCompletion, Phase, TRANSITION_DURATION,
};
use crate::config::CollapseConfig;
use crate::error::CollapseError;
use crate::group::{Admission, ExclusivityPolicy, GroupCoordinator, GroupScope};
use crate::host::{CollapseEvent, ElementId, Host, SizeOverride};
use crate::panel::{
    CLASS_COLLAPSE, CLASS_COLLAPSING, CLASS_IN, Dimension, LifecycleState, PanelState,
};
use crate::trigger::{self, DATA_TARGET, TargetRef};

/// Why a transition request did nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No controller is attached to the element.
    NotAttached,
    /// The panel is already mid-transition.
    Transitioning,
    /// `show` on an expanded panel.
    AlreadyExpanded,
    /// `hide` on a panel that is not expanded.
    AlreadyCollapsed,
    /// A member of the same group is mid-transition.
    SiblingTransitioning(ElementId),
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAttached => write!(f, "not attached"),
            Self::Transitioning => write!(f, "transitioning"),
            Self::AlreadyExpanded => write!(f, "already expanded"),
            Self::AlreadyCollapsed => write!(f, "already collapsed"),
            Self::SiblingTransitioning(id) => write!(f, "sibling {id} transitioning"),
        }
    }
}

/// Result of a `show`, `hide` or `toggle` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The transition started; completion will be delivered later.
    Started,
    /// The host has no transition support; the panel already settled.
    Completed,
    /// A listener cancelled the request event. Nothing changed.
    Prevented,
    /// The request was a no-op.
    Ignored(IgnoreReason),
}

impl TransitionOutcome {
    /// True if the panel's lifecycle state changed.
    #[must_use]
    pub const fn changed_state(&self) -> bool {
        matches!(self, Self::Started | Self::Completed)
    }

    #[must_use]
    pub fn ignore_reason(&self) -> Option<&IgnoreReason> {
        match self {
            Self::Ignored(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Method names accepted by [`Collapse::invoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Show,
    Hide,
    Toggle,
}

impl FromStr for Command {
    type Err = CollapseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "show" => Ok(Self::Show),
            "hide" => Ok(Self::Hide),
            "toggle" => Ok(Self::Toggle),
            other => Err(CollapseError::UnknownCommand(other.to_string())),
        }
    }
}

/// What happened when a trigger was activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerActivation {
    /// Panel the trigger resolved to; `None` leaves the trigger inert.
    pub panel: Option<ElementId>,
    /// The caller should suppress the trigger's default action (the trigger
    /// has no explicit `data-target`, so its `href` would navigate).
    pub prevent_default: bool,
    /// Outcome of the toggle, or of the initial toggle when the activation
    /// attached a new controller. `None` when nothing ran.
    pub outcome: Option<TransitionOutcome>,
}

/// Registry of attached panels and the transition driver.
#[derive(Debug, Default)]
pub struct Collapse {
    panels: AHashMap<ElementId, PanelState>,
    next_seq: u64,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl Collapse {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn panel(&self, id: &ElementId) -> Option<&PanelState> {
        self.panels.get(id)
    }

    #[must_use]
    pub fn state(&self, id: &ElementId) -> Option<LifecycleState> {
        self.panels.get(id).map(PanelState::lifecycle)
    }

    /// Axis animated by an attached panel.
    #[must_use]
    pub fn dimension(&self, id: &ElementId) -> Option<Dimension> {
        self.panels.get(id).map(PanelState::dimension)
    }

    #[must_use]
    pub fn is_attached(&self, id: &ElementId) -> bool {
        self.panels.contains_key(id)
    }

    /// Attached panels, in no particular order.
    pub fn panels(&self) -> impl Iterator<Item = &PanelState> {
        self.panels.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Attach / detach
// ---------------------------------------------------------------------------

impl Collapse {
    /// Attach a controller to `id`.
    ///
    /// Reads the animated axis and the resting state from the element,
    /// discovers its triggers, seeds indicators (for the whole group when
    /// `config.parent` is set, otherwise for this panel) and finally runs
    /// `toggle()` if `config.toggle` is set.
    ///
    /// Returns the outcome of that initial toggle, or `None` if none ran.
    /// Attaching an already attached element does nothing.
    pub fn attach<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        id: impl Into<ElementId>,
        config: CollapseConfig,
    ) -> Option<TransitionOutcome> {
        let id = id.into();
        if self.panels.contains_key(&id) {
            trace!(message = "collapse.attach", panel = %id, already_attached = true);
            return None;
        }

        let dimension = Dimension::of(&*host, &id);
        let lifecycle = LifecycleState::observe(&*host, &id);
        let triggers = host.triggers_for(&id);
        debug!(
            message = "collapse.attach",
            panel = %id,
            dimension = %dimension,
            state = %lifecycle,
            triggers = triggers.len(),
            group = config.parent.as_ref().map(GroupScope::selector),
        );

        let panel = PanelState::new(
            id.clone(),
            dimension,
            lifecycle,
            config.parent.clone(),
            config.toggle,
            triggers,
        );
        match &config.parent {
            Some(scope) => {
                self.panels.insert(id.clone(), panel);
                self.seed_group(host, scope);
            }
            None => {
                let expanded = lifecycle.is_expanded();
                trigger::sync_panel_aria(host, &id, expanded);
                trigger::sync_indicators(host, panel.triggers(), expanded);
                self.panels.insert(id.clone(), panel);
            }
        }

        config.toggle.then(|| self.toggle(host, &id))
    }

    /// Detach the controller from `id` and return its final record.
    ///
    /// A pending completion is cancelled; the element keeps whatever
    /// classes and size it had.
    pub fn detach<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        id: &ElementId,
    ) -> Option<PanelState> {
        let mut panel = self.panels.remove(id)?;
        if let Some(pending) = panel.disarm() {
            host.clear_timeout(pending.timer);
            host.unwatch_transition_end(id);
        }
        debug!(message = "collapse.detach", panel = %id, state = %panel.lifecycle());
        Some(panel)
    }

    /// Sync every group trigger against its own target's current state.
    ///
    /// A target mid-transition keeps the indicator of the state it is
    /// heading to; `finish` does not resync triggers.
    fn seed_group<H: Host + ?Sized>(&self, host: &mut H, scope: &GroupScope) {
        for trig in host.group_triggers(scope) {
            let target = TargetRef::of_trigger(&*host, &trig).and_then(|t| host.resolve(&t));
            let Some(target) = target else {
                trace!(message = "collapse.trigger.unresolved", trigger = %trig);
                continue;
            };
            let expanded = GroupCoordinator::new(&self.panels)
                .state_of(&*host, &target)
                .is_open();
            trigger::sync_panel_aria(host, &target, expanded);
            trigger::sync_indicator(host, &trig, expanded);
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

impl Collapse {
    /// Expand a panel, closing open siblings of its group.
    pub fn show<H: Host + ?Sized>(&mut self, host: &mut H, id: &ElementId) -> TransitionOutcome {
        let _span = debug_span!("collapse.transition", panel = %id, op = "show").entered();
        let Some(panel) = self.panels.get(id) else {
            return ignored(id, Phase::Show, IgnoreReason::NotAttached);
        };
        if panel.is_transitioning() {
            return ignored(id, Phase::Show, IgnoreReason::Transitioning);
        }
        if panel.lifecycle().is_expanded() {
            return ignored(id, Phase::Show, IgnoreReason::AlreadyExpanded);
        }

        let scope = panel.group().cloned();
        let siblings = scope
            .as_ref()
            .map(|s| GroupCoordinator::new(&self.panels).active_siblings(&*host, s, id))
            .unwrap_or_default();
        let close = match ExclusivityPolicy::for_scope(scope.as_ref()).admit(&siblings) {
            Admission::Proceed { close } => close,
            Admission::Blocked { by } => {
                return ignored(id, Phase::Show, IgnoreReason::SiblingTransitioning(by));
            }
        };

        if host.emit(id, CollapseEvent::ShowRequested).is_prevented() {
            debug!(message = "collapse.prevented", panel = %id, op = "show");
            return TransitionOutcome::Prevented;
        }

        for sibling in close {
            debug!(message = "collapse.group.close", panel = %id, sibling = %sibling);
            if !self.panels.contains_key(&sibling) {
                let config =
                    CollapseConfig::from_data(|k| host.attribute(&sibling, k)).toggle(false);
                let _ = self.attach(host, sibling.clone(), config);
            }
            let _ = self.hide(host, &sibling);
        }

        let Some(panel) = self.panels.get_mut(id) else {
            return ignored(id, Phase::Show, IgnoreReason::NotAttached);
        };
        let dim = panel.dimension();
        panel.set_lifecycle(LifecycleState::Expanding);
        host.remove_class(id, CLASS_COLLAPSE);
        host.add_class(id, CLASS_COLLAPSING);
        host.set_size(id, dim, SizeOverride::Px(0.0));
        trigger::sync_panel_aria(host, id, true);
        trigger::sync_indicators(host, panel.triggers(), true);
        debug!(message = "collapse.show", panel = %id, dimension = %dim);

        self.await_completion(host, id, Phase::Show)
    }

    /// Collapse a panel.
    pub fn hide<H: Host + ?Sized>(&mut self, host: &mut H, id: &ElementId) -> TransitionOutcome {
        let _span = debug_span!("collapse.transition", panel = %id, op = "hide").entered();
        let Some(panel) = self.panels.get_mut(id) else {
            return ignored(id, Phase::Hide, IgnoreReason::NotAttached);
        };
        if panel.is_transitioning() {
            return ignored(id, Phase::Hide, IgnoreReason::Transitioning);
        }
        if !panel.lifecycle().is_expanded() {
            return ignored(id, Phase::Hide, IgnoreReason::AlreadyCollapsed);
        }

        if host.emit(id, CollapseEvent::HideRequested).is_prevented() {
            debug!(message = "collapse.prevented", panel = %id, op = "hide");
            return TransitionOutcome::Prevented;
        }

        // Pin the rendered size; there is no animating away from auto.
        let dim = panel.dimension();
        let current = host.size(id, dim);
        host.set_size(id, dim, SizeOverride::Px(current));
        host.reflow(id);

        host.add_class(id, CLASS_COLLAPSING);
        host.remove_class(id, CLASS_COLLAPSE);
        host.remove_class(id, CLASS_IN);
        trigger::sync_panel_aria(host, id, false);
        trigger::sync_indicators(host, panel.triggers(), false);
        panel.set_lifecycle(LifecycleState::Collapsing);
        debug!(message = "collapse.hide", panel = %id, dimension = %dim, from = current);

        self.await_completion(host, id, Phase::Hide)
    }

    /// `hide` when expanded, `show` otherwise.
    pub fn toggle<H: Host + ?Sized>(&mut self, host: &mut H, id: &ElementId) -> TransitionOutcome {
        match self.state(id) {
            None => ignored(id, Phase::Show, IgnoreReason::NotAttached),
            Some(LifecycleState::Expanded) => self.hide(host, id),
            Some(_) => self.show(host, id),
        }
    }

    /// Run a command on `id`, attaching a controller first if needed.
    ///
    /// A controller attached here takes its config from the panel's data
    /// attributes but never toggles on init, so the command runs once.
    pub fn invoke<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        id: &ElementId,
        command: Command,
    ) -> TransitionOutcome {
        if !self.panels.contains_key(id) {
            let config = CollapseConfig::from_data(|k| host.attribute(id, k)).toggle(false);
            let _ = self.attach(host, id.clone(), config);
        }
        match command {
            Command::Show => self.show(host, id),
            Command::Hide => self.hide(host, id),
            Command::Toggle => self.toggle(host, id),
        }
    }

    /// Handle activation (a click) of a trigger element.
    ///
    /// An attached target is toggled. An unattached target gets a controller
    /// configured from the trigger's data attributes, which toggles on init
    /// unless the trigger says otherwise.
    pub fn activate_trigger<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        trigger: &ElementId,
    ) -> TriggerActivation {
        let prevent_default = host
            .attribute(trigger, DATA_TARGET)
            .is_none_or(|t| t.is_empty());
        let target = TargetRef::of_trigger(&*host, trigger).and_then(|t| host.resolve(&t));
        let Some(panel) = target else {
            trace!(message = "collapse.trigger.unresolved", trigger = %trigger);
            return TriggerActivation {
                panel: None,
                prevent_default,
                outcome: None,
            };
        };

        let outcome = if self.panels.contains_key(&panel) {
            Some(self.toggle(host, &panel))
        } else {
            let config = CollapseConfig::from_data(|k| host.attribute(trigger, k));
            self.attach(host, panel.clone(), config)
        };
        TriggerActivation {
            panel: Some(panel),
            prevent_default,
            outcome,
        }
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

impl Collapse {
    /// Deliver the host's native transition-end notification for `id`.
    ///
    /// Returns `true` if it settled a pending transition. The fallback
    /// timer of that transition is cancelled.
    pub fn transition_ended<H: Host + ?Sized>(&mut self, host: &mut H, id: &ElementId) -> bool {
        let Some(pending) = self.panels.get_mut(id).and_then(|p| p.disarm()) else {
            trace!(message = "collapse.complete.stale", panel = %id, source = "transition_end");
            return false;
        };
        host.clear_timeout(pending.timer);
        host.unwatch_transition_end(id);
        self.finish(host, id, pending.phase, CompletionSource::TransitionEnd);
        true
    }

    /// Deliver an expired fallback timer.
    ///
    /// Returns `true` if it settled a pending transition. Tokens of
    /// transitions that already settled are ignored.
    pub fn timer_fired<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        token: &CompletionToken,
    ) -> bool {
        let id = token.panel();
        let current = self
            .panels
            .get(id)
            .and_then(PanelState::pending)
            .is_some_and(|p| p.matches(token));
        if !current {
            trace!(message = "collapse.complete.stale", panel = %id, seq = token.seq(), source = "timeout");
            return false;
        }
        let Some(pending) = self.panels.get_mut(id).and_then(|p| p.disarm()) else {
            return false;
        };
        host.unwatch_transition_end(id);
        self.finish(host, id, pending.phase, CompletionSource::Timeout);
        true
    }

    /// Arm completion detection and start the geometry change.
    fn await_completion<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        id: &ElementId,
        phase: Phase,
    ) -> TransitionOutcome {
        if !host.supports_transitions() {
            self.finish(host, id, phase, CompletionSource::Immediate);
            return TransitionOutcome::Completed;
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        host.watch_transition_end(id);
        let timer = host.set_timeout(TRANSITION_DURATION, CompletionToken::new(id.clone(), seq));

        let Some(panel) = self.panels.get_mut(id) else {
            host.clear_timeout(timer);
            host.unwatch_transition_end(id);
            return ignored(id, phase, IgnoreReason::NotAttached);
        };
        panel.arm(PendingCompletion { seq, phase, timer });
        let dim = panel.dimension();
        let target = match phase {
            Phase::Show => host.scroll_size(id, dim),
            Phase::Hide => 0.0,
        };
        host.set_size(id, dim, SizeOverride::Px(target));
        TransitionOutcome::Started
    }

    /// Settle a transition: final state, surface classes, after-event.
    fn finish<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        id: &ElementId,
        phase: Phase,
        source: CompletionSource,
    ) {
        let Some(panel) = self.panels.get_mut(id) else {
            return;
        };
        panel.disarm();
        let dim = panel.dimension();
        let event = match phase {
            Phase::Show => {
                host.remove_class(id, CLASS_COLLAPSING);
                host.add_class(id, CLASS_COLLAPSE);
                host.add_class(id, CLASS_IN);
                host.set_size(id, dim, SizeOverride::Auto);
                panel.set_lifecycle(LifecycleState::Expanded);
                CollapseEvent::Shown
            }
            Phase::Hide => {
                panel.set_lifecycle(LifecycleState::Collapsed);
                host.remove_class(id, CLASS_COLLAPSING);
                host.add_class(id, CLASS_COLLAPSE);
                CollapseEvent::Hidden
            }
        };
        debug!(
            message = "collapse.complete",
            panel = %id,
            phase = phase.as_str(),
            source = source.as_str(),
        );
        let _ = host.emit(id, event);
    }
}

fn ignored(id: &ElementId, phase: Phase, reason: IgnoreReason) -> TransitionOutcome {
    debug!(message = "collapse.ignored", panel = %id, op = phase.as_str(), reason = %reason);
    TransitionOutcome::Ignored(reason)
}

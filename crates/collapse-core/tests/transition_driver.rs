#![forbid(unsafe_code)]

//! Integration tests for the show/hide state machine on a single panel.
//!
//! # Invariants tested
//!
//! 1. `show` on an expanded panel is a silent no-op.
//! 2. Trigger indicators flip before completion; state is `Expanding` until
//!    a completion arrives.
//! 3. Without a transition-end notification the fallback timer settles the
//!    panel exactly once.
//! 4. A cancelled request changes neither state nor indicators.
//! 5. `toggle` dispatches on the current state.

use collapse_core::{
    CollapseConfig, CollapseEvent, Dimension, ElementId, IgnoreReason, LifecycleState,
    SizeOverride, TRANSITION_DURATION, TransitionOutcome,
};
use collapse_harness::{Stage, fixtures, init_test_logging};
use web_time::Duration;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn stage_with(doc: collapse_harness::FakeDocument, ids: &[&str]) -> Stage {
    init_test_logging();
    let mut stage = Stage::new(doc);
    stage.attach_quiet(ids, &CollapseConfig::default());
    stage
}

fn closed() -> Stage {
    stage_with(fixtures::single("p", false), &["p"])
}

fn open() -> Stage {
    stage_with(fixtures::single("p", true), &["p"])
}

// ---------------------------------------------------------------------------
// Show
// ---------------------------------------------------------------------------

#[test]
fn show_scenario_from_collapsed() {
    let mut stage = closed();
    assert_eq!(stage.indicator("p-toggle"), Some(false));
    assert!(stage.marked_collapsed("p-toggle"));

    assert_eq!(stage.show("p"), TransitionOutcome::Started);
    assert_eq!(stage.state("p"), Some(LifecycleState::Expanding));
    assert_eq!(stage.indicator("p-toggle"), Some(true));
    assert!(!stage.marked_collapsed("p-toggle"));
    assert!(stage.has_class("p", "collapsing"));
    assert!(!stage.has_class("p", "collapse"));
    assert_eq!(
        stage.size_override("p", Dimension::Height),
        SizeOverride::Px(100.0)
    );

    assert!(stage.end_transition("p"));
    assert_eq!(stage.state("p"), Some(LifecycleState::Expanded));
    assert!(stage.has_class("p", "collapse"));
    assert!(stage.has_class("p", "in"));
    assert!(!stage.has_class("p", "collapsing"));
    assert_eq!(
        stage.size_override("p", Dimension::Height),
        SizeOverride::Auto
    );
    assert_eq!(stage.attribute("p", "aria-expanded").as_deref(), Some("true"));

    // The fallback timer was cancelled by the transition end.
    assert_eq!(stage.doc.clock().pending(), 0);
    assert_eq!(stage.settle(), 0);
    assert_eq!(stage.doc.log().count("p", CollapseEvent::Shown), 1);
    assert_eq!(
        stage.doc.log().names_for("p"),
        vec!["show.collapse", "shown.collapse"]
    );
}

#[test]
fn show_on_expanded_is_silent() {
    let mut stage = open();
    stage.doc.log_mut().clear();

    assert_eq!(
        stage.show("p"),
        TransitionOutcome::Ignored(IgnoreReason::AlreadyExpanded)
    );
    assert_eq!(stage.state("p"), Some(LifecycleState::Expanded));
    assert!(stage.doc.log().is_empty());
    assert_eq!(stage.doc.clock().pending(), 0);
}

#[test]
fn indicators_lead_completion() {
    let mut stage = closed();
    let _ = stage.show("p");
    stage.advance(TRANSITION_DURATION - Duration::from_millis(1));
    assert_eq!(stage.state("p"), Some(LifecycleState::Expanding));
    assert_eq!(stage.indicator("p-toggle"), Some(true));
    assert_eq!(stage.doc.log().count("p", CollapseEvent::Shown), 0);
}

#[test]
fn timeout_settles_exactly_once() {
    let mut stage = closed();
    let _ = stage.show("p");
    assert!(stage.is_transitioning("p"));

    assert_eq!(stage.advance(TRANSITION_DURATION), 1);
    assert_eq!(stage.state("p"), Some(LifecycleState::Expanded));
    assert!(!stage.is_transitioning("p"));
    assert!(!stage.doc.is_watching(&ElementId::from("p")));

    // A late native notification and more time change nothing.
    assert!(!stage.end_transition("p"));
    assert_eq!(stage.settle(), 0);
    assert_eq!(stage.doc.log().count("p", CollapseEvent::Shown), 1);
}

#[test]
fn stale_timer_tokens_are_ignored() {
    let mut stage = closed();
    let _ = stage.show("p");
    let token = stage
        .doc
        .clock_mut()
        .pop_due(TRANSITION_DURATION)
        .expect("show armed a fallback timer");

    assert!(stage.end_transition("p"));
    assert!(
        !stage
            .collapse
            .timer_fired(&mut stage.doc, &token)
    );

    assert_eq!(stage.hide("p"), TransitionOutcome::Started);
    assert!(
        !stage
            .collapse
            .timer_fired(&mut stage.doc, &token)
    );
    assert_eq!(stage.state("p"), Some(LifecycleState::Collapsing));
}

#[test]
fn no_transition_support_completes_synchronously() {
    init_test_logging();
    let mut stage = Stage::new(fixtures::single("p", false).with_transitions(false));
    stage.attach_quiet(&["p"], &CollapseConfig::default());

    assert_eq!(stage.show("p"), TransitionOutcome::Completed);
    assert_eq!(stage.state("p"), Some(LifecycleState::Expanded));
    assert_eq!(stage.indicator("p-toggle"), Some(true));
    assert_eq!(stage.doc.clock().pending(), 0);
    assert_eq!(stage.doc.log().count("p", CollapseEvent::Shown), 1);

    assert_eq!(stage.hide("p"), TransitionOutcome::Completed);
    assert_eq!(stage.state("p"), Some(LifecycleState::Collapsed));
    assert_eq!(stage.doc.log().count("p", CollapseEvent::Hidden), 1);
}

// ---------------------------------------------------------------------------
// Hide
// ---------------------------------------------------------------------------

#[test]
fn hide_pins_size_before_collapsing() {
    let mut stage = open();
    assert_eq!(stage.hide("p"), TransitionOutcome::Started);

    assert_eq!(stage.doc.reflows(), 1);
    assert_eq!(stage.state("p"), Some(LifecycleState::Collapsing));
    assert!(stage.has_class("p", "collapsing"));
    assert!(!stage.has_class("p", "in"));
    assert_eq!(
        stage.size_override("p", Dimension::Height),
        SizeOverride::Px(0.0)
    );
    assert_eq!(stage.indicator("p-toggle"), Some(false));
    assert!(stage.marked_collapsed("p-toggle"));
    assert_eq!(stage.attribute("p", "aria-expanded").as_deref(), Some("false"));

    assert!(stage.end_transition("p"));
    assert_eq!(stage.state("p"), Some(LifecycleState::Collapsed));
    assert!(stage.has_class("p", "collapse"));
    assert!(!stage.has_class("p", "collapsing"));
    assert_eq!(stage.doc.log().names_for("p"), vec!["hide.collapse", "hidden.collapse"]);
}

#[test]
fn cancelled_hide_changes_nothing() {
    let mut stage = open();
    stage.doc.prevent("p", CollapseEvent::HideRequested);

    assert_eq!(stage.hide("p"), TransitionOutcome::Prevented);
    assert_eq!(stage.state("p"), Some(LifecycleState::Expanded));
    assert_eq!(stage.indicator("p-toggle"), Some(true));
    assert!(!stage.marked_collapsed("p-toggle"));
    assert!(stage.has_class("p", "in"));
    assert_eq!(stage.doc.clock().pending(), 0);
    assert_eq!(stage.doc.reflows(), 0);

    let entries = stage.doc.log().entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].is("p", CollapseEvent::HideRequested));
    assert!(entries[0].prevented);

    stage.doc.allow("p", CollapseEvent::HideRequested);
    assert_eq!(stage.hide("p"), TransitionOutcome::Started);
}

#[test]
fn cancelled_show_changes_nothing() {
    let mut stage = closed();
    stage.doc.prevent("p", CollapseEvent::ShowRequested);
    assert_eq!(stage.show("p"), TransitionOutcome::Prevented);
    assert_eq!(stage.state("p"), Some(LifecycleState::Collapsed));
    assert_eq!(stage.indicator("p-toggle"), Some(false));
    assert_eq!(
        stage.size_override("p", Dimension::Height),
        SizeOverride::Auto
    );
}

#[test]
fn hide_on_collapsed_is_silent() {
    let mut stage = closed();
    stage.doc.log_mut().clear();
    assert_eq!(
        stage.hide("p"),
        TransitionOutcome::Ignored(IgnoreReason::AlreadyCollapsed)
    );
    assert!(stage.doc.log().is_empty());
}

// ---------------------------------------------------------------------------
// Re-entrancy and toggle
// ---------------------------------------------------------------------------

#[test]
fn no_second_transition_while_transitioning() {
    let mut stage = closed();
    let _ = stage.show("p");
    let transitioning = TransitionOutcome::Ignored(IgnoreReason::Transitioning);
    assert_eq!(stage.show("p"), transitioning);
    assert_eq!(stage.hide("p"), transitioning);
    assert_eq!(stage.toggle("p"), transitioning);
    assert_eq!(stage.doc.log().count("p", CollapseEvent::ShowRequested), 1);
    assert_eq!(stage.doc.log().count("p", CollapseEvent::HideRequested), 0);
}

#[test]
fn toggle_matches_show_and_hide() {
    let mut via_toggle = closed();
    let mut via_show = closed();
    assert_eq!(via_toggle.toggle("p"), via_show.show("p"));
    assert_eq!(via_toggle.state("p"), via_show.state("p"));
    assert_eq!(
        via_toggle.doc.log().entries(),
        via_show.doc.log().entries()
    );

    let mut via_toggle = open();
    let mut via_hide = open();
    assert_eq!(via_toggle.toggle("p"), via_hide.hide("p"));
    assert_eq!(via_toggle.state("p"), Some(LifecycleState::Collapsing));
    assert_eq!(
        via_toggle.doc.log().entries(),
        via_hide.doc.log().entries()
    );
}

#[test]
fn unattached_panels_are_ignored() {
    let mut stage = closed();
    let not_attached = TransitionOutcome::Ignored(IgnoreReason::NotAttached);
    assert_eq!(stage.show("nope"), not_attached);
    assert_eq!(stage.hide("nope"), not_attached);
    assert_eq!(stage.toggle("nope"), not_attached);
}

// ---------------------------------------------------------------------------
// Attach / detach
// ---------------------------------------------------------------------------

#[test]
fn attach_toggles_by_default() {
    init_test_logging();
    let mut stage = Stage::new(fixtures::single("p", false));
    assert_eq!(
        stage.attach("p", CollapseConfig::default()),
        Some(TransitionOutcome::Started)
    );
    assert_eq!(stage.state("p"), Some(LifecycleState::Expanding));
    assert!(
        stage
            .collapse
            .panel(&ElementId::from("p"))
            .is_some_and(|p| p.auto_open_on_init())
    );

    // Second attach is a no-op.
    assert_eq!(stage.attach("p", CollapseConfig::default()), None);

    let mut expanded = Stage::new(fixtures::single("q", true));
    assert_eq!(
        expanded.attach("q", CollapseConfig::default()),
        Some(TransitionOutcome::Started)
    );
    assert_eq!(expanded.state("q"), Some(LifecycleState::Collapsing));
}

#[test]
fn attach_reads_axis_and_state_from_surface() {
    let stage = stage_with(fixtures::single_horizontal("w", true), &["w"]);
    let id = ElementId::from("w");
    assert_eq!(stage.collapse.dimension(&id), Some(Dimension::Width));
    assert_eq!(stage.state("w"), Some(LifecycleState::Expanded));
    assert_eq!(stage.indicator("w-toggle"), Some(true));
    assert!(!stage.marked_collapsed("w-toggle"));
}

#[test]
fn width_panels_animate_width_only() {
    let mut stage = stage_with(fixtures::single_horizontal("w", false), &["w"]);
    let _ = stage.show("w");
    assert_eq!(
        stage.size_override("w", Dimension::Width),
        SizeOverride::Px(100.0)
    );
    assert_eq!(
        stage.size_override("w", Dimension::Height),
        SizeOverride::Auto
    );
}

#[test]
fn detach_cancels_pending_completion() {
    let mut stage = closed();
    let _ = stage.show("p");
    assert_eq!(stage.doc.clock().pending(), 1);

    assert!(stage.detach("p"));
    assert_eq!(stage.doc.clock().pending(), 0);
    assert!(!stage.doc.is_watching(&ElementId::from("p")));
    assert_eq!(stage.settle(), 0);
    assert_eq!(stage.state("p"), None);
    assert!(!stage.detach("p"));
}

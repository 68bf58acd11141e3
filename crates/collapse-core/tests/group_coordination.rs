#![forbid(unsafe_code)]

//! Accordion behavior: sibling closing, the transition gate, and indicator
//! seeding at attach time.

use collapse_core::{
    CollapseConfig, CollapseEvent, ElementId, GroupScope, IgnoreReason, LifecycleState,
    TransitionOutcome,
};
use collapse_harness::{FakeElement, Stage, fixtures, init_test_logging};

fn grouped(scope: &str) -> CollapseConfig {
    CollapseConfig::default()
        .toggle(false)
        .parent(GroupScope::parse(&format!("#{scope}")).expect("valid scope"))
}

fn accordion(panels: &[(&str, bool)]) -> Stage {
    init_test_logging();
    let mut stage = Stage::new(fixtures::accordion("acc", panels));
    let ids: Vec<&str> = panels.iter().map(|(id, _)| *id).collect();
    stage.attach_quiet(&ids, &grouped("acc"));
    stage
}

#[test]
fn show_closes_every_open_sibling() {
    let mut stage = accordion(&[("a", true), ("b", true), ("c", false)]);

    assert_eq!(stage.show("c"), TransitionOutcome::Started);
    assert_eq!(stage.state("a"), Some(LifecycleState::Collapsing));
    assert_eq!(stage.state("b"), Some(LifecycleState::Collapsing));
    assert_eq!(stage.state("c"), Some(LifecycleState::Expanding));

    assert_eq!(stage.settle(), 3);
    assert_eq!(stage.state("a"), Some(LifecycleState::Collapsed));
    assert_eq!(stage.state("b"), Some(LifecycleState::Collapsed));
    assert_eq!(stage.state("c"), Some(LifecycleState::Expanded));
    assert_eq!(stage.indicator("a-toggle"), Some(false));
    assert_eq!(stage.indicator("b-toggle"), Some(false));
    assert_eq!(stage.indicator("c-toggle"), Some(true));
}

#[test]
fn sibling_hide_requested_before_own_geometry() {
    let mut stage = accordion(&[("a", true), ("b", false)]);

    let _ = stage.show("b");
    let order: Vec<(String, &str)> = stage
        .doc
        .log()
        .entries()
        .iter()
        .map(|e| (e.panel.clone(), e.event))
        .collect();
    assert_eq!(
        order,
        vec![
            ("b".to_string(), "show.collapse"),
            ("a".to_string(), "hide.collapse"),
        ]
    );
    assert_eq!(stage.state("a"), Some(LifecycleState::Collapsing));

    // Completions may arrive in any order.
    assert!(stage.end_transition("b"));
    assert!(stage.end_transition("a"));
    assert_eq!(stage.state("a"), Some(LifecycleState::Collapsed));
    assert_eq!(stage.state("b"), Some(LifecycleState::Expanded));
}

#[test]
fn transitioning_sibling_blocks_show() {
    let mut stage = accordion(&[("a", true), ("b", false), ("c", false)]);
    let _ = stage.show("b");

    assert_eq!(
        stage.show("c"),
        TransitionOutcome::Ignored(IgnoreReason::SiblingTransitioning(ElementId::from("b")))
    );
    assert_eq!(stage.state("c"), Some(LifecycleState::Collapsed));
    assert_eq!(stage.doc.log().count("c", CollapseEvent::ShowRequested), 0);

    stage.settle();
    assert_eq!(stage.show("c"), TransitionOutcome::Started);
    assert_eq!(stage.state("b"), Some(LifecycleState::Collapsing));
}

#[test]
fn collapsing_sibling_does_not_block() {
    let mut stage = accordion(&[("a", true), ("b", false)]);
    let _ = stage.hide("a");
    assert_eq!(stage.show("b"), TransitionOutcome::Started);
    assert_eq!(stage.doc.log().count("a", CollapseEvent::HideRequested), 1);
}

#[test]
fn prevented_show_leaves_siblings_open() {
    let mut stage = accordion(&[("a", true), ("b", false)]);
    stage.doc.prevent("b", CollapseEvent::ShowRequested);

    assert_eq!(stage.show("b"), TransitionOutcome::Prevented);
    assert_eq!(stage.state("a"), Some(LifecycleState::Expanded));
    assert_eq!(stage.doc.log().count("a", CollapseEvent::HideRequested), 0);
}

#[test]
fn prevented_sibling_hide_stays_open() {
    let mut stage = accordion(&[("a", true), ("b", false)]);
    stage.doc.prevent("a", CollapseEvent::HideRequested);

    assert_eq!(stage.show("b"), TransitionOutcome::Started);
    stage.settle();
    // The relaxation: the group ends with two open members.
    assert_eq!(stage.state("a"), Some(LifecycleState::Expanded));
    assert_eq!(stage.state("b"), Some(LifecycleState::Expanded));
}

#[test]
fn attach_seeds_group_indicators() {
    init_test_logging();
    let mut stage = Stage::new(fixtures::accordion("acc", &[("a", true), ("b", false)]));
    let _ = stage.attach("a", grouped("acc"));

    assert_eq!(stage.indicator("a-toggle"), Some(true));
    assert!(!stage.marked_collapsed("a-toggle"));
    assert_eq!(stage.indicator("b-toggle"), Some(false));
    assert!(stage.marked_collapsed("b-toggle"));
    assert_eq!(stage.attribute("b", "aria-expanded").as_deref(), Some("false"));
    assert!(!stage.collapse.is_attached(&ElementId::from("b")));
}

#[test]
fn attach_keeps_indicators_of_transitioning_siblings() {
    init_test_logging();
    let mut stage = Stage::new(fixtures::accordion(
        "acc",
        &[("a", true), ("b", false), ("c", false)],
    ));
    stage.attach_quiet(&["a", "b"], &grouped("acc"));
    let _ = stage.show("b");
    assert_eq!(stage.state("a"), Some(LifecycleState::Collapsing));

    // Seeding runs while `b` expands and `a` collapses.
    let _ = stage.attach("c", grouped("acc"));
    assert_eq!(stage.indicator("a-toggle"), Some(false));
    assert_eq!(stage.indicator("b-toggle"), Some(true));

    stage.settle();
    for (id, expanded) in [("a", false), ("b", true), ("c", false)] {
        let toggle = fixtures::toggle_id(id);
        assert_eq!(stage.indicator(&toggle), Some(expanded), "{id}");
        assert_eq!(stage.marked_collapsed(&toggle), !expanded, "{id}");
        let aria = stage.attribute(id, "aria-expanded");
        assert_eq!(aria.as_deref(), Some(if expanded { "true" } else { "false" }), "{id}");
    }
}

#[test]
fn unattached_open_sibling_is_attached_then_hidden() {
    init_test_logging();
    let mut stage = Stage::new(fixtures::accordion("acc", &[("a", true), ("b", false)]));
    let _ = stage.attach("b", grouped("acc"));

    assert_eq!(stage.show("b"), TransitionOutcome::Started);
    assert!(stage.collapse.is_attached(&ElementId::from("a")));
    assert_eq!(stage.state("a"), Some(LifecycleState::Collapsing));

    stage.settle();
    assert_eq!(stage.state("a"), Some(LifecycleState::Collapsed));
    assert_eq!(stage.state("b"), Some(LifecycleState::Expanded));
}

#[test]
fn nested_group_members_are_untouched() {
    init_test_logging();
    let mut doc = fixtures::accordion("acc", &[("a", true), ("b", false)]);
    fixtures::add_accordion(&mut doc, "inner", &[("x", true)]);
    doc.insert(FakeElement::new("inner").child_of("b"));

    let mut stage = Stage::new(doc);
    stage.attach_quiet(&["a", "b"], &grouped("acc"));
    stage.attach_quiet(&["x"], &grouped("inner"));

    let _ = stage.show("b");
    stage.settle();
    assert_eq!(stage.state("a"), Some(LifecycleState::Collapsed));
    assert_eq!(stage.state("b"), Some(LifecycleState::Expanded));
    assert_eq!(stage.state("x"), Some(LifecycleState::Expanded));
}

#[test]
fn ungrouped_panels_are_independent() {
    init_test_logging();
    let mut stage = Stage::new(fixtures::accordion("acc", &[("a", true), ("b", false)]));
    stage.attach_quiet(&["a", "b"], &CollapseConfig::default());

    let _ = stage.show("b");
    stage.settle();
    assert_eq!(stage.state("a"), Some(LifecycleState::Expanded));
    assert_eq!(stage.state("b"), Some(LifecycleState::Expanded));
}

#[test]
fn group_membership_is_recomputed_per_call() {
    let mut stage = accordion(&[("a", true), ("b", false)]);
    let removed = stage.doc.remove(&ElementId::from("a"));
    assert!(removed.is_some());

    assert_eq!(stage.show("b"), TransitionOutcome::Started);
    // `a` left the document, so it was not asked to close.
    assert_eq!(stage.state("a"), Some(LifecycleState::Expanded));
    assert_eq!(stage.doc.log().count("a", CollapseEvent::HideRequested), 0);
}

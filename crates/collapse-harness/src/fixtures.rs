#![forbid(unsafe_code)]

//! Canned documents.
//!
//! ```text
//! single("faq", false):
//!   #faq.collapse                     (natural height 100)
//!   #faq-toggle[data-toggle=collapse][data-target=#faq]
//!
//! accordion("acc", &[("a", true), ("b", false)]):
//!   #acc
//!     #a-item.panel
//!       #a-toggle[data-toggle=collapse][href=#a][data-parent=#acc]
//!       #a.collapse.in
//!     #b-item.panel
//!       #b-toggle[...href=#b...]
//!       #b.collapse
//! ```

use collapse_core::Dimension;

use crate::document::{FakeDocument, FakeElement, GROUP_ITEM_CLASS, TOGGLE_MARKER};

/// Natural size given to every fixture panel.
pub const PANEL_SIZE: f32 = 100.0;

/// Id of the trigger generated for `panel`.
#[must_use]
pub fn toggle_id(panel: &str) -> String {
    format!("{panel}-toggle")
}

fn panel(id: &str, open: bool) -> FakeElement {
    let el = FakeElement::new(id)
        .class("collapse")
        .natural(Dimension::Height, PANEL_SIZE)
        .natural(Dimension::Width, PANEL_SIZE);
    if open { el.class("in") } else { el }
}

/// A lone panel with one `data-target` trigger.
#[must_use]
pub fn single(id: &str, open: bool) -> FakeDocument {
    let mut doc = FakeDocument::new();
    doc.insert(panel(id, open)).insert(
        FakeElement::new(toggle_id(id))
            .attr("data-toggle", TOGGLE_MARKER)
            .attr("data-target", &format!("#{id}")),
    );
    doc
}

/// A lone width-animated panel with one `href` trigger.
#[must_use]
pub fn single_horizontal(id: &str, open: bool) -> FakeDocument {
    let mut doc = FakeDocument::new();
    doc.insert(panel(id, open).class("width")).insert(
        FakeElement::new(toggle_id(id))
            .attr("data-toggle", TOGGLE_MARKER)
            .attr("href", &format!("#{id}")),
    );
    doc
}

/// An accordion rooted at `#scope` with one item per `(id, open)` pair.
#[must_use]
pub fn accordion(scope: &str, panels: &[(&str, bool)]) -> FakeDocument {
    let mut doc = FakeDocument::new();
    add_accordion(&mut doc, scope, panels);
    doc
}

/// Append an accordion to an existing document.
pub fn add_accordion(doc: &mut FakeDocument, scope: &str, panels: &[(&str, bool)]) {
    let selector = format!("#{scope}");
    doc.insert(FakeElement::new(scope));
    for &(id, open) in panels {
        let item = format!("{id}-item");
        doc.insert(FakeElement::new(item.as_str()).class(GROUP_ITEM_CLASS).child_of(scope))
            .insert(
                FakeElement::new(toggle_id(id))
                    .attr("data-toggle", TOGGLE_MARKER)
                    .attr("href", &format!("#{id}"))
                    .attr("data-parent", &selector)
                    .child_of(item.as_str()),
            )
            .insert(panel(id, open).child_of(item.as_str()));
    }
}

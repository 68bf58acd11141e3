#![forbid(unsafe_code)]

//! Test harness and reference fixtures for `collapse-core`.
//!
//! - [`FakeDocument`]: in-memory host implementing every collaborator trait,
//!   with trigger discovery by attribute the way a browser binding does it.
//! - [`VirtualClock`]: deterministic timer queue for fallback timers.
//! - [`EventLog`]: record of emitted lifecycle events, dumpable as JSONL.
//! - [`Stage`]: a `Collapse` registry bound to a `FakeDocument`, with helpers
//!   to deliver transition ends and advance time.
//! - [`fixtures`]: canned documents (single panel, accordion).

pub mod clock;
pub mod document;
pub mod event_log;
pub mod fixtures;
pub mod logging;
pub mod stage;

pub use clock::VirtualClock;
pub use document::{FakeDocument, FakeElement};
pub use event_log::{EventLog, LoggedEvent};
pub use logging::init_test_logging;
pub use stage::Stage;

#![forbid(unsafe_code)]

//! Core: animated collapse/expand state machine for grouped panels.
//!
//! # Role
//! `collapse-core` owns the rules for when a panel may start expanding or
//! collapsing, how transitions inside an accordion group are serialized,
//! how completion is detected, and how trigger accessibility state follows
//! panel state. Everything element-shaped (classes, attributes, sizes,
//! events, timers, trigger discovery) is reached through the collaborator
//! traits in [`host`].
//!
//! # Primary responsibilities
//! - **[`Collapse`]**: registry of attached panels and the transition driver
//!   (`show`, `hide`, `toggle`, completion delivery).
//! - **[`PanelState`]**: per-panel lifecycle record.
//! - **[`GroupCoordinator`] / [`ExclusivityPolicy`]**: accordion siblings.
//! - **[`trigger`]**: indicator sync and trigger target resolution.
//!
//! # Execution model
//! Single-threaded and callback-driven. `show`/`hide` return as soon as the
//! geometry change has been requested; completion arrives later through
//! [`Collapse::transition_ended`] or [`Collapse::timer_fired`], whichever the
//! host delivers first.

pub mod completion;
pub mod config;
pub mod driver;
pub mod error;
pub mod group;
pub mod host;
pub mod panel;
pub mod trigger;

pub use completion::{CompletionSource, CompletionToken, Phase, TRANSITION_DURATION};
pub use config::CollapseConfig;
pub use driver::{Collapse, Command, IgnoreReason, TransitionOutcome, TriggerActivation};
pub use error::CollapseError;
pub use group::{ActiveSibling, Admission, ExclusivityPolicy, GroupCoordinator, GroupScope};
pub use host::{
    CollapseEvent, ElementId, EventDisposition, Host, LifecycleEvents, SizeOverride, Surface,
    TimerId, TransitionSupport, TriggerDirectory,
};
pub use panel::{Dimension, LifecycleState, PanelState};
pub use trigger::TargetRef;

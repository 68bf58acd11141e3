#![forbid(unsafe_code)]

//! Errors raised at parsing boundaries.
//!
//! Transition operations never fail; they report a
//! [`TransitionOutcome`](crate::TransitionOutcome) instead.

use std::fmt;

/// Errors that can occur when building configuration or commands from text.
#[derive(Debug)]
pub enum CollapseError {
    /// A group scope selector was blank.
    EmptyScope,
    /// A command string was not one of `show`, `hide`, `toggle`.
    UnknownCommand(String),
    /// JSON configuration failed to parse.
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
}

impl fmt::Display for CollapseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyScope => write!(f, "group scope selector is empty"),
            Self::UnknownCommand(cmd) => write!(f, "unknown collapse command '{cmd}'"),
            #[cfg(feature = "serde")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for CollapseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "serde")]
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

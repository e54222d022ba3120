//! fOS Accessibility
//!
//! Accessibility vocabulary for the fOS browser engine.
//!
//! Features:
//! - ARIA roles and state attributes
//! - Tab index handling
//! - Roving focus over ordered widget groups

pub mod aria;
pub mod focus;

pub use aria::{AriaRole, aria_bool, parse_aria_bool};
pub use focus::{RovingFocus, TabIndex};

/// Accessibility error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum A11yError {
    #[error("Invalid ARIA role: {0}")]
    InvalidRole(String),
}

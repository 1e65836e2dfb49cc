//! Error types shared across the RealWorld crates

use thiserror::Error;

/// A validation failure attributed to a single input field.
///
/// Rendered on the wire as `{"errors": {"<field>": ["<message>"]}}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for the "can't be blank" failure
    pub fn blank(field: &'static str) -> Self {
        Self::new(field, "can't be blank")
    }

    /// Shorthand for a uniqueness violation
    pub fn taken(field: &'static str) -> Self {
        Self::new(field, "has already been taken")
    }
}

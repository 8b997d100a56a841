//! Error types for domain value object construction.

use thiserror::Error;

/// Errors that occur when a structured artifact fails its invariants.
///
/// Raised at the parse boundary: completion output that deserializes but
/// violates a declared bound never propagates past construction.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i32,
        max: i32,
        actual: i32,
    },

    #[error("Duplicate option label '{label}'")]
    DuplicateLabel { label: String },

    #[error("Recommended option '{label}' does not match any scenario option")]
    UnknownRecommendation { label: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
        }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i32, max: i32, actual: i32) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_displays_bounds() {
        let err = ValidationError::out_of_range("risk", 1, 5, 9);
        assert_eq!(
            err.to_string(),
            "Field 'risk' must be between 1 and 5, got 9"
        );
    }

    #[test]
    fn empty_field_names_the_field() {
        let err = ValidationError::empty_field("description");
        assert!(err.to_string().contains("description"));
    }
}

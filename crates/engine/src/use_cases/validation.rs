//! Common validation helpers for use cases.

use scenescript_domain::common::is_blank;

/// Validation error type.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{field_name} cannot be empty")]
    Empty { field_name: &'static str },

    #[error("{field_name} is invalid: {reason}")]
    Invalid { field_name: &'static str, reason: String },
}

/// Validate a string is non-empty after trimming.
pub fn require_non_empty(value: &str, field_name: &'static str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::Empty { field_name });
    }
    Ok(())
}

/// Validate an optional string is non-empty if present.
pub fn require_non_empty_if_present(
    value: &Option<String>,
    field_name: &'static str,
) -> Result<(), ValidationError> {
    if let Some(v) = value {
        require_non_empty(v, field_name)?;
    }
    Ok(())
}

/// Validate that a sheet has at least `min` columns.
pub fn require_min_columns(
    columns: usize,
    min: usize,
    field_name: &'static str,
) -> Result<(), ValidationError> {
    if columns < min {
        return Err(ValidationError::Invalid {
            field_name,
            reason: format!("at least {} columns are required, found {}", min, columns),
        });
    }
    Ok(())
}

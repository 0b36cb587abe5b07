//! Input validation predicates.

use crate::error::ApiError;

pub fn is_present<T>(value: Option<T>) -> bool {
    value.is_some()
}

pub fn is_non_empty_after_trim(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Returns the trimmed value of a required text field, or a validation
/// error carrying `message` when it is absent or blank.
pub fn required_field<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, ApiError> {
    if !is_present(value) {
        return Err(ApiError::validation(message));
    }
    value
        .filter(|v| is_non_empty_after_trim(v))
        .map(str::trim)
        .ok_or_else(|| ApiError::validation(message))
}

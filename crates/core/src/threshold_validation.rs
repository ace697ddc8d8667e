//! Shared range-checking helpers for engine configuration.

use crate::error::CoreError;
use crate::types::{SCORE_MAX, SCORE_MIN};

/// Validate that a threshold falls within `[0.0, 10.0]`.
///
/// Returns a `CoreError::Config` naming the field if out of range or `NaN`.
pub fn validate_score_range(value: f64, name: &str) -> Result<(), CoreError> {
    if !(SCORE_MIN..=SCORE_MAX).contains(&value) {
        return Err(CoreError::Config(format!(
            "{name} must be between {SCORE_MIN} and {SCORE_MAX}, got {value}"
        )));
    }
    Ok(())
}

/// Validate that no entry of a keyword/indicator list is blank.
pub fn validate_term_list(terms: &[String], name: &str) -> Result<(), CoreError> {
    if let Some(pos) = terms.iter().position(|t| t.trim().is_empty()) {
        return Err(CoreError::Config(format!(
            "{name} contains a blank entry at position {pos}"
        )));
    }
    Ok(())
}

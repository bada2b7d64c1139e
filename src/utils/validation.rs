//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! CRUD handlers. The document store has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: event titles, organization names, ticket types, genres, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, rejection reasons, notes
pub const MAX_TEXT_LEN: usize = 2000;

/// Short identifiers: phone numbers, venue names, social handles
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_rejects_empty() {
        assert!(validate_required_text("", "title", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("   ", "title", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Summer Fest", "title", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn test_required_text_rejects_overflow() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "title", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "note", MAX_TEXT_LEN).is_ok());
        assert!(validate_optional_text(&Some("ok".into()), "note", MAX_TEXT_LEN).is_ok());
        let long = Some("x".repeat(MAX_TEXT_LEN + 1));
        assert!(validate_optional_text(&long, "note", MAX_TEXT_LEN).is_err());
    }
}

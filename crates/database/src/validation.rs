//! Input validation for create and update payloads.
//!
//! Every check runs before a statement touches storage. Failures are reported
//! as [`ValidationError`] and surface to HTTP clients as 400 responses.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field absent from the payload.
    Missing(String),
    /// Required text field present but blank.
    Empty(String),
    /// Invalid email format.
    InvalidEmail(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Value present but outside the accepted domain.
    Invalid { field: String, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Missing(field) => write!(f, "{} is required", field),
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Invalid { field, reason } => write!(f, "Invalid {}: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 100;

/// Unwrap a required field, reporting it by its wire name when absent.
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::Missing(field.to_string()))
}

/// Validate a required text field: present, not blank, within `max` chars.
pub fn require_text(value: Option<&str>, field: &str, max: usize) -> Result<(), ValidationError> {
    let value = require(value, field)?;
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }
    check_length(Some(value), field, max)
}

/// Validate an optional text field's length. Absent values always pass.
pub fn check_length(value: Option<&str>, field: &str, max: usize) -> Result<(), ValidationError> {
    if let Some(value) = value {
        let actual = value.chars().count();
        if actual > max {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max,
                actual,
            });
        }
    }
    Ok(())
}

/// Validate that an owning person id looks like a stored surrogate key.
pub fn check_person_id(person_id: Option<i64>) -> Result<i64, ValidationError> {
    let person_id = require(person_id, "usuarioId")?;
    if person_id <= 0 {
        return Err(ValidationError::Invalid {
            field: "usuarioId".to_string(),
            reason: "must be a positive id".to_string(),
        });
    }
    Ok(person_id)
}

/// Validate an email address (basic RFC 5322 format check).
///
/// This is a basic validation that checks:
/// - Contains exactly one @
/// - Has at least one character before and after the @
/// - Has at least one dot after the @, not at either end
/// - Is not too long
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail(
            "must contain an @ symbol".to_string(),
        ));
    };

    if domain.contains('@') {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    }

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing local part (before @)".to_string(),
        ));
    }

    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail(
            "cannot contain whitespace".to_string(),
        ));
    }

    if domain.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing domain (after @)".to_string(),
        ));
    }

    if !domain.contains('.') {
        return Err(ValidationError::InvalidEmail(
            "domain must contain at least one dot".to_string(),
        ));
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail(
            "domain cannot start or end with a dot".to_string(),
        ));
    }

    if domain.contains("..") {
        return Err(ValidationError::InvalidEmail(
            "domain cannot contain consecutive dots".to_string(),
        ));
    }

    Ok(())
}

/// Validate a Brazilian postal code (CEP): exactly eight ASCII digits.
pub fn validate_postal_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != 8 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::Invalid {
            field: "cep".to_string(),
            reason: "must have exactly 8 digits".to_string(),
        });
    }
    Ok(())
}

/// Validate a free-text search term.
pub fn validate_search_term(term: Option<&str>) -> Result<&str, ValidationError> {
    match term.map(str::trim) {
        Some(term) if !term.is_empty() => Ok(term),
        Some(_) => Err(ValidationError::Empty("term".to_string())),
        None => Err(ValidationError::Missing("term".to_string())),
    }
}

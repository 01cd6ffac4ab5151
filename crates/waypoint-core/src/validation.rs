//! Validation utilities.

use crate::{FieldError, WaypointError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `WaypointError` on failure.
    fn validate_request(&self) -> Result<(), WaypointError> {
        self.validate().map_err(validation_errors_to_waypoint_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `WaypointError`.
#[must_use]
pub fn validation_errors_to_waypoint_error(errors: ValidationErrors) -> WaypointError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    WaypointError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates a login: 3-64 characters, no whitespace.
    pub fn valid_login(login: &str) -> Result<(), ValidationError> {
        let len = login.chars().count();
        if len < 3 {
            return Err(ValidationError::new("login_too_short"));
        }
        if len > 64 {
            return Err(ValidationError::new("login_too_long"));
        }
        if login.chars().any(char::is_whitespace) {
            return Err(ValidationError::new("login_contains_whitespace"));
        }
        Ok(())
    }

    /// Validates an email address after the same trimming and lower-casing
    /// that [`crate::Email`] applies.
    pub fn valid_email(email: &str) -> Result<(), ValidationError> {
        crate::Email::new(email)
            .map(|_| ())
            .map_err(|_| ValidationError::new("email"))
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_valid_login() {
        assert!(valid_login("morzevichka").is_ok());
        assert!(valid_login("ab").is_err());
        assert!(valid_login("john doe").is_err());
        assert!(valid_login(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_valid_email_accepts_padded_mixed_case() {
        assert!(valid_email(" New@Example.com ").is_ok());
        assert!(valid_email("rider@example.com").is_ok());
        assert!(valid_email("   ").is_err());
        assert!(valid_email("not-an-email").is_err());
    }
}

//! Validation for sign-in input

use super::Credentials;
use serde::{Deserialize, Serialize};

/// A field that failed validation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate sign-in credentials and return every failing field
///
/// An empty result means the form may be submitted.
pub fn validate_credentials(credentials: &Credentials) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let email = credentials.email.trim();
    if email.is_empty() {
        errors.push(ValidationError::new("email", "Email is required"));
    } else if !is_plausible_email(email) {
        errors.push(ValidationError::new("email", "Email address is malformed"));
    }

    if credentials.password.is_empty() {
        errors.push(ValidationError::new("password", "Password is required"));
    }

    errors
}

/// Same shape check a browser applies to `type="email"` inputs: one `@`,
/// non-empty local part, dotted or plain non-empty domain, no whitespace.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_credentials() {
        let creds = Credentials::new("user@example.com", "secret");
        assert!(validate_credentials(&creds).is_empty());
    }

    #[test]
    fn missing_fields() {
        let errors = validate_credentials(&Credentials::new("", ""));
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[test]
    fn malformed_email() {
        for email in ["userexample.com", "a@b@c", "@example.com", "user@", "us er@x.y", "u@.x"] {
            let errors = validate_credentials(&Credentials::new(email, "pw"));
            assert_eq!(errors.len(), 1, "expected {} to be rejected", email);
            assert_eq!(errors[0].field, "email");
        }
    }

    #[test]
    fn display() {
        let err = ValidationError::new("email", "Email is required");
        assert_eq!(err.to_string(), "email: Email is required");
    }
}

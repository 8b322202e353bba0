//! Client error taxonomy.

use marker_domain::ValidationError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Request rejected by the backend or the connection failed.
    #[error("Network failure: {0}")]
    Network(String),

    /// Input rejected locally, before anything was dispatched or sent.
    #[error("Invalid input: {}", describe(.0))]
    Validation(Vec<ValidationError>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub fn network(error: impl std::fmt::Display) -> Self {
        ClientError::Network(error.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_fields() {
        let err = ClientError::Validation(vec![
            ValidationError::new("email", "is required"),
            ValidationError::new("password", "is required"),
        ]);
        let message = err.to_string();
        assert!(message.contains("email"));
        assert!(message.contains("password"));
    }
}

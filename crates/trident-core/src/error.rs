// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Trident gateway.

use thiserror::Error;

use crate::types::RecordId;

/// The primary error type used across all Trident crates.
///
/// The first five caller-facing variants map one-to-one onto HTTP status
/// codes at the gateway boundary; the remaining variants are internal and
/// surface to callers as a generic failure.
#[derive(Debug, Error)]
pub enum TridentError {
    /// Missing, malformed, unknown, or revoked bearer token.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The caller is authenticated but not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Transient unavailability (simulated upstream failure, scheduler at capacity).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Malformed or missing request fields.
    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// The referenced record does not exist (or is not visible to the caller).
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A mutation was attempted on a record that has reached a terminal state.
    #[error("{entity} {id} is in a terminal state")]
    TerminalState { entity: &'static str, id: RecordId },

    /// Configuration errors (invalid TOML, failed validation).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TridentError {
    /// Shorthand for an [`InvalidInput`](Self::InvalidInput) tied to a request field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    /// Shorthand for a [`NotFound`](Self::NotFound) error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether this error is caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated(_)
                | Self::Forbidden(_)
                | Self::InvalidInput { .. }
                | Self::NotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_field_carries_field_name() {
        let err = TridentError::invalid_field("content", "must not be empty");
        match err {
            TridentError::InvalidInput { message, field } => {
                assert_eq!(message, "must not be empty");
                assert_eq!(field.as_deref(), Some("content"));
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn not_found_display_names_entity() {
        let err = TridentError::not_found("image job", 42);
        assert_eq!(err.to_string(), "image job 42 not found");
    }

    #[test]
    fn client_error_classification() {
        assert!(TridentError::Unauthenticated("x".into()).is_client_error());
        assert!(TridentError::not_found("message", 1).is_client_error());
        assert!(!TridentError::ServiceUnavailable("x".into()).is_client_error());
        assert!(!TridentError::Internal("x".into()).is_client_error());
        assert!(
            !TridentError::Storage {
                source: Box::new(std::io::Error::other("disk")),
            }
            .is_client_error()
        );
    }
}

// ABOUTME: Unified error handling for the larder backend
// ABOUTME: Defines the error taxonomy, HTTP status mapping, and the boundary response format

//! # Unified Error Handling
//!
//! Every fallible operation in the crate returns [`AppResult`]. The taxonomy
//! is deliberately small:
//!
//! - [`AppError::Validation`] — field-scoped input problems, surfaced as a
//!   field → message map rather than a generic failure
//! - [`AppError::Forbidden`] — the caller exists but may not perform the
//!   action (non-owner edits, REMOTE-origin mutations)
//! - [`AppError::NotFound`] — the referenced entity does not exist at all
//! - [`AppError::Database`] / [`AppError::Serialization`] /
//!   [`AppError::Internal`] — infrastructure failures
//!
//! Upstream (TheMealDB) degradation is intentionally absent: the gateway
//! absorbs remote failures and returns empty results instead of erroring.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name → human readable message, ordered for stable output.
pub type FieldErrors = BTreeMap<String, String>;

/// Unified error type for the application
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed field-level validation
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    /// The caller is not allowed to perform this action
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The referenced entity does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Underlying storage failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON encoding/decoding failure (cache payloads, boundary data)
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything else that should never reach a caller as-is
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation error scoped to a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), message.into());
        Self::Validation(errors)
    }

    /// Forbidden action
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// Missing entity, named by what was looked up (e.g. "recipe ABC123")
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Internal error from a plain message
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status code a transport layer should map this error to
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_) => 500,
        }
    }

    /// Field errors carried by a validation failure, if any
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> Self {
        Self::Internal(format!("password hashing failed: {error}"))
    }
}

/// Result type alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Boundary-facing error envelope
///
/// Infrastructure variants collapse to a generic message so storage details
/// never leak to callers; validation errors keep their per-field messages.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind
    pub error: String,
    /// Human-readable summary
    pub message: String,
    /// Per-field messages for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation(fields) => Self {
                error: "validation_error".into(),
                message: "One or more fields are invalid".into(),
                fields: Some(fields),
            },
            AppError::Forbidden(message) => Self {
                error: "forbidden".into(),
                message,
                fields: None,
            },
            AppError::NotFound(resource) => Self {
                error: "not_found".into(),
                message: format!("{resource} not found"),
                fields: None,
            },
            AppError::Database(_) | AppError::Serialization(_) | AppError::Internal(_) => Self {
                error: "internal_error".into(),
                message: "An internal error occurred".into(),
                fields: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(AppError::validation("title", "required").http_status(), 400);
        assert_eq!(AppError::forbidden("not yours").http_status(), 403);
        assert_eq!(AppError::not_found("recipe X").http_status(), 404);
        assert_eq!(AppError::internal("boom").http_status(), 500);
    }

    #[test]
    fn test_validation_response_keeps_fields() {
        let error = AppError::validation("ingredients", "Please provide at least one entry.");
        let response = ErrorResponse::from(error);
        assert_eq!(response.error, "validation_error");
        let fields = response.fields.expect("validation response carries fields");
        assert_eq!(
            fields.get("ingredients").map(String::as_str),
            Some("Please provide at least one entry.")
        );
    }

    #[test]
    fn test_internal_response_hides_details() {
        let error = AppError::internal("connection pool exhausted at 10.0.0.3");
        let response = ErrorResponse::from(error);
        assert_eq!(response.message, "An internal error occurred");
    }
}

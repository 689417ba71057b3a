//! Platform Error Types
//!
//! Errors raised by the collaborators (record stores, bridge dispatcher,
//! authentication). Use cases translate these into `UseCaseError`s.

use thiserror::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response, Json},
};

use crate::usecase::UseCaseError;

/// MongoDB duplicate key error code
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Duplicate entity: {entity_type} with {field}={value}")]
    Duplicate { entity_type: String, field: String, value: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authorization error: {message}")]
    Unauthorized { message: String },

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bson::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Dispatch error: {message}")]
    Dispatch { message: String },

    /// The bridge accepted a request but its answer could not be read; the
    /// entity may exist without the caller knowing its identifier.
    #[error("Bridge outcome unknown: {message}")]
    BridgeOutcomeUnknown { message: String },

    /// The bridge no longer knows the entity. Deregistration treats this as done.
    #[error("Bridge entity already gone: {matrix_id}")]
    BridgeEntityGone { matrix_id: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlatformError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(entity_type: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Whether this is a uniqueness violation reported by the store.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Translate a MongoDB write error, mapping duplicate key violations
    /// on `field` to `Duplicate`.
    pub fn from_write_error(
        err: mongodb::error::Error,
        entity_type: &str,
        field: &str,
        value: &str,
    ) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        if let ErrorKind::Write(WriteFailure::WriteError(ref write_error)) = *err.kind {
            if write_error.code == DUPLICATE_KEY_CODE {
                return Self::duplicate(entity_type, field, value);
            }
        }
        Self::Database(err)
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Error response body
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            PlatformError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            PlatformError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE"),
            PlatformError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            PlatformError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        // Internal failures never leak collaborator details to callers
        let message = if status.is_server_error() {
            "Internal error, try again later".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for UseCaseError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.is_client_error() {
            self.message().to_string()
        } else {
            "Request could not be completed, try again later".to_string()
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_duplicate() {
        assert!(PlatformError::duplicate("Application", "token", "abc").is_duplicate());
        assert!(!PlatformError::not_found("Application", "1").is_duplicate());
    }

    #[test]
    fn test_status_mapping() {
        let response = PlatformError::unauthorized("bad credentials").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = PlatformError::dispatch("homeserver down").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_use_case_error_status() {
        let response = UseCaseError::not_found("APPLICATION_NOT_FOUND", "missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = UseCaseError::store("STORE_UNAVAILABLE", "down").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

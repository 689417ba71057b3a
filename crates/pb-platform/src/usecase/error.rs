//! Use Case Errors
//!
//! Categorized error types for use case failures. Every failure is either a
//! client error (the caller must change its input) or a server error (a
//! collaborator failed; the request may succeed if retried).
//!
//! ```ignore
//! use pb_platform::{details, usecase::UseCaseError};
//!
//! UseCaseError::validation("NAME_REQUIRED", "Application name is required");
//!
//! UseCaseError::store_with_details(
//!     "ORPHANED_BRIDGE_REGISTRATION",
//!     "Application registered on the bridge but could not be stored",
//!     details! { "matrixId" => matrix_id },
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Macro for creating error detail maps.
#[macro_export]
macro_rules! details {
    () => {
        std::collections::HashMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = std::collections::HashMap::new();
        $(
            map.insert($key.to_string(), serde_json::json!($value));
        )+
        map
    }};
}

/// Outcome classification of a failed use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorClass {
    /// Invalid or non-existent input; not retryable without changing it.
    Client,
    /// Internal or collaborator failure; potentially retryable.
    Server,
}

/// Categorized error types for use case failures.
///
/// - `ValidationError` -> 400 Bad Request
/// - `NotFoundError` -> 404 Not Found
/// - `DispatcherError` -> 500 Internal Server Error
/// - `StoreError` -> 500 Internal Server Error
/// - `ExhaustionError` -> 500 Internal Server Error
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UseCaseError {
    /// Malformed or missing input.
    ValidationError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    /// Referenced entity does not exist.
    NotFoundError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    /// The bridge dispatcher failed.
    DispatcherError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    /// The record store failed.
    StoreError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    /// No unused token could be found within the attempt limit.
    ExhaustionError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },
}

impl UseCaseError {
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFoundError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn not_found_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::NotFoundError {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn dispatcher(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DispatcherError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn dispatcher_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::DispatcherError {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn store(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn store_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::StoreError {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn exhausted(message: impl Into<String>) -> Self {
        Self::ExhaustionError {
            code: "TOKEN_SPACE_EXHAUSTED".to_string(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> &str {
        match self {
            Self::ValidationError { code, .. } => code,
            Self::NotFoundError { code, .. } => code,
            Self::DispatcherError { code, .. } => code,
            Self::StoreError { code, .. } => code,
            Self::ExhaustionError { code, .. } => code,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. } => message,
            Self::NotFoundError { message, .. } => message,
            Self::DispatcherError { message, .. } => message,
            Self::StoreError { message, .. } => message,
            Self::ExhaustionError { message, .. } => message,
        }
    }

    /// Get the error details.
    pub fn details(&self) -> &HashMap<String, serde_json::Value> {
        match self {
            Self::ValidationError { details, .. } => details,
            Self::NotFoundError { details, .. } => details,
            Self::DispatcherError { details, .. } => details,
            Self::StoreError { details, .. } => details,
            Self::ExhaustionError { details, .. } => details,
        }
    }

    pub fn classification(&self) -> ErrorClass {
        match self {
            Self::ValidationError { .. } | Self::NotFoundError { .. } => ErrorClass::Client,
            Self::DispatcherError { .. }
            | Self::StoreError { .. }
            | Self::ExhaustionError { .. } => ErrorClass::Server,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.classification() == ErrorClass::Client
    }

    pub fn is_server_error(&self) -> bool {
        self.classification() == ErrorClass::Server
    }

    /// Get the suggested HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ValidationError { .. } => 400,
            Self::NotFoundError { .. } => 404,
            Self::DispatcherError { .. } => 500,
            Self::StoreError { .. } => 500,
            Self::ExhaustionError { .. } => 500,
        }
    }
}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for UseCaseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = UseCaseError::validation("NAME_REQUIRED", "Application name is required");
        assert_eq!(err.code(), "NAME_REQUIRED");
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.classification(), ErrorClass::Client);
    }

    #[test]
    fn test_not_found_is_client_error() {
        let err = UseCaseError::not_found("APPLICATION_NOT_FOUND", "Application not found");
        assert!(err.is_client_error());
        assert_eq!(err.http_status_code(), 404);
    }

    #[test]
    fn test_collaborator_errors_are_server_errors() {
        assert!(UseCaseError::dispatcher("BRIDGE_REGISTRATION_FAILED", "down").is_server_error());
        assert!(UseCaseError::store("STORE_UNAVAILABLE", "down").is_server_error());
        assert!(UseCaseError::exhausted("no token").is_server_error());
    }

    #[test]
    fn test_store_error_with_details() {
        let err = UseCaseError::store_with_details(
            "ORPHANED_BRIDGE_REGISTRATION",
            "stored nothing",
            details! { "matrixId" => "!room:example.org" },
        );
        assert_eq!(
            err.details().get("matrixId"),
            Some(&serde_json::json!("!room:example.org"))
        );
        assert_eq!(err.to_string(), "[ORPHANED_BRIDGE_REGISTRATION] stored nothing");
    }

    #[test]
    fn test_details_macro_empty() {
        let details: HashMap<String, serde_json::Value> = details!();
        assert!(details.is_empty());
    }

    #[test]
    fn test_serialized_tag() {
        let err = UseCaseError::exhausted("no token");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "ExhaustionError");
        assert_eq!(json["code"], "TOKEN_SPACE_EXHAUSTED");
    }
}

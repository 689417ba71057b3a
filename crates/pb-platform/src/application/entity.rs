//! Application Entity
//!
//! A registered notification source: owned by a user, authenticated by a
//! secret token, and addressable on the bridge through its Matrix ID.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;

use crate::shared::error::{PlatformError, Result};

/// Persisted application.
///
/// Only record stores build this type, from a [`NewApplication`], so a stored
/// application always carries a token and a bridge identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// TSID assigned by the record store
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    /// Secret used by senders to push notifications
    pub token: String,

    /// Owning user, immutable after creation
    pub user_id: u64,

    /// Room the bridge registered for this application
    pub matrix_id: String,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// An application that has been registered on the bridge and is ready to be
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    name: String,
    token: String,
    user_id: u64,
    matrix_id: String,
}

impl NewApplication {
    pub fn new(
        name: impl Into<String>,
        token: impl Into<String>,
        user_id: u64,
        matrix_id: impl Into<String>,
    ) -> Result<Self> {
        let token = token.into();
        let matrix_id = matrix_id.into();

        if token.is_empty() {
            return Err(PlatformError::validation("Application token must not be empty"));
        }
        if matrix_id.is_empty() {
            return Err(PlatformError::validation("Application bridge identifier must not be empty"));
        }

        Ok(Self {
            name: name.into(),
            token,
            user_id,
            matrix_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn matrix_id(&self) -> &str {
        &self.matrix_id
    }

    /// Swap in a freshly generated token after an insert-time collision.
    pub fn with_token(self, token: impl Into<String>) -> Result<Self> {
        Self::new(self.name, token, self.user_id, self.matrix_id)
    }

    /// Materialize the record under the identifier the store assigned.
    pub fn into_application(self, id: impl Into<String>) -> Application {
        Application {
            id: id.into(),
            name: self.name,
            token: self.token,
            user_id: self.user_id,
            matrix_id: self.matrix_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_application_requires_bridge_identifier() {
        let result = NewApplication::new("weather-bot", "tok", 1, "");
        assert!(matches!(result, Err(PlatformError::Validation { .. })));
    }

    #[test]
    fn test_new_application_requires_token() {
        let result = NewApplication::new("weather-bot", "", 1, "!room:example.org");
        assert!(matches!(result, Err(PlatformError::Validation { .. })));
    }

    #[test]
    fn test_with_token_keeps_registration() {
        let app = NewApplication::new("weather-bot", "first", 1, "!room:example.org")
            .unwrap()
            .with_token("second")
            .unwrap();

        assert_eq!(app.token(), "second");
        assert_eq!(app.matrix_id(), "!room:example.org");
        assert_eq!(app.user_id(), 1);
    }

    #[test]
    fn test_into_application() {
        let app = NewApplication::new("weather-bot", "tok", 7, "!room:example.org")
            .unwrap()
            .into_application("0HZXEQ5Y8JY5Z");

        assert_eq!(app.id, "0HZXEQ5Y8JY5Z");
        assert_eq!(app.user_id, 7);
        assert_eq!(app.matrix_id, "!room:example.org");
    }

    #[test]
    fn test_bson_field_names() {
        let app = NewApplication::new("weather-bot", "tok", 7, "!room:example.org")
            .unwrap()
            .into_application("0HZXEQ5Y8JY5Z");

        let doc = bson::to_document(&app).unwrap();
        assert_eq!(doc.get_str("_id").unwrap(), "0HZXEQ5Y8JY5Z");
        assert_eq!(doc.get_str("matrixId").unwrap(), "!room:example.org");
        assert_eq!(doc.get_i64("userId").unwrap(), 7);
    }
}

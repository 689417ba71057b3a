//! HTTP Basic Authentication
//!
//! `Authenticated` resolves the acting user from the `Authorization` header.
//! The `AuthState` it needs is installed as a request extension by the
//! router.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, header::WWW_AUTHENTICATE, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::{debug, warn};

use crate::User;
use crate::auth::password_service::PasswordService;
use crate::shared::error::ErrorResponse;
use crate::user::UserRepository;

/// Services the extractor authenticates against
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<dyn UserRepository>,
    pub passwords: Arc<PasswordService>,
}

/// The authenticated user of the current request
pub struct Authenticated(pub User);

impl std::ops::Deref for Authenticated {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct AuthError {
    pub status: StatusCode,
    pub message: String,
}

impl AuthError {
    fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message,
        };

        let mut response = (self.status, Json(body)).into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Basic realm=\"pushbridge\""),
            );
        }
        response
    }
}

/// Decode `Basic <base64(name:password)>` into its two parts.
pub fn parse_basic_credentials(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?.trim();
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (name, password) = decoded.split_once(':')?;
    Some((name.to_string(), password.to_string()))
}

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts.extensions.get::<AuthState>()
            .cloned()
            .ok_or_else(|| AuthError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Authentication not configured".to_string(),
            })?;

        let (name, password) = parts.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_basic_credentials)
            .ok_or_else(|| AuthError::unauthorized("Missing or malformed credentials"))?;

        let user = match auth.users.find_by_name(&name).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!(name = %name, "Unknown user");
                return Err(AuthError::unauthorized("Invalid credentials"));
            }
            Err(e) => {
                warn!(error = %e, "User lookup failed during authentication");
                return Err(AuthError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal error, try again later".to_string(),
                });
            }
        };

        match auth.passwords.verify_password(&password, &user.password_hash) {
            Ok(true) => Ok(Authenticated(user)),
            Ok(false) => Err(AuthError::unauthorized("Invalid credentials")),
            Err(e) => {
                warn!(user_id = user.id, error = %e, "Stored password hash unusable");
                Err(AuthError::unauthorized("Invalid credentials"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_credentials() {
        let header = format!("Basic {}", STANDARD.encode("alice:s3cret:with:colons"));
        assert_eq!(
            parse_basic_credentials(&header),
            Some(("alice".to_string(), "s3cret:with:colons".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert_eq!(parse_basic_credentials("Bearer abc"), None);
        assert_eq!(parse_basic_credentials("Basic !!!"), None);
        assert_eq!(parse_basic_credentials(&format!("Basic {}", STANDARD.encode("nocolon"))), None);
    }
}

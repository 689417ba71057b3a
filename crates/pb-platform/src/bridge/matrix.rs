//! Matrix Dispatcher
//!
//! Each application gets a private room on the homeserver, created by the
//! bridge account with the owning user invited. Deregistration leaves and
//! forgets the room.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::ApplicationDispatcher;
use crate::shared::error::{PlatformError, Result};

const CLIENT_API_PREFIX: &str = "/_matrix/client/v3";

/// Matrix dispatcher configuration
#[derive(Debug, Clone)]
pub struct MatrixDispatcherConfig {
    /// Homeserver base URL
    pub homeserver: String,
    /// Access token of the bridge account
    pub access_token: String,
    /// Request timeout
    pub request_timeout: Duration,
}

impl Default for MatrixDispatcherConfig {
    fn default() -> Self {
        Self {
            homeserver: "http://localhost:8008".to_string(),
            access_token: String::new(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateRoomRequest<'a> {
    name: &'a str,
    preset: &'static str,
    invite: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct CreateRoomResponse {
    room_id: String,
}

/// Error body returned by the client-server API
#[derive(Debug, Default, Deserialize)]
struct MatrixErrorBody {
    #[serde(default)]
    errcode: String,
    #[serde(default)]
    error: String,
}

pub struct MatrixDispatcher {
    config: MatrixDispatcherConfig,
    client: reqwest::Client,
}

impl MatrixDispatcher {
    pub fn new(config: MatrixDispatcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.config.homeserver.trim_end_matches('/'),
            CLIENT_API_PREFIX,
            path
        )
    }

    fn room_endpoint(&self, room_id: &str, action: &str) -> String {
        self.endpoint(&format!("/rooms/{}/{}", urlencoding::encode(room_id), action))
    }

    async fn post_room_action(&self, room_id: &str, action: &str) -> Result<reqwest::Response> {
        let response = self.client
            .post(self.room_endpoint(room_id, action))
            .bearer_auth(&self.config.access_token)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Ok(response)
    }
}

async fn dispatch_error(operation: &str, response: reqwest::Response) -> PlatformError {
    let status = response.status();
    let body = response.json::<MatrixErrorBody>().await.unwrap_or_default();

    PlatformError::dispatch(format!(
        "{} failed with HTTP {} ({}): {}",
        operation,
        status.as_u16(),
        if body.errcode.is_empty() { "M_UNKNOWN" } else { body.errcode.as_str() },
        body.error
    ))
}

#[async_trait]
impl ApplicationDispatcher for MatrixDispatcher {
    async fn register_application(&self, name: &str, owner_matrix_id: &str) -> Result<String> {
        let request = CreateRoomRequest {
            name,
            preset: "private_chat",
            invite: [owner_matrix_id],
        };

        debug!(owner = %owner_matrix_id, "Creating room for application");

        let response = self.client
            .post(self.endpoint("/createRoom"))
            .bearer_auth(&self.config.access_token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(dispatch_error("createRoom", response).await);
        }

        // A 2xx means the room was most likely created
        let created: CreateRoomResponse = match response.json().await {
            Ok(created) => created,
            Err(e) => {
                error!(
                    owner = %owner_matrix_id,
                    error = %e,
                    "createRoom succeeded but its response could not be read"
                );
                return Err(PlatformError::BridgeOutcomeUnknown {
                    message: format!("Unreadable createRoom response: {}", e),
                });
            }
        };
        info!(matrix_id = %created.room_id, "Created room for application");
        Ok(created.room_id)
    }

    async fn deregister_application(&self, matrix_id: &str) -> Result<()> {
        let response = self.post_room_action(matrix_id, "leave").await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                warn!(matrix_id, "Room already gone on the homeserver");
                return Err(PlatformError::BridgeEntityGone {
                    matrix_id: matrix_id.to_string(),
                });
            }
            _ => return Err(dispatch_error("leave", response).await),
        }

        let response = self.post_room_action(matrix_id, "forget").await?;
        if !response.status().is_success() {
            return Err(dispatch_error("forget", response).await);
        }

        info!(matrix_id, "Left and forgot application room");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_endpoint_encodes_room_id() {
        let dispatcher = MatrixDispatcher::new(MatrixDispatcherConfig {
            homeserver: "https://matrix.example.org/".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            dispatcher.room_endpoint("!abc:example.org", "leave"),
            "https://matrix.example.org/_matrix/client/v3/rooms/%21abc%3Aexample.org/leave"
        );
    }

    #[test]
    fn test_create_room_request_shape() {
        let request = CreateRoomRequest {
            name: "weather-bot",
            preset: "private_chat",
            invite: ["@alice:example.org"],
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["preset"], "private_chat");
        assert_eq!(json["invite"][0], "@alice:example.org");
    }
}

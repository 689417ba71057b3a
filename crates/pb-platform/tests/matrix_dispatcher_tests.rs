//! MatrixDispatcher Tests
//!
//! Tests for:
//! - Room creation on registration
//! - Leave and forget on deregistration
//! - Already-gone rooms
//! - Homeserver error mapping

use std::time::Duration;

use wiremock::matchers::{body_partial_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pb_platform::{ApplicationDispatcher, MatrixDispatcher, MatrixDispatcherConfig, PlatformError};

fn dispatcher(server: &MockServer) -> MatrixDispatcher {
    MatrixDispatcher::new(MatrixDispatcherConfig {
        homeserver: server.uri(),
        access_token: "bridge-token".to_string(),
        request_timeout: Duration::from_secs(2),
    })
    .unwrap()
}

#[tokio::test]
async fn test_register_creates_private_room() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_matrix/client/v3/createRoom"))
        .and(header("Authorization", "Bearer bridge-token"))
        .and(body_partial_json(serde_json::json!({
            "name": "weather-bot",
            "preset": "private_chat",
            "invite": ["@alice:example.org"],
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"room_id": "!abc:example.org"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let matrix_id = dispatcher(&server)
        .register_application("weather-bot", "@alice:example.org")
        .await
        .unwrap();

    assert_eq!(matrix_id, "!abc:example.org");
}

#[tokio::test]
async fn test_register_maps_homeserver_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_matrix/client/v3/createRoom"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "errcode": "M_LIMIT_EXCEEDED",
            "error": "Too many requests",
        })))
        .mount(&server)
        .await;

    let err = dispatcher(&server)
        .register_application("weather-bot", "@alice:example.org")
        .await
        .unwrap_err();

    match err {
        PlatformError::Dispatch { message } => {
            assert!(message.contains("M_LIMIT_EXCEEDED"));
            assert!(message.contains("429"));
        }
        other => panic!("Expected dispatch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_unreadable_success_is_outcome_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_matrix/client/v3/createRoom"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = dispatcher(&server)
        .register_application("weather-bot", "@alice:example.org")
        .await
        .unwrap_err();

    match err {
        PlatformError::BridgeOutcomeUnknown { message } => {
            assert!(message.contains("createRoom"));
        }
        other => panic!("Expected unknown outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_unreachable_homeserver() {
    let dispatcher = MatrixDispatcher::new(MatrixDispatcherConfig {
        homeserver: "http://127.0.0.1:1".to_string(),
        access_token: "bridge-token".to_string(),
        request_timeout: Duration::from_secs(2),
    })
    .unwrap();

    let result = dispatcher
        .register_application("weather-bot", "@alice:example.org")
        .await;

    assert!(matches!(result, Err(PlatformError::Http(_))));
}

#[tokio::test]
async fn test_deregister_leaves_and_forgets() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/_matrix/client/v3/rooms/[^/]+/leave$"))
        .and(header("Authorization", "Bearer bridge-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/_matrix/client/v3/rooms/[^/]+/forget$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    dispatcher(&server)
        .deregister_application("!abc:example.org")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_deregister_unknown_room_is_gone() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/_matrix/client/v3/rooms/[^/]+/leave$"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "errcode": "M_FORBIDDEN",
            "error": "User not in room",
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/_matrix/client/v3/rooms/[^/]+/forget$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = dispatcher(&server)
        .deregister_application("!abc:example.org")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlatformError::BridgeEntityGone { ref matrix_id } if matrix_id == "!abc:example.org"
    ));
}

#[tokio::test]
async fn test_deregister_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/_matrix/client/v3/rooms/[^/]+/leave$"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = dispatcher(&server)
        .deregister_application("!abc:example.org")
        .await
        .unwrap_err();

    assert!(matches!(err, PlatformError::Dispatch { .. }));
}

//! HTTP surface of the mock backend.

use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

use axum::extract::{ConnectInfo, Json, State};
use axum::routing::{get, post};
use axum::{Extension, Router};
use chatline_models::{ChatReply, ChatRequest, KeyStatus, StatusSnapshot};
use serde::Deserialize;
use tracing::info;

use crate::config::{AppConfig, UpstreamMode};
use crate::error::MockError;
use crate::replies::local_reply;

/// Word that makes `/chat` simulate an upstream failure.
pub const FAIL_TRIGGER: &str = "fail";
/// Word that makes `/chat` simulate quota exhaustion.
pub const QUOTA_TRIGGER: &str = "quota";

/// State shared across all handlers.
pub struct AppState {
    config: AppConfig,
    /// Runtime API key; swapped by the debug endpoints.
    api_key: RwLock<Option<String>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let api_key = RwLock::new(config.api_key.clone());
        Self { config, api_key }
    }

    fn has_key(&self) -> bool {
        self.api_key.read().is_ok_and(|k| k.is_some())
    }

    /// Configured mode while a key is set, echo otherwise.
    fn effective_mode(&self) -> UpstreamMode {
        if self.has_key() {
            self.config.mode
        } else {
            UpstreamMode::Echo
        }
    }

    fn set_key(&self, key: Option<String>) {
        if let Ok(mut slot) = self.api_key.write() {
            *slot = key;
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /chat`, lenient so a missing field reads as blank.
#[derive(Deserialize)]
struct IncomingChat {
    #[serde(default)]
    message: String,
}

/// Body of `POST /debug/set_key`.
#[derive(Deserialize)]
struct IncomingKey {
    #[serde(default)]
    api_key: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /status`
async fn status(State(state): State<Arc<AppState>>) -> Json<StatusSnapshot> {
    let mode = state.effective_mode();
    Json(StatusSnapshot {
        mode: Some(mode.to_string()),
        sdk_installed: Some(state.config.mode == UpstreamMode::Sdk),
        has_key: Some(state.has_key()),
        gemini_model: Some(state.config.model.clone()),
        gemini_url_set: Some(state.config.mode == UpstreamMode::Rest),
    })
}

/// `POST /chat`
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IncomingChat>,
) -> Result<Json<ChatReply>, MockError> {
    let request = ChatRequest::new(&body.message).map_err(|_| MockError::EmptyMessage)?;
    let message = request.message;
    let mode = state.effective_mode();
    info!(%mode, chars = message.chars().count(), "chat request");

    if mode == UpstreamMode::Echo {
        return Ok(Json(ChatReply {
            reply: local_reply(&message),
        }));
    }

    let lower = message.to_lowercase();
    if lower.contains(QUOTA_TRIGGER) {
        return Err(MockError::Quota {
            detail: format!("429 RESOURCE_EXHAUSTED for model {}", state.config.model),
            fallback_reply: local_reply(&message),
        });
    }
    if lower.contains(FAIL_TRIGGER) {
        return Err(MockError::Upstream {
            detail: format!("simulated {mode} failure"),
            fallback_reply: local_reply(&message),
        });
    }

    Ok(Json(ChatReply {
        reply: format!("[{}] {message}", state.config.model),
    }))
}

/// `POST /debug/set_key`
async fn set_key(
    State(state): State<Arc<AppState>>,
    peer: Option<Extension<ConnectInfo<SocketAddr>>>,
    Json(body): Json<IncomingKey>,
) -> Result<Json<KeyStatus>, MockError> {
    require_local(peer)?;
    let key = body.api_key.trim();
    if key.is_empty() {
        return Err(MockError::MissingKey);
    }
    state.set_key(Some(key.to_string()));
    info!("api key installed");
    Ok(Json(key_status(&state)))
}

/// `POST /debug/clear_key`
async fn clear_key(
    State(state): State<Arc<AppState>>,
    peer: Option<Extension<ConnectInfo<SocketAddr>>>,
) -> Result<Json<KeyStatus>, MockError> {
    require_local(peer)?;
    state.set_key(None);
    info!("api key cleared");
    Ok(Json(key_status(&state)))
}

fn key_status(state: &AppState) -> KeyStatus {
    KeyStatus {
        status: "ok".into(),
        gemini_key_set: state.has_key(),
    }
}

/// Debug endpoints only answer loopback peers. In-process callers carry
/// no peer address and are let through.
fn require_local(peer: Option<Extension<ConnectInfo<SocketAddr>>>) -> Result<(), MockError> {
    match peer {
        Some(Extension(ConnectInfo(addr))) if !addr.ip().is_loopback() => {
            Err(MockError::Forbidden)
        }
        _ => Ok(()),
    }
}

/// Build the router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/chat", post(chat))
        .route("/debug/set_key", post(set_key))
        .route("/debug/clear_key", post(clear_key))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chatline_models::ChatErrorBody;
    use serde_json::json;

    use super::*;

    fn server(mode: UpstreamMode, api_key: Option<&str>) -> TestServer {
        let config = AppConfig {
            listen_port: 0,
            mode,
            model: "test-model".into(),
            api_key: api_key.map(str::to_string),
        };
        TestServer::new(router(Arc::new(AppState::new(config)))).unwrap()
    }

    #[tokio::test]
    async fn status_without_key_is_echo() {
        let server = server(UpstreamMode::Sdk, None);
        let snap: StatusSnapshot = server.get("/status").await.json();
        assert_eq!(snap.mode.as_deref(), Some("echo"));
        assert_eq!(snap.has_key, Some(false));
        assert_eq!(snap.sdk_installed, Some(true));
        assert_eq!(snap.gemini_model.as_deref(), Some("test-model"));
    }

    #[tokio::test]
    async fn status_with_key_reports_configured_mode() {
        let server = server(UpstreamMode::Rest, Some("k"));
        let snap: StatusSnapshot = server.get("/status").await.json();
        assert_eq!(snap.mode.as_deref(), Some("rest"));
        assert_eq!(snap.gemini_url_set, Some(true));
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let server = server(UpstreamMode::Echo, None);
        let response = server.post("/chat").json(&json!({ "message": "   " })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "No message provided" }));
    }

    #[tokio::test]
    async fn missing_message_field_is_rejected() {
        let server = server(UpstreamMode::Echo, None);
        let response = server.post("/chat").json(&json!({})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn echo_mode_answers_locally() {
        let server = server(UpstreamMode::Echo, None);
        let response = server.post("/chat").json(&json!({ "message": "ping" })).await;
        response.assert_status_ok();
        let reply: ChatReply = response.json();
        assert_eq!(reply.reply, "Echo: ping");
    }

    #[tokio::test]
    async fn fail_word_is_ignored_without_upstream() {
        let server = server(UpstreamMode::Sdk, None);
        let response = server.post("/chat").json(&json!({ "message": "fail" })).await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn upstream_reply_names_the_model() {
        let server = server(UpstreamMode::Sdk, Some("k"));
        let reply: ChatReply = server
            .post("/chat")
            .json(&json!({ "message": "hello there" }))
            .await
            .json();
        assert_eq!(reply.reply, "[test-model] hello there");
    }

    #[tokio::test]
    async fn fail_word_simulates_upstream_error_with_fallback() {
        let server = server(UpstreamMode::Sdk, Some("k"));
        let response = server
            .post("/chat")
            .json(&json!({ "message": "please fail now" }))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: ChatErrorBody = response.json();
        assert_eq!(body.error.as_deref(), Some("Error contacting upstream"));
        assert_eq!(body.detail.as_deref(), Some("simulated sdk failure"));
        assert_eq!(body.fallback(), Some("Echo: please fail now"));
    }

    #[tokio::test]
    async fn quota_word_simulates_quota_error() {
        let server = server(UpstreamMode::Rest, Some("k"));
        let response = server
            .post("/chat")
            .json(&json!({ "message": "quota?" }))
            .await;
        response.assert_status(StatusCode::TOO_MANY_REQUESTS);

        let body: ChatErrorBody = response.json();
        assert_eq!(body.headline(), "Quota exceeded");
        assert_eq!(body.quota_action.as_deref(), Some("request_increase"));
        assert!(body.help.is_some());
        assert!(body.fallback().is_some());
    }

    #[tokio::test]
    async fn set_and_clear_key_switch_modes() {
        let server = server(UpstreamMode::Sdk, None);

        let status: KeyStatus = server
            .post("/debug/set_key")
            .json(&json!({ "api_key": "secret" }))
            .await
            .json();
        assert_eq!(status.status, "ok");
        assert!(status.gemini_key_set);
        let snap: StatusSnapshot = server.get("/status").await.json();
        assert_eq!(snap.mode.as_deref(), Some("sdk"));

        let status: KeyStatus = server.post("/debug/clear_key").await.json();
        assert!(!status.gemini_key_set);
        let snap: StatusSnapshot = server.get("/status").await.json();
        assert_eq!(snap.mode.as_deref(), Some("echo"));
    }

    #[tokio::test]
    async fn set_key_requires_a_key() {
        let server = server(UpstreamMode::Sdk, None);
        let response = server
            .post("/debug/set_key")
            .json(&json!({ "api_key": "  " }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "no api_key provided" }));
    }

    #[test]
    fn remote_peers_are_forbidden() {
        let remote: SocketAddr = "10.0.0.7:4000".parse().unwrap();
        let local: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        assert!(matches!(
            require_local(Some(Extension(ConnectInfo(remote)))),
            Err(MockError::Forbidden)
        ));
        assert!(require_local(Some(Extension(ConnectInfo(local)))).is_ok());
        assert!(require_local(None).is_ok());
    }
}

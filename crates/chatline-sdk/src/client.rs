//! HTTP client for the chat backend.
//!
//! [`ChatApiClient`] speaks plain JSON over HTTP to a single backend. It
//! never retries and sets no timeout: a request runs until the transport
//! resolves or fails.
//!
//! # Typical usage
//!
//! ```rust,no_run
//! use chatline_sdk::{ChatApiClient, ChatBackend};
//! use chatline_models::ChatOutcome;
//!
//! # async fn run() -> Result<(), chatline_sdk::SdkError> {
//! let client = ChatApiClient::from_url("http://127.0.0.1:5000")?;
//!
//! let status = client.status().await?;
//! println!("backend mode: {}", status.derived_mode());
//!
//! match client.chat("hola").await? {
//!     ChatOutcome::Reply(text) => println!("{text}"),
//!     ChatOutcome::Rejected { status, body } => println!("{status}: {}", body.headline()),
//! }
//! # Ok(())
//! # }
//! ```

use chatline_models::{
    BaseUrl, ChatErrorBody, ChatOutcome, ChatReply, ChatRequest, KeyStatus, SetKeyRequest,
    StatusSnapshot,
};
use tracing::{debug, warn};

use crate::backend::ChatBackend;
use crate::error::SdkError;

/// Path of the status endpoint.
pub const STATUS_PATH: &str = "/status";
/// Path of the chat endpoint.
pub const CHAT_PATH: &str = "/chat";
/// Path of the debug endpoint that installs an API key.
pub const SET_KEY_PATH: &str = "/debug/set_key";
/// Path of the debug endpoint that removes the API key.
pub const CLEAR_KEY_PATH: &str = "/debug/clear_key";

/// A client bound to one chat backend.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ChatApiClient {
    http: reqwest::Client,
    base: BaseUrl,
}

impl ChatApiClient {
    /// Create a client for an already validated base URL.
    pub fn new(base: BaseUrl) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    /// Validate `base_url` and create a client for it.
    pub fn from_url(base_url: &str) -> Result<Self, SdkError> {
        Ok(Self::new(BaseUrl::new(base_url)?))
    }

    /// The backend this client talks to.
    pub fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    // ------------------------------------------------------------------
    // Debug key management
    // ------------------------------------------------------------------

    /// Install an API key on the backend at runtime (`POST /debug/set_key`).
    ///
    /// The backend only honours this from localhost.
    pub async fn set_api_key(&self, api_key: &str) -> Result<KeyStatus, SdkError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(SdkError::Config("API key is empty".into()));
        }
        let res = self
            .http
            .post(self.base.join(SET_KEY_PATH))
            .json(&SetKeyRequest {
                api_key: api_key.to_string(),
            })
            .send()
            .await?;
        Self::key_status(res).await
    }

    /// Remove the backend's API key at runtime (`POST /debug/clear_key`).
    pub async fn clear_api_key(&self) -> Result<KeyStatus, SdkError> {
        let res = self
            .http
            .post(self.base.join(CLEAR_KEY_PATH))
            .send()
            .await?;
        Self::key_status(res).await
    }

    async fn key_status(res: reqwest::Response) -> Result<KeyStatus, SdkError> {
        let status = res.status();
        let bytes = res.bytes().await?;
        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }
        let body: ChatErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
        Err(SdkError::Refused {
            status: status.as_u16(),
            message: body.headline().to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ChatBackend for ChatApiClient {
    async fn status(&self) -> Result<StatusSnapshot, SdkError> {
        let res = self.http.get(self.base.join(STATUS_PATH)).send().await?;
        let status = res.status();
        if !status.is_success() {
            // The label is still derived from whatever JSON came back.
            warn!(status = %status, "status endpoint returned an error status");
        }
        let bytes = res.bytes().await?;
        let snapshot: StatusSnapshot = serde_json::from_slice(&bytes)?;
        debug!(mode = ?snapshot.mode, "status fetched");
        Ok(snapshot)
    }

    async fn chat(&self, message: &str) -> Result<ChatOutcome, SdkError> {
        let request = ChatRequest::new(message)?;
        let res = self
            .http
            .post(self.base.join(CHAT_PATH))
            .json(&request)
            .send()
            .await?;

        let status = res.status();
        let bytes = res.bytes().await?;

        if status.is_success() {
            let reply: ChatReply = serde_json::from_slice(&bytes)
                .map_err(|e| SdkError::UnexpectedResponse(format!("malformed chat reply: {e}")))?;
            debug!(status = %status, chars = reply.reply.len(), "chat reply received");
            return Ok(ChatOutcome::Reply(reply.reply));
        }

        let body: ChatErrorBody = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            debug!(error = %e, "error body is not JSON");
            ChatErrorBody::default()
        });
        warn!(status = %status, error = %body.headline(), "chat request rejected");
        Ok(ChatOutcome::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

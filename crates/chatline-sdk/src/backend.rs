//! The seam between the chat widget and the network.
//!
//! Front-ends depend on [`ChatBackend`] rather than on
//! [`ChatApiClient`](crate::ChatApiClient) directly so they can be driven by
//! an in-memory double in tests.

use chatline_models::{ChatOutcome, StatusSnapshot};

use crate::error::SdkError;

/// Operations the chat widget needs from a backend.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Fetch the backend's status snapshot (`GET /status`).
    async fn status(&self) -> Result<StatusSnapshot, SdkError>;

    /// Send one message (`POST /chat`).
    ///
    /// A non-2xx answer is `Ok(ChatOutcome::Rejected { .. })`; only
    /// transport failures and malformed success bodies are `Err`.
    async fn chat(&self, message: &str) -> Result<ChatOutcome, SdkError>;
}

#[async_trait::async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for std::sync::Arc<T> {
    async fn status(&self) -> Result<StatusSnapshot, SdkError> {
        (**self).status().await
    }

    async fn chat(&self, message: &str) -> Result<ChatOutcome, SdkError> {
        (**self).chat(message).await
    }
}

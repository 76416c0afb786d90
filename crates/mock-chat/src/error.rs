//! Error responses of the mock backend.
//!
//! [`MockError`] implements [`IntoResponse`] so handlers can return
//! `Result<…, MockError>` directly. Bodies use the same shape the real
//! backend sends ([`ChatErrorBody`]).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chatline_models::ChatErrorBody;

const QUOTA_HELP: &str =
    "Request more quota at https://cloud.google.com/docs/quotas/help/request_increase";

/// Failure modes the mock can produce.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// `/chat` was called with a blank message.
    #[error("No message provided")]
    EmptyMessage,

    /// `/debug/set_key` without an `api_key`.
    #[error("no api_key provided")]
    MissingKey,

    /// A debug endpoint was called from a non-local address.
    #[error("forbidden")]
    Forbidden,

    /// Simulated upstream failure, with a local answer to fall back on.
    #[error("Error contacting upstream")]
    Upstream {
        /// What went wrong upstream.
        detail: String,
        /// Locally computed answer.
        fallback_reply: String,
    },

    /// Simulated quota exhaustion.
    #[error("Quota exceeded")]
    Quota {
        /// Raw upstream message.
        detail: String,
        /// Locally computed answer.
        fallback_reply: String,
    },
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let error = Some(self.to_string());
        let (status, body) = match self {
            Self::EmptyMessage | Self::MissingKey => (
                StatusCode::BAD_REQUEST,
                ChatErrorBody {
                    error,
                    ..Default::default()
                },
            ),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                ChatErrorBody {
                    error,
                    detail: Some("only allowed from localhost".into()),
                    ..Default::default()
                },
            ),
            Self::Upstream {
                detail,
                fallback_reply,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ChatErrorBody {
                    error,
                    detail: Some(detail),
                    fallback_reply: Some(fallback_reply),
                    ..Default::default()
                },
            ),
            Self::Quota {
                detail,
                fallback_reply,
            } => (
                StatusCode::TOO_MANY_REQUESTS,
                ChatErrorBody {
                    error,
                    detail: Some(detail),
                    fallback_reply: Some(fallback_reply),
                    help: Some(QUOTA_HELP.into()),
                    quota_action: Some("request_increase".into()),
                    consumer_project: None,
                },
            ),
        };

        tracing::warn!(%status, error = %body.headline(), "request failed");
        (status, Json(body)).into_response()
    }
}

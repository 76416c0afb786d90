//! Chat exchange bodies.
//!
//! `POST /chat` takes a [`ChatRequest`] and answers either with a
//! [`ChatReply`] (2xx) or a [`ChatErrorBody`] (any other status). The SDK
//! folds both into a [`ChatOutcome`].

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Text shown when an error body carries neither `detail` nor `error`.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Body of `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// The user's message, already trimmed.
    pub message: String,
}

impl ChatRequest {
    /// Build a request from raw input, trimming surrounding whitespace.
    ///
    /// Returns [`ModelError::EmptyMessage`] when nothing is left.
    pub fn new(raw: &str) -> Result<Self, ModelError> {
        let message = raw.trim();
        if message.is_empty() {
            return Err(ModelError::EmptyMessage);
        }
        Ok(Self {
            message: message.to_string(),
        })
    }
}

/// Successful `POST /chat` body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// The assistant's answer.
    pub reply: String,
}

/// Error body returned with a non-2xx status.
///
/// The backend fills in whichever fields apply; quota failures (`429`) add
/// `help`, `quota_action` and `consumer_project`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatErrorBody {
    /// Short error category, e.g. `"Quota exceeded"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Longer explanation, preferred over `error` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Locally computed answer offered in place of the real one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reply: Option<String>,
    /// Pointer to a remedy (e.g. where to request more quota).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Machine-readable remedy, e.g. `"request_increase"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_action: Option<String>,
    /// Upstream project the quota belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_project: Option<String>,
}

impl ChatErrorBody {
    /// The text to show the user: `detail`, else `error`, else
    /// [`UNKNOWN_ERROR`]. Blank strings count as absent.
    pub fn headline(&self) -> &str {
        non_blank(self.detail.as_deref())
            .or_else(|| non_blank(self.error.as_deref()))
            .unwrap_or(UNKNOWN_ERROR)
    }

    /// The fallback answer, if one was supplied and is not blank.
    pub fn fallback(&self) -> Option<&str> {
        non_blank(self.fallback_reply.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Result of a chat exchange that reached the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// 2xx with a well-formed reply.
    Reply(String),
    /// Non-2xx; the body is whatever could be parsed from the response.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Parsed error body (empty if the body was not JSON).
        body: ChatErrorBody,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_trimmed() {
        let req = ChatRequest::new("  hola \n").unwrap();
        assert_eq!(req.message, "hola");
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"message":"hola"}"#);
    }

    #[test]
    fn blank_request_rejected() {
        assert_eq!(ChatRequest::new(" \t\n"), Err(ModelError::EmptyMessage));
    }

    #[test]
    fn headline_prefers_detail() {
        let body: ChatErrorBody =
            serde_json::from_str(r#"{"error":"Quota exceeded","detail":"bad key"}"#).unwrap();
        assert_eq!(body.headline(), "bad key");
    }

    #[test]
    fn headline_falls_back_to_error() {
        let body: ChatErrorBody =
            serde_json::from_str(r#"{"error":"No message provided"}"#).unwrap();
        assert_eq!(body.headline(), "No message provided");
    }

    #[test]
    fn headline_generic_when_both_missing() {
        assert_eq!(ChatErrorBody::default().headline(), UNKNOWN_ERROR);
        let blank = ChatErrorBody {
            detail: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(blank.headline(), UNKNOWN_ERROR);
    }

    #[test]
    fn quota_body_parses_every_field() {
        let json = r#"{
            "error": "Quota exceeded",
            "detail": "RESOURCE_EXHAUSTED",
            "consumer_project": "1234",
            "help": "Request more quota at https://cloud.google.com/docs/quotas/help/request_increase",
            "quota_action": "request_increase",
            "fallback_reply": "local answer"
        }"#;
        let body: ChatErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.fallback(), Some("local answer"));
        assert_eq!(body.consumer_project.as_deref(), Some("1234"));
        assert_eq!(body.quota_action.as_deref(), Some("request_increase"));
        assert!(body.help.unwrap().starts_with("Request more quota"));
    }

    #[test]
    fn unknown_fields_ignored() {
        let body: ChatErrorBody = serde_json::from_str(r#"{"trace":"x"}"#).unwrap();
        assert_eq!(body, ChatErrorBody::default());
    }
}

//! SDK error types.
//!
//! [`SdkError`] is the single error type returned by every fallible
//! operation in the SDK. It separates the two failure classes the UI cares
//! about: the request never completed ([`SdkError::is_transport`]), or the
//! backend answered with something unusable.

use chatline_models::ModelError;

/// Error type for all SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Invalid configuration (e.g. bad base URL, empty message).
    #[error("configuration error: {0}")]
    Config(String),

    /// The request could not be sent or its body could not be read.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON we expected.
    #[error("invalid response body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend answered successfully but with an unusable shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The backend refused an administrative call.
    #[error("request refused ({status}): {message}")]
    Refused {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },
}

impl SdkError {
    /// `true` when the request failed at the transport level (connection
    /// refused, reset, body read aborted), `false` for application errors.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<ModelError> for SdkError {
    fn from(e: ModelError) -> Self {
        SdkError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_errors_are_not_transport() {
        let err = SdkError::UnexpectedResponse("missing `reply`".into());
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "unexpected response: missing `reply`");
    }

    #[test]
    fn model_errors_become_config() {
        let err: SdkError = ModelError::EmptyMessage.into();
        assert!(matches!(err, SdkError::Config(_)));
        assert_eq!(err.to_string(), "configuration error: message is empty");
    }

    #[test]
    fn refused_display() {
        let err = SdkError::Refused {
            status: 403,
            message: "only allowed from localhost".into(),
        };
        assert_eq!(
            err.to_string(),
            "request refused (403): only allowed from localhost"
        );
    }
}

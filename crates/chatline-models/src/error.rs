//! Error types for the `chatline-models` crate.
//!
//! All fallible constructors in this crate return variants of
//! [`ModelError`].

/// Errors produced when constructing or validating model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A backend base URL could not be used.
    #[error("invalid base URL \"{value}\": {reason}")]
    InvalidBaseUrl {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A chat message was empty once surrounding whitespace was removed.
    #[error("message is empty")]
    EmptyMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_base_url() {
        let err = ModelError::InvalidBaseUrl {
            value: "ftp://x".into(),
            reason: "scheme must be http or https".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid base URL \"ftp://x\": scheme must be http or https"
        );
    }

    #[test]
    fn error_display_empty_message() {
        assert_eq!(ModelError::EmptyMessage.to_string(), "message is empty");
    }
}

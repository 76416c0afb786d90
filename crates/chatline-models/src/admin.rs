//! Debug key management bodies.
//!
//! The backend lets a localhost caller swap its API key at runtime without
//! a restart. Both endpoints answer with a [`KeyStatus`]; refusals use the
//! same shape as chat errors ([`ChatErrorBody`](crate::ChatErrorBody)).

use serde::{Deserialize, Serialize};

/// Body of `POST /debug/set_key`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SetKeyRequest {
    /// The new upstream API key.
    pub api_key: String,
}

/// Response of `POST /debug/set_key` and `POST /debug/clear_key`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeyStatus {
    /// `"ok"` on success.
    pub status: String,
    /// Whether a key is configured after the call.
    pub gemini_key_set: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_status_wire_shape() {
        let status: KeyStatus =
            serde_json::from_str(r#"{"status":"ok","gemini_key_set":true}"#).unwrap();
        assert!(status.gemini_key_set);
        assert_eq!(status.status, "ok");
    }

    #[test]
    fn set_key_wire_shape() {
        let req = SetKeyRequest {
            api_key: "k-123".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "api_key": "k-123" })
        );
    }
}

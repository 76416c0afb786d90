//! Mock backend configuration.
//!
//! Built from environment variables at startup and shared with every
//! handler through [`axum::extract::State`].

/// Which upstream the mock pretends to use once a key is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum UpstreamMode {
    /// Vendor SDK.
    Sdk,
    /// Raw REST endpoint.
    Rest,
    /// No upstream: canned local replies.
    Echo,
}

/// Global configuration shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to listen on (default `5000`).
    pub listen_port: u16,
    /// Upstream the mock simulates.
    pub mode: UpstreamMode,
    /// Model name reported by `/status`.
    pub model: String,
    /// API key present at startup.
    pub api_key: Option<String>,
}

impl AppConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable          | Default            | Description                    |
    /// |-------------------|--------------------|--------------------------------|
    /// | `MOCK_CHAT_PORT`  | `5000`             | HTTP listen port               |
    /// | `MOCK_CHAT_MODE`  | `echo`             | `sdk`, `rest` or `echo`        |
    /// | `MOCK_CHAT_MODEL` | `gemini-2.5-flash` | Model name shown in `/status`  |
    /// | `MOCK_CHAT_KEY`   | unset              | Initial API key                |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let listen_port = lookup("MOCK_CHAT_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);

        let mode = lookup("MOCK_CHAT_MODE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(UpstreamMode::Echo);

        let model = lookup("MOCK_CHAT_MODEL").unwrap_or_else(|| "gemini-2.5-flash".to_string());

        let api_key = lookup("MOCK_CHAT_KEY").filter(|k| !k.is_empty());

        Self {
            listen_port,
            mode,
            model,
            api_key,
        }
    }
}

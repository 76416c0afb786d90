//! Backend status snapshot and its display labels.
//!
//! `GET /status` reports how the backend is currently answering: through
//! the vendor SDK, through a raw REST endpoint, or with local canned
//! replies. The client shows this as a one-line label.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StatusSnapshot
// ---------------------------------------------------------------------------

/// Body of `GET /status`.
///
/// Every field is optional: older or stripped-down backends only send
/// `mode`, and a missing `mode` is still a valid (local) snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Backend mode: `"sdk"`, `"rest"`, anything else means local.
    #[serde(default)]
    pub mode: Option<String>,
    /// Whether the vendor SDK is installed on the backend.
    #[serde(default)]
    pub sdk_installed: Option<bool>,
    /// Whether an API key is configured.
    #[serde(default)]
    pub has_key: Option<bool>,
    /// Name of the upstream model.
    #[serde(default)]
    pub gemini_model: Option<String>,
    /// Whether a REST endpoint URL is configured.
    #[serde(default)]
    pub gemini_url_set: Option<bool>,
}

impl StatusSnapshot {
    /// Classify the snapshot's `mode` field.
    pub fn derived_mode(&self) -> StatusMode {
        StatusMode::from_wire(self.mode.as_deref())
    }
}

// ---------------------------------------------------------------------------
// StatusMode
// ---------------------------------------------------------------------------

/// Three-way classification of the backend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusMode {
    /// Answering through the vendor SDK.
    Sdk,
    /// Answering through a configured REST endpoint.
    Rest,
    /// No upstream model: local replies only, or unknown.
    Local,
}

impl StatusMode {
    /// Map a raw `mode` value. Unknown or missing values are [`Local`](Self::Local).
    pub fn from_wire(mode: Option<&str>) -> Self {
        match mode {
            Some("sdk") => Self::Sdk,
            Some("rest") => Self::Rest,
            _ => Self::Local,
        }
    }

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sdk => "connected",
            Self::Rest => "REST API",
            Self::Local => "local/disconnected",
        }
    }
}

impl fmt::Display for StatusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// How much of the snapshot the status label shows.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatusLabelStyle {
    /// Only the derived mode, e.g. `Status: connected`.
    #[default]
    Compact,
    /// Every raw field, e.g. `Status: mode=sdk | sdk_installed=true | …`.
    Detailed,
}

/// Render the status line for a fetched snapshot.
///
/// ```
/// use chatline_models::{status_label, StatusLabelStyle, StatusSnapshot};
///
/// let snap = StatusSnapshot { mode: Some("rest".into()), ..Default::default() };
/// assert_eq!(status_label(&snap, StatusLabelStyle::Compact), "Status: REST API");
/// ```
pub fn status_label(snapshot: &StatusSnapshot, style: StatusLabelStyle) -> String {
    match style {
        StatusLabelStyle::Compact => format!("Status: {}", snapshot.derived_mode()),
        StatusLabelStyle::Detailed => format!(
            "Status: mode={} | sdk_installed={} | has_key={} | model={}",
            snapshot.mode.as_deref().unwrap_or("?"),
            opt_flag(snapshot.sdk_installed),
            opt_flag(snapshot.has_key),
            snapshot.gemini_model.as_deref().unwrap_or("?"),
        ),
    }
}

/// Render the status line shown when the snapshot could not be fetched.
pub fn status_error_label(error: &dyn fmt::Display) -> String {
    format!("Status: error fetching status ({error})")
}

fn opt_flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "true",
        Some(false) => "false",
        None => "?",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

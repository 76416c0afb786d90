//! Widget configuration.
//!
//! [`WidgetConfig`] is built once by the host (CLI flags, environment) and
//! injected into [`ChatWidget::new`](crate::ChatWidget::new).

use std::time::Duration;

use chatline_models::StatusLabelStyle;

/// Default pause before a fallback answer is shown.
pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(600);

/// Default cap on the input box height, in rows.
pub const DEFAULT_MAX_INPUT_ROWS: u16 = 6;

/// Default empty-state text shown before the first message.
pub const DEFAULT_PLACEHOLDER: &str = "No messages yet. Type below and press Enter.";

/// Tunables for a [`ChatWidget`](crate::ChatWidget).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Pause between an error message and the fallback answer that follows it.
    pub fallback_delay: Duration,
    /// Permit a new send while another request is still in flight.
    ///
    /// Off by default: requests are serialized and the input is disabled
    /// while one is outstanding. When on, replies may settle out of order.
    pub allow_overlap: bool,
    /// How the status line is rendered.
    pub status_style: StatusLabelStyle,
    /// Maximum height the input box grows to.
    pub max_input_rows: u16,
    /// Empty-state text, cleared by the first appended message.
    pub placeholder: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            fallback_delay: DEFAULT_FALLBACK_DELAY,
            allow_overlap: false,
            status_style: StatusLabelStyle::Compact,
            max_input_rows: DEFAULT_MAX_INPUT_ROWS,
            placeholder: Some(DEFAULT_PLACEHOLDER.to_string()),
        }
    }
}

//! The chat widget controller.
//!
//! [`ChatWidget`] owns everything the user sees (log, input box, status
//! line) and exposes three capabilities to its host:
//!
//! * [`load_status`](ChatWidget::load_status): fetch and show the backend
//!   status once.
//! * [`on_input_key`](ChatWidget::on_input_key): feed a key press.
//! * [`send`](ChatWidget::send): submit the pending message.
//!
//! `send` is also available as two synchronous halves,
//! [`begin_send`](ChatWidget::begin_send) and
//! [`finish_send`](ChatWidget::finish_send), so an event loop can run the
//! network call in a background task and feed the result back.
//!
//! ```text
//! Idle --begin_send--> Sending (input disabled, typing shown)
//! Sending --finish_send--> Idle (typing removed, reply/error shown)
//! ```

use std::collections::HashMap;
use std::fmt;

use chatline_models::{
    status_error_label, status_label, ChatOutcome, Message, MessageId, MessageKind, Role,
    StatusMode, StatusSnapshot,
};
use chatline_sdk::{ChatBackend, SdkError};
use tracing::{debug, info, warn};

use crate::config::WidgetConfig;
use crate::input::{InputBox, InputOutcome, KeyInput};
use crate::log::ChatLog;

/// Status line shown before the first fetch settles.
pub const STATUS_LOADING: &str = "Status: loading…";

// ---------------------------------------------------------------------------
// Send bookkeeping
// ---------------------------------------------------------------------------

/// Identifies one in-flight chat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// A request the host must now perform with [`ChatBackend::chat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    /// Hand back to [`ChatWidget::finish_send`].
    pub token: RequestToken,
    /// Trimmed message text.
    pub text: String,
}

/// Why [`ChatWidget::begin_send`] did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendSkipped {
    /// The input was empty or whitespace only.
    #[error("nothing to send")]
    Empty,
    /// Another request is in flight and overlap is not allowed.
    #[error("a request is already in flight")]
    Busy,
}

/// A fallback answer to show once the configured delay has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackNotice {
    /// The backend's locally computed answer.
    pub text: String,
}

/// How a complete [`ChatWidget::send`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendReport {
    /// Nothing was sent.
    Skipped(SendSkipped),
    /// The backend replied normally.
    Replied,
    /// An error message was shown.
    Failed {
        /// Whether a fallback answer followed the error.
        fallback_shown: bool,
    },
}

// ---------------------------------------------------------------------------
// ChatWidget
// ---------------------------------------------------------------------------

/// Chat controller bound to one log, one input box and one status line.
#[derive(Debug)]
pub struct ChatWidget {
    config: WidgetConfig,
    log: ChatLog,
    input: InputBox,
    status: String,
    status_mode: Option<StatusMode>,
    /// In-flight requests and their typing indicators.
    in_flight: HashMap<RequestToken, MessageId>,
    next_token: u64,
}

impl ChatWidget {
    /// Create an idle widget.
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            log: ChatLog::new(config.placeholder.clone()),
            input: InputBox::new(config.max_input_rows),
            status: STATUS_LOADING.to_string(),
            status_mode: None,
            in_flight: HashMap::new(),
            next_token: 0,
            config,
        }
    }

    /// The configuration the widget was built with.
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// The message log.
    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    /// Mutable access to the log (scrolling).
    pub fn log_mut(&mut self) -> &mut ChatLog {
        &mut self.log
    }

    /// The input box.
    pub fn input(&self) -> &InputBox {
        &self.input
    }

    /// Mutable access to the input box (programmatic text entry).
    pub fn input_mut(&mut self) -> &mut InputBox {
        &mut self.input
    }

    /// Current status line.
    pub fn status_label(&self) -> &str {
        &self.status
    }

    /// Derived backend mode, once a status fetch has succeeded.
    pub fn status_mode(&self) -> Option<StatusMode> {
        self.status_mode
    }

    /// Whether a chat request is outstanding.
    pub fn is_sending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Whether the input and send control accept user actions.
    pub fn controls_enabled(&self) -> bool {
        self.config.allow_overlap || self.in_flight.is_empty()
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    /// Fetch the backend status once and show it. Never retries.
    pub async fn load_status<B: ChatBackend + ?Sized>(&mut self, backend: &B) {
        let result = backend.status().await;
        self.apply_status(&result);
    }

    /// Show the outcome of a status fetch.
    pub fn apply_status(&mut self, result: &Result<StatusSnapshot, SdkError>) {
        match result {
            Ok(snapshot) => {
                let mode = snapshot.derived_mode();
                info!(%mode, "backend status loaded");
                self.status_mode = Some(mode);
                self.status = status_label(snapshot, self.config.status_style);
            }
            Err(e) => {
                warn!(error = %e, "failed to load backend status");
                self.status_mode = None;
                self.status = status_error_label(e);
            }
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Feed a key press to the input box.
    ///
    /// Returns [`InputOutcome::Submit`] for Enter without Shift; the host
    /// then calls [`send`](Self::send) or [`begin_send`](Self::begin_send).
    pub fn on_input_key(&mut self, key: KeyInput) -> InputOutcome {
        self.input.handle_key(key)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Append a message to the log and scroll to it.
    pub fn append(&mut self, role: Role, text: impl Into<String>, kind: MessageKind) -> MessageId {
        self.log.append(Message::new(role, text, kind))
    }

    /// Remove every message from the log except the typing indicators of
    /// requests still in flight.
    pub fn clear_log(&mut self) {
        if self.in_flight.is_empty() {
            self.log.clear();
            return;
        }
        let in_flight = &self.in_flight;
        self.log.retain(|m| in_flight.values().any(|id| *id == m.id));
    }

    // ------------------------------------------------------------------
    // Sending
    // ------------------------------------------------------------------

    /// Send the pending message and render the outcome.
    ///
    /// The user message is rendered before the request is issued; the
    /// reply or error only after it settles. A fallback answer, if any, is
    /// shown after [`WidgetConfig::fallback_delay`].
    pub async fn send<B: ChatBackend + ?Sized>(&mut self, backend: &B) -> SendReport {
        let pending = match self.begin_send() {
            Ok(pending) => pending,
            Err(skipped) => return SendReport::Skipped(skipped),
        };

        let result = backend.chat(&pending.text).await;
        let failed = !matches!(result, Ok(ChatOutcome::Reply(_)));

        let fallback = self.finish_send(pending.token, result);
        let fallback_shown = fallback.is_some();
        if let Some(notice) = fallback {
            tokio::time::sleep(self.config.fallback_delay).await;
            self.show_fallback(&notice);
        }

        if failed {
            SendReport::Failed { fallback_shown }
        } else {
            SendReport::Replied
        }
    }

    /// First half of a send: validate, render the user message, show the
    /// typing indicator and mark the request in flight.
    pub fn begin_send(&mut self) -> Result<PendingSend, SendSkipped> {
        if !self.controls_enabled() {
            debug!("send ignored: request already in flight");
            return Err(SendSkipped::Busy);
        }

        let text = self.input.text().trim().to_string();
        if text.is_empty() {
            return Err(SendSkipped::Empty);
        }

        self.log.append(Message::user(text.clone()));
        self.input.clear();

        let typing = self.log.append(Message::typing());
        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.in_flight.insert(token, typing);

        if !self.config.allow_overlap {
            self.input.set_enabled(false);
        }

        debug!(%token, chars = text.len(), "chat request started");
        Ok(PendingSend { token, text })
    }

    /// Second half of a send: remove the typing indicator, render the
    /// outcome and re-enable the controls.
    ///
    /// Returns a [`FallbackNotice`] when the backend offered a fallback
    /// answer; pass it to [`show_fallback`](Self::show_fallback) after the
    /// configured delay.
    pub fn finish_send(
        &mut self,
        token: RequestToken,
        result: Result<ChatOutcome, SdkError>,
    ) -> Option<FallbackNotice> {
        let Some(typing) = self.in_flight.remove(&token) else {
            warn!(%token, "settled request was not in flight, ignoring");
            return None;
        };
        self.log.remove(typing);

        let fallback = match result {
            Ok(ChatOutcome::Reply(reply)) => {
                debug!(%token, "chat reply rendered");
                self.log.append(Message::bot(reply));
                None
            }
            Ok(ChatOutcome::Rejected { status, body }) => {
                warn!(%token, status, error = %body.headline(), "chat request rejected");
                self.log
                    .append(Message::bot_error(format!("Error: {}", body.headline())));
                if let Some(help) = body.help.as_deref().filter(|h| !h.trim().is_empty()) {
                    self.log.append(Message::bot_info(help));
                }
                body.fallback().map(|text| FallbackNotice {
                    text: text.to_string(),
                })
            }
            Err(e) if e.is_transport() => {
                warn!(%token, error = %e, "chat request failed in transport");
                self.log
                    .append(Message::bot_error(format!("Network error: {e}")));
                None
            }
            Err(e) => {
                warn!(%token, error = %e, "chat response unusable");
                self.log.append(Message::bot_error(format!("Error: {e}")));
                None
            }
        };

        if self.in_flight.is_empty() {
            self.input.set_enabled(true);
            self.input.focus();
        }
        fallback
    }

    /// Show a fallback answer as a secondary message.
    pub fn show_fallback(&mut self, notice: &FallbackNotice) {
        self.log
            .append(Message::bot_info(format!("Fallback answer: {}", notice.text)));
    }
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new(WidgetConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

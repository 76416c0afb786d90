//! Messages rendered in the chat log.
//!
//! A [`Message`] exists only while it is displayed: it is created when it
//! is appended to the log and dropped when the log is cleared. Nothing here
//! is persisted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text of the transient typing indicator.
pub const TYPING_TEXT: &str = "typing…";

// ---------------------------------------------------------------------------
// MessageId
// ---------------------------------------------------------------------------

/// Identity of one rendered message, used to remove typing indicators.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// ---------------------------------------------------------------------------
// Role / MessageKind
// ---------------------------------------------------------------------------

/// Who a message is attributed to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the person at the keyboard.
    User,
    /// Produced by the backend or by the client on its behalf.
    Bot,
}

impl Role {
    /// Avatar glyph drawn next to the message.
    pub fn avatar(self) -> &'static str {
        match self {
            Self::User => "🧑",
            Self::Bot => "🤖",
        }
    }
}

/// Presentation class of a message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Ordinary text.
    #[default]
    Normal,
    /// Error styling (failed request, rejected message).
    Error,
    /// Secondary information such as a fallback answer.
    Info,
    /// Placeholder shown while a reply is pending.
    Typing,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One entry in the chat log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Unique id within the log.
    pub id: MessageId,
    /// Author.
    pub role: Role,
    /// Displayed text.
    pub text: String,
    /// Presentation class.
    pub kind: MessageKind,
    /// When the message was appended.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a message with a fresh id and the current time.
    pub fn new(role: Role, text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            id: MessageId::new(),
            role,
            text: text.into(),
            kind,
            created_at: Utc::now(),
        }
    }

    /// A plain user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text, MessageKind::Normal)
    }

    /// A plain bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, text, MessageKind::Normal)
    }

    /// A bot message with error styling.
    pub fn bot_error(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, text, MessageKind::Error)
    }

    /// A secondary informational bot message.
    pub fn bot_info(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, text, MessageKind::Info)
    }

    /// The typing indicator.
    pub fn typing() -> Self {
        Self::new(Role::Bot, TYPING_TEXT, MessageKind::Typing)
    }

    /// Whether the message carries error styling.
    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }

    /// Whether the message is a transient typing indicator.
    pub fn is_typing(&self) -> bool {
        self.kind == MessageKind::Typing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_role_and_kind() {
        assert_eq!(Message::user("a").role, Role::User);
        assert_eq!(Message::bot("a").kind, MessageKind::Normal);
        assert!(Message::bot_error("a").is_error());
        assert_eq!(Message::bot_info("a").kind, MessageKind::Info);
        let typing = Message::typing();
        assert!(typing.is_typing());
        assert_eq!(typing.text, TYPING_TEXT);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Message::user("a").id, Message::user("a").id);
    }

    #[test]
    fn avatars_differ_by_role() {
        assert_ne!(Role::User.avatar(), Role::Bot.avatar());
        assert_eq!(Role::Bot.to_string(), "bot");
    }
}

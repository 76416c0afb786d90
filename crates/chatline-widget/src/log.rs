//! The scrolling message log.

use chatline_models::{Message, MessageId};

/// Ordered list of rendered messages plus the view's scroll position.
///
/// The log is the only owner of messages. Appending always scrolls back to
/// the newest entry.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<Message>,
    placeholder: Option<String>,
    /// Messages hidden below the viewport; 0 means pinned to the bottom.
    scroll_back: usize,
}

impl ChatLog {
    /// Create an empty log showing `placeholder` until the first append.
    pub fn new(placeholder: Option<String>) -> Self {
        Self {
            messages: Vec::new(),
            placeholder,
            scroll_back: 0,
        }
    }

    /// Append a message and scroll to it. The first append clears the
    /// empty-state placeholder for good.
    pub fn append(&mut self, message: Message) -> MessageId {
        self.placeholder = None;
        let id = message.id;
        self.messages.push(message);
        self.scroll_to_bottom();
        id
    }

    /// Remove a message by id, returning it if it was present.
    pub fn remove(&mut self, id: MessageId) -> Option<Message> {
        let idx = self.messages.iter().position(|m| m.id == id)?;
        let removed = self.messages.remove(idx);
        self.clamp_scroll();
        Some(removed)
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.scroll_back = 0;
    }

    /// Keep only the messages matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&Message) -> bool) {
        self.messages.retain(keep);
        self.clamp_scroll();
    }

    /// Messages in display order (oldest first).
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Look up a message by id.
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// `true` if no message has been appended (or all were cleared).
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Empty-state text, if it has not been cleared yet.
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// The most recently appended message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    /// How many messages are hidden below the viewport.
    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    /// Scroll towards older messages.
    pub fn scroll_up(&mut self, by: usize) {
        self.scroll_back = self.scroll_back.saturating_add(by);
        self.clamp_scroll();
    }

    /// Scroll towards newer messages.
    pub fn scroll_down(&mut self, by: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(by);
    }

    /// Pin the view to the newest message.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_back = 0;
    }

    fn clamp_scroll(&mut self) {
        self.scroll_back = self.scroll_back.min(self.messages.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_append_clears_placeholder() {
        let mut log = ChatLog::new(Some("empty".into()));
        assert_eq!(log.placeholder(), Some("empty"));
        log.append(Message::user("hi"));
        assert_eq!(log.placeholder(), None);
        log.clear();
        assert_eq!(log.placeholder(), None);
    }

    #[test]
    fn remove_by_id_keeps_order() {
        let mut log = ChatLog::default();
        let a = log.append(Message::user("a"));
        let b = log.append(Message::typing());
        let c = log.append(Message::bot("c"));
        assert!(log.remove(b).is_some());
        assert!(log.remove(b).is_none());
        let ids: Vec<_> = log.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn retain_filters_and_clamps_scroll() {
        let mut log = ChatLog::default();
        log.append(Message::user("a"));
        let typing = log.append(Message::typing());
        log.append(Message::bot("b"));
        log.scroll_up(2);
        log.retain(Message::is_typing);
        assert_eq!(log.len(), 1);
        assert_eq!(log.messages()[0].id, typing);
        assert_eq!(log.scroll_back(), 0);
    }

    #[test]
    fn append_scrolls_to_bottom() {
        let mut log = ChatLog::default();
        for i in 0..5 {
            log.append(Message::bot(i.to_string()));
        }
        log.scroll_up(3);
        assert_eq!(log.scroll_back(), 3);
        log.append(Message::user("new"));
        assert_eq!(log.scroll_back(), 0);
    }

    #[test]
    fn scroll_is_clamped() {
        let mut log = ChatLog::default();
        log.append(Message::bot("a"));
        log.append(Message::bot("b"));
        log.scroll_up(10);
        assert_eq!(log.scroll_back(), 1);
        log.scroll_down(10);
        assert_eq!(log.scroll_back(), 0);
    }
}

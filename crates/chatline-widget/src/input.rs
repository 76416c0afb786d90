//! Multi-line input box and key handling.
//!
//! Keys arrive as [`KeyInput`], a small framework-independent description
//! the host translates its own key events into.

use crate::wrap::wrap;

/// A key, independent of any terminal or GUI library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Return / Enter.
    Enter,
    /// Delete the character before the cursor.
    Backspace,
    /// A printable character.
    Char(char),
    /// Anything the input box does not handle.
    Other,
}

/// A key press with the modifier the input box cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    /// The key.
    pub key: Key,
    /// Whether Shift was held.
    pub shift: bool,
}

impl KeyInput {
    /// A key press without Shift.
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    /// A key press with Shift held.
    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// What a key press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Enter without Shift: the host should send.
    Submit,
    /// The text changed.
    Edited,
    /// Nothing happened (unhandled key or input disabled).
    Ignored,
}

/// Editable message field that grows with its content.
#[derive(Debug, Clone)]
pub struct InputBox {
    text: String,
    enabled: bool,
    focused: bool,
    max_rows: u16,
}

impl InputBox {
    /// Create an empty, enabled, focused input box.
    pub fn new(max_rows: u16) -> Self {
        Self {
            text: String::new(),
            enabled: true,
            focused: true,
            max_rows: max_rows.max(1),
        }
    }

    /// Apply a key press.
    pub fn handle_key(&mut self, input: KeyInput) -> InputOutcome {
        if !self.enabled {
            return InputOutcome::Ignored;
        }
        match input.key {
            Key::Enter if input.shift => {
                self.text.push('\n');
                InputOutcome::Edited
            }
            Key::Enter => InputOutcome::Submit,
            Key::Backspace => {
                if self.text.pop().is_some() {
                    InputOutcome::Edited
                } else {
                    InputOutcome::Ignored
                }
            }
            Key::Char(c) if !c.is_control() => {
                self.text.push(c);
                InputOutcome::Edited
            }
            Key::Char(_) | Key::Other => InputOutcome::Ignored,
        }
    }

    /// Current raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Empty the box; its height drops back to one row.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Height the box should be drawn at without wrapping: one row per
    /// line, capped.
    pub fn rows(&self) -> u16 {
        self.rows_for_width(usize::MAX)
    }

    /// Height the box should be drawn at when `width` characters fit on a
    /// row: one row per wrapped line, capped.
    pub fn rows_for_width(&self, width: usize) -> u16 {
        let lines = wrap(&self.text, width).len();
        u16::try_from(lines).unwrap_or(u16::MAX).clamp(1, self.max_rows)
    }

    /// Whether the box accepts input.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the box.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the box has keyboard focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Give the box keyboard focus.
    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Take keyboard focus away.
    pub fn blur(&mut self) {
        self.focused = false;
    }
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_INPUT_ROWS)
    }
}

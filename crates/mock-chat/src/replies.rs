//! Canned answers used when no upstream model is configured, and as the
//! `fallback_reply` of simulated upstream failures.

const GREETINGS: &[&str] = &["hello", "hi", "hey", "good morning", "good evening"];

/// Build a short local answer for `message`.
pub fn local_reply(message: &str) -> String {
    let text = message.trim();
    let lower = text.to_lowercase();

    if GREETINGS
        .iter()
        .any(|g| lower == *g || lower.starts_with(&format!("{g} ")))
    {
        return "Hello! No model is connected right now, but I can still echo you.".into();
    }
    if lower.contains("help") {
        return "Type a message and press Enter. Shift+Enter adds a new line.".into();
    }
    if text.ends_with('?') {
        return format!("Good question. Without a model I can only repeat it: {text}");
    }
    format!("Echo: {text}")
}

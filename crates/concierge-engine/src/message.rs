//! Message model and the append-only conversation log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the user.
    User,
    /// Message surfaced by the assistant (replies and notices alike).
    Assistant,
}

/// A single message in the conversation.
///
/// Messages are immutable once created; the log owns them exclusively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// Timestamp of the message.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered, append-only conversation log.
///
/// Invariant: the log always begins with a single assistant greeting and
/// keeps that shape for the lifetime of a conversation instance. A reset
/// discards the whole log and reseeds it.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: Vec<Message>,
}

impl MessageLog {
    /// Create a log seeded with the given greeting.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            entries: vec![Message::assistant(greeting)],
        }
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.entries.push(message);
    }

    /// Discard all messages and reseed with a fresh greeting.
    pub fn reset(&mut self, greeting: impl Into<String>) {
        self.entries = vec![Message::assistant(greeting)];
    }

    /// All messages, oldest first.
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    /// The last `n` messages, oldest first (the bounded history window).
    pub fn window(&self, n: usize) -> &[Message] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let user_msg = Message::user("Hello");
        assert_eq!(user_msg.role, Role::User);
        assert_eq!(user_msg.content, "Hello");

        let assistant_msg = Message::assistant("Hi there!");
        assert_eq!(assistant_msg.role, Role::Assistant);
    }

    #[test]
    fn test_log_starts_with_greeting() {
        let log = MessageLog::new("Welcome");
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].role, Role::Assistant);
        assert_eq!(log.entries()[0].content, "Welcome");
    }

    #[test]
    fn test_log_preserves_insertion_order() {
        let mut log = MessageLog::new("Welcome");
        log.push(Message::user("first"));
        log.push(Message::assistant("second"));
        log.push(Message::user("third"));

        let contents: Vec<&str> = log.entries().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["Welcome", "first", "second", "third"]);
    }

    #[test]
    fn test_reset_discards_history() {
        let mut log = MessageLog::new("Welcome");
        for i in 0..20 {
            log.push(Message::user(format!("message {i}")));
        }

        log.reset("Welcome back");
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].content, "Welcome back");
    }

    #[test]
    fn test_window_bounds() {
        let mut log = MessageLog::new("Welcome");
        assert_eq!(log.window(12).len(), 1);

        for i in 0..30 {
            log.push(Message::user(format!("message {i}")));
        }

        let window = log.window(12);
        assert_eq!(window.len(), 12);
        assert_eq!(window.last().unwrap().content, "message 29");

        // A window larger than the log returns everything
        assert_eq!(log.window(1000).len(), 31);
    }
}

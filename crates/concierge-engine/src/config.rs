//! Runtime configuration for a conversation session.
//!
//! There are no config files; the conversation is ephemeral, so everything
//! here comes from defaults and CLI flags.

use std::time::Duration;

/// Default window title.
pub const DEFAULT_TITLE: &str = "Corporate Assistant";

/// Greeting that seeds a brand-new conversation.
pub const DEFAULT_GREETING: &str = "Hi! I'm your corporate assistant. Ask me your query.";

/// Greeting that seeds the log after a reset.
pub const RESET_GREETING: &str = "Hi again! What can I help you with next?";

/// Default artificial latency of the canned responder.
pub const DEFAULT_RESPONDER_DELAY: Duration = Duration::from_millis(1200);

/// Session configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Title shown in the TUI header.
    pub title: String,
    /// Greeting seeding a new conversation.
    pub greeting: String,
    /// Greeting seeding the log after a reset.
    pub reset_greeting: String,
    /// Artificial latency of the canned responder.
    pub responder_delay: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
            greeting: DEFAULT_GREETING.into(),
            reset_greeting: RESET_GREETING.into(),
            responder_delay: DEFAULT_RESPONDER_DELAY,
        }
    }
}

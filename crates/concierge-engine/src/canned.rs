//! Built-in canned responder.
//!
//! Stands in for a real helpdesk backend: keyword-routes the message to a
//! topic and serves a rotating canned reply after a short artificial delay.
//! The routing heuristic is collaborator-internal; the controller never
//! sees it.

use crate::config::DEFAULT_RESPONDER_DELAY;
use crate::message::Message;
use crate::responder::{Reply, Responder, ResponderError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const GREETING_REPLIES: &[&str] = &[
    "Hello! I'm your corporate assistant. How can I help you today?",
    "Hi there! I'm here to assist with any corporate questions you might have.",
    "Greetings! What can I help you with today?",
];

const HR_REPLIES: &[&str] = &[
    "For HR-related questions, please contact our HR department at hr@company.com or call extension 123.",
    "HR policies can be found in the employee handbook on our intranet portal.",
    "For leave requests, please submit through the HR portal at least two weeks in advance.",
];

const IT_REPLIES: &[&str] = &[
    "For IT support, please submit a ticket through the IT helpdesk system or call extension 456.",
    "Common IT issues and solutions are available in the knowledge base on our intranet.",
    "If you're experiencing network issues, try restarting your router first.",
];

const BENEFITS_REPLIES: &[&str] = &[
    "Our benefits package includes health insurance, retirement plans, and paid time off.",
    "You can review your benefits details in the employee self-service portal.",
    "Open enrollment for benefits happens every November.",
];

const DEFAULT_REPLIES: &[&str] = &[
    "I understand you're asking about {topic}. Let me check our resources for more information.",
    "That's an interesting question about {topic}. Based on our policies, I can tell you that...",
    "Regarding {topic}, our company standard practice is to...",
    "I need to consult our documentation about {topic}. From what I recall...",
    "For detailed information about {topic}, I recommend checking the company handbook or contacting the relevant department.",
];

/// Topic a message routes to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Topic {
    Greeting,
    Hr,
    It,
    Benefits,
    /// No known topic; carries the keywords used for the default replies.
    Other(String),
}

/// Keyword routing for canned replies.
fn extract_topic(message: &str) -> Topic {
    let lower = message.to_lowercase();
    let has_word = |word: &str| lower.split(|c: char| !c.is_alphanumeric()).any(|w| w == word);

    if has_word("hello") || has_word("hi") || has_word("hey") {
        Topic::Greeting
    } else if has_word("hr")
        || lower.contains("human resources")
        || has_word("leave")
        || has_word("vacation")
    {
        Topic::Hr
    } else if has_word("it") || has_word("computer") || has_word("tech") || has_word("system") {
        Topic::It
    } else if has_word("benefit")
        || has_word("benefits")
        || has_word("insurance")
        || has_word("health")
        || has_word("retirement")
    {
        Topic::Benefits
    } else {
        // Fall back to the first few substantial words of the message
        let keywords: Vec<&str> = message
            .split_whitespace()
            .filter(|word| word.len() > 4)
            .take(3)
            .collect();
        if keywords.is_empty() {
            Topic::Other("that".into())
        } else {
            Topic::Other(keywords.join(" "))
        }
    }
}

/// A responder that serves canned replies with simulated latency.
#[derive(Debug)]
pub struct CannedResponder {
    delay: Duration,
    next_pick: AtomicUsize,
}

impl CannedResponder {
    /// Create a canned responder with the given artificial latency.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_pick: AtomicUsize::new(0),
        }
    }

    /// Rotate through a reply table.
    fn pick<'a>(&self, table: &'a [&str]) -> &'a str {
        let n = self.next_pick.fetch_add(1, Ordering::Relaxed);
        table[n % table.len()]
    }

    fn reply_for(&self, message: &str) -> String {
        match extract_topic(message) {
            Topic::Greeting => self.pick(GREETING_REPLIES).to_string(),
            Topic::Hr => self.pick(HR_REPLIES).to_string(),
            Topic::It => self.pick(IT_REPLIES).to_string(),
            Topic::Benefits => self.pick(BENEFITS_REPLIES).to_string(),
            Topic::Other(topic) => self.pick(DEFAULT_REPLIES).replace("{topic}", &topic),
        }
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONDER_DELAY)
    }
}

#[async_trait]
impl Responder for CannedResponder {
    async fn respond(
        &self,
        message: &str,
        _history: &[Message],
        cancel: CancellationToken,
    ) -> Result<Reply, ResponderError> {
        tokio::select! {
            () = cancel.cancelled() => return Err(ResponderError::Cancelled),
            () = tokio::time::sleep(self.delay) => {}
        }
        // A token signalled while the sleep branch won still means cancelled
        if cancel.is_cancelled() {
            return Err(ResponderError::Cancelled);
        }

        Ok(Reply::new(self.reply_for(message)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_extraction() {
        assert_eq!(extract_topic("Hello there"), Topic::Greeting);
        assert_eq!(extract_topic("hey, quick question"), Topic::Greeting);
        assert_eq!(extract_topic("how do I request leave?"), Topic::Hr);
        assert_eq!(extract_topic("Human Resources contact?"), Topic::Hr);
        assert_eq!(extract_topic("my computer is broken"), Topic::It);
        assert_eq!(extract_topic("is IT available today?"), Topic::It);
        assert_eq!(extract_topic("what health insurance do we have"), Topic::Benefits);
    }

    #[test]
    fn test_topic_matches_whole_words_only() {
        // "benefits" must not route to IT just because it contains "it"
        assert_eq!(extract_topic("tell me about my benefits"), Topic::Benefits);
    }

    #[test]
    fn test_default_topic_keywords() {
        assert_eq!(
            extract_topic("where is the parking garage entrance"),
            Topic::Other("where parking garage".into())
        );
        assert_eq!(extract_topic("why"), Topic::Other("that".into()));
    }

    #[test]
    fn test_reply_rotation_is_deterministic() {
        let responder = CannedResponder::new(Duration::ZERO);
        let first = responder.reply_for("hello");
        let second = responder.reply_for("hello");
        let third = responder.reply_for("hello");
        let fourth = responder.reply_for("hello");

        assert_ne!(first, second);
        assert_ne!(second, third);
        // Three greeting replies, so the fourth wraps around
        assert_eq!(first, fourth);
    }

    #[test]
    fn test_default_reply_substitutes_topic() {
        let responder = CannedResponder::new(Duration::ZERO);
        let reply = responder.reply_for("where is the parking garage");
        assert!(reply.contains("parking garage"));
        assert!(!reply.contains("{topic}"));
    }

    #[tokio::test]
    async fn test_respond_produces_reply() {
        let responder = CannedResponder::new(Duration::ZERO);
        let reply = responder
            .respond("hello", &[], CancellationToken::new())
            .await
            .unwrap();
        assert!(!reply.reply.is_empty());
    }

    #[tokio::test]
    async fn test_respond_honors_cancellation() {
        let responder = CannedResponder::new(Duration::from_secs(60));
        let token = CancellationToken::new();
        token.cancel();

        let result = responder.respond("hello", &[], token).await;
        assert!(matches!(result, Err(ResponderError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_during_delay() {
        let responder = CannedResponder::new(Duration::from_secs(60));
        let token = CancellationToken::new();
        let cancel = token.clone();

        let call = tokio::spawn(async move { responder.respond("hello", &[], token).await });
        cancel.cancel();

        let result = call.await.unwrap();
        assert!(matches!(result, Err(ResponderError::Cancelled)));
    }
}

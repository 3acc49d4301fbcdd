//! Responder contract: the reply-producing collaborator.
//!
//! The controller never knows how replies are produced; anything that can
//! answer a message against a bounded history, and honor cancellation, can
//! stand behind this trait.

use crate::message::Message;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// A reply produced by a responder.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Reply text to surface as an assistant message.
    pub reply: String,
}

impl Reply {
    /// Create a reply from text.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

/// Errors a responder call can settle with.
#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    /// The request was cancelled before a reply was produced.
    #[error("request cancelled")]
    Cancelled,

    /// Any other failure.
    #[error("responder failed: {0}")]
    Failed(String),
}

/// Produces a reply for a user message given a bounded conversation history.
///
/// Contract: implementations must support external cancellation through the
/// supplied token. Once the token is signalled, the call settles with
/// [`ResponderError::Cancelled`], never a reply.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Answer `message` against `history`, or fail if cancelled.
    async fn respond(
        &self,
        message: &str,
        history: &[Message],
        cancel: CancellationToken,
    ) -> Result<Reply, ResponderError>;
}

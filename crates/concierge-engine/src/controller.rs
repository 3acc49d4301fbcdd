//! Conversation controller: the turn state machine.
//!
//! The controller owns the message log, the phase, the feedback gate, and
//! the single pending request slot. Every state change goes through one of
//! the operations below; nothing else mutates a field.

use crate::config::{ChatConfig, DEFAULT_GREETING, RESET_GREETING};
use crate::message::{Message, MessageLog};
use crate::responder::{Reply, ResponderError};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

/// Number of trailing messages passed to the responder as context.
pub const HISTORY_WINDOW: usize = 12;

/// Notice appended when a request settles as cancelled.
pub const CANCELLED_NOTICE: &str = "Request was cancelled.";

/// Notice appended when a request settles with a failure.
pub const FAILURE_NOTICE: &str = "Sorry, I encountered an error. Please try again.";

/// Closing message appended on satisfied feedback.
pub const RESOLVED_NOTICE: &str =
    "Great! I'm glad that helped. I'll close this chat now. You can start a new question anytime.";

/// Follow-up prompt appended on unsatisfied feedback.
pub const NEED_MORE_NOTICE: &str = "No worries. Could you provide more details about the issue?";

/// The conversation's macro-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the user's question.
    #[default]
    Asking,
    /// A reply has been surfaced; feedback decides what happens next.
    GotAnswer,
    /// The user asked for more detail; waiting for their follow-up.
    NeedMoreInfo,
    /// The exchange is closed; only a reset reopens the conversation.
    Resolved,
}

/// Identifier for an issued request. Monotonically increasing per controller.
pub type RequestId = u64;

/// The single outstanding responder call, if any.
#[derive(Debug)]
struct PendingRequest {
    id: RequestId,
    cancel: CancellationToken,
    /// Set once `cancel()` has been requested for this id. A success
    /// settlement arriving afterwards is applied as a cancellation.
    cancel_requested: bool,
}

/// Everything a driver needs to dispatch one responder call.
#[derive(Debug)]
pub struct TurnRequest {
    /// Id to hand back on settlement.
    pub id: RequestId,
    /// The trimmed user message.
    pub message: String,
    /// Bounded history, ending with the message above.
    pub history: Vec<Message>,
    /// Token the responder must honor.
    pub cancel: CancellationToken,
}

/// Read-only view of the controller for the presentation layer.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// The full message log, oldest first.
    pub messages: Vec<Message>,
    /// Current phase.
    pub phase: Phase,
    /// Whether a request is in flight.
    pub loading: bool,
    /// Whether a feedback judgment is pending.
    pub awaiting_feedback: bool,
    /// Current draft input text.
    pub draft_input: String,
}

/// The conversation turn state machine.
#[derive(Debug)]
pub struct Controller {
    log: MessageLog,
    phase: Phase,
    awaiting_feedback: bool,
    draft: String,
    pending: Option<PendingRequest>,
    next_request_id: RequestId,
    conversation_id: String,
    reset_greeting: String,
}

impl Controller {
    /// Create a controller with the default greetings.
    pub fn new() -> Self {
        Self::with_greetings(DEFAULT_GREETING, RESET_GREETING)
    }

    /// Create a controller from a session config.
    pub fn from_config(config: &ChatConfig) -> Self {
        Self::with_greetings(config.greeting.clone(), config.reset_greeting.clone())
    }

    /// Create a controller with explicit greetings.
    pub fn with_greetings(greeting: impl Into<String>, reset_greeting: impl Into<String>) -> Self {
        Self {
            log: MessageLog::new(greeting),
            phase: Phase::default(),
            awaiting_feedback: false,
            draft: String::new(),
            pending: None,
            next_request_id: 0,
            conversation_id: Uuid::new_v4().to_string(),
            reset_greeting: reset_greeting.into(),
        }
    }

    // === Read access ===

    /// All messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        self.log.entries()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a feedback judgment is pending.
    pub fn awaiting_feedback(&self) -> bool {
        self.awaiting_feedback
    }

    /// Current draft input text.
    pub fn draft_input(&self) -> &str {
        &self.draft
    }

    /// Id of the current conversation instance (regenerated on reset).
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Whether the input field accepts typing.
    pub fn input_enabled(&self) -> bool {
        self.phase != Phase::Resolved && !self.is_loading() && !self.awaiting_feedback
    }

    /// Whether the submit affordance is live.
    pub fn can_submit(&self) -> bool {
        !self.draft.trim().is_empty()
            && !self.is_loading()
            && !self.awaiting_feedback
            && self.phase != Phase::Resolved
    }

    /// Read-only state snapshot for the presentation layer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            messages: self.log.entries().to_vec(),
            phase: self.phase,
            loading: self.is_loading(),
            awaiting_feedback: self.awaiting_feedback,
            draft_input: self.draft.clone(),
        }
    }

    // === Operations ===

    /// Replace the draft input text.
    pub fn set_draft_input(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Submit the current draft.
    ///
    /// Returns the request to dispatch, or `None` when the eligibility gate
    /// is shut (empty draft, request in flight, feedback pending, or the
    /// conversation is resolved). An inert submit is not an error; the
    /// presentation layer is expected to have disabled the affordance.
    pub fn submit(&mut self) -> Option<TurnRequest> {
        if !self.can_submit() {
            return None;
        }

        let text = self.draft.trim().to_string();
        self.log.push(Message::user(text.clone()));
        let history = self.log.window(HISTORY_WINDOW).to_vec();
        self.draft.clear();
        self.awaiting_feedback = false;

        let id = self.next_request_id;
        self.next_request_id += 1;
        let cancel = CancellationToken::new();
        self.pending = Some(PendingRequest {
            id,
            cancel: cancel.clone(),
            cancel_requested: false,
        });

        debug!(request_id = id, "request issued");
        Some(TurnRequest {
            id,
            message: text,
            history,
            cancel,
        })
    }

    /// Apply the settlement of an issued request.
    ///
    /// Settlements that do not match the current pending id are stale and
    /// discarded unconditionally; at most one outcome is ever applied per
    /// request. The pending slot is cleared no matter which branch runs.
    pub fn settle(&mut self, id: RequestId, outcome: Result<Reply, ResponderError>) {
        let Some(pending) = &self.pending else {
            warn!(request_id = id, "settlement with no request pending, discarded");
            return;
        };
        if pending.id != id {
            warn!(
                request_id = id,
                pending_id = pending.id,
                "stale settlement, discarded"
            );
            return;
        }

        let cancel_requested = pending.cancel_requested;
        self.pending = None;

        match outcome {
            Ok(reply) if !cancel_requested => {
                debug!(request_id = id, "request settled with a reply");
                self.log.push(Message::assistant(reply.reply));
                self.phase = Phase::GotAnswer;
                self.awaiting_feedback = true;
            }
            // Cancellation wins any race with a late success.
            Ok(_) | Err(ResponderError::Cancelled) => {
                debug!(request_id = id, "request settled as cancelled");
                self.log.push(Message::assistant(CANCELLED_NOTICE));
                self.phase = Phase::Asking;
                self.awaiting_feedback = false;
            }
            Err(err) => {
                debug!(request_id = id, error = %err, "request settled with a failure");
                self.log.push(Message::assistant(FAILURE_NOTICE));
                self.phase = Phase::Asking;
                self.awaiting_feedback = false;
            }
        }
    }

    /// Request cancellation of the in-flight call, if any.
    ///
    /// Only signals; state settles when the call does. No-op otherwise.
    pub fn cancel(&mut self) {
        if let Some(pending) = &mut self.pending {
            debug!(request_id = pending.id, "cancellation requested");
            pending.cancel_requested = true;
            pending.cancel.cancel();
        }
    }

    /// Record the user's satisfied/not-satisfied judgment.
    ///
    /// No-op unless a reply is awaiting feedback.
    pub fn provide_feedback(&mut self, satisfied: bool) {
        if self.phase != Phase::GotAnswer || !self.awaiting_feedback {
            return;
        }

        self.awaiting_feedback = false;
        if satisfied {
            self.log.push(Message::assistant(RESOLVED_NOTICE));
            self.phase = Phase::Resolved;
        } else {
            self.log.push(Message::assistant(NEED_MORE_NOTICE));
            self.phase = Phase::NeedMoreInfo;
        }
        debug!(phase = ?self.phase, "feedback applied");
    }

    /// Start over with a fresh conversation instance.
    ///
    /// Allowed from any phase. Does not touch a pending request; should one
    /// still be in flight, its settlement applies to the fresh log.
    pub fn reset_conversation(&mut self) {
        self.log.reset(self.reset_greeting.clone());
        self.phase = Phase::Asking;
        self.draft.clear();
        self.awaiting_feedback = false;
        self.conversation_id = Uuid::new_v4().to_string();
        debug!("conversation reset");
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

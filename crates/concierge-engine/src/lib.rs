//! concierge-engine: Headless conversation engine for the concierge assistant
//!
//! This crate provides the core turn logic for concierge, including:
//! - The message log and its invariants
//! - The conversation controller (turn state machine)
//! - The responder contract and the built-in canned responder
//! - The session driver bridging the controller to the tokio runtime

pub mod canned;
pub mod config;
pub mod controller;
pub mod message;
pub mod responder;
pub mod session;
pub mod transcript;

// Re-export commonly used types
pub use canned::CannedResponder;
pub use config::{ChatConfig, DEFAULT_GREETING, DEFAULT_TITLE, RESET_GREETING};
pub use controller::{
    Controller, Phase, RequestId, Snapshot, TurnRequest, CANCELLED_NOTICE, FAILURE_NOTICE,
    HISTORY_WINDOW, NEED_MORE_NOTICE, RESOLVED_NOTICE,
};
pub use message::{Message, MessageLog, Role};
pub use responder::{Reply, Responder, ResponderError};
pub use session::{Session, Settlement};
pub use transcript::{export_transcript, transcript_file_name, ExportError};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}

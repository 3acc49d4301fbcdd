//! Transcript export.
//!
//! Writes the current conversation to a JSONL file: one metadata line
//! followed by one line per message. The export is an artifact for the
//! user; nothing ever reads it back into a session.

use crate::controller::{Controller, Phase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Transcript metadata (stored as the first line of the JSONL file).
#[derive(Debug, Serialize, Deserialize)]
struct TranscriptHeader {
    conversation_id: String,
    phase: Phase,
    exported_at: DateTime<Utc>,
}

/// Errors that can occur while exporting a transcript.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Default file name for a transcript export.
pub fn transcript_file_name(conversation_id: &str) -> String {
    format!("concierge-transcript-{conversation_id}.jsonl")
}

/// Export the conversation to a JSONL file at `path`.
pub fn export_transcript(controller: &Controller, path: &Path) -> Result<(), ExportError> {
    use std::io::Write;

    let mut file = std::fs::File::create(path)?;

    let header = TranscriptHeader {
        conversation_id: controller.conversation_id().to_string(),
        phase: controller.phase(),
        exported_at: Utc::now(),
    };
    let header_json = serde_json::to_string(&header).map_err(ExportError::Serialize)?;
    writeln!(file, "{header_json}")?;

    for message in controller.messages() {
        let json = serde_json::to_string(message).map_err(ExportError::Serialize)?;
        writeln!(file, "{json}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Message, Role};
    use crate::responder::Reply;

    #[test]
    fn test_export_round_trips_messages() {
        let mut controller = Controller::new();
        controller.set_draft_input("hi");
        let request = controller.submit().unwrap();
        controller.settle(request.id, Ok(Reply::new("Hello!")));

        let dir = tempfile::tempdir().unwrap();
        let path = dir
            .path()
            .join(transcript_file_name(controller.conversation_id()));
        export_transcript(&controller, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();

        let header: TranscriptHeader = serde_json::from_str(lines.next().unwrap()).unwrap();
        assert_eq!(header.conversation_id, controller.conversation_id());
        assert_eq!(header.phase, Phase::GotAnswer);

        let messages: Vec<Message> = lines
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "hi");
        assert_eq!(messages[2].content, "Hello!");
    }

    #[test]
    fn test_transcript_file_name() {
        let name = transcript_file_name("abc-123");
        assert_eq!(name, "concierge-transcript-abc-123.jsonl");
    }
}

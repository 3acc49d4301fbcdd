//! Phase-aware placeholder text for the input area.

use concierge_engine::Phase;

/// Get placeholder text for the input area based on the conversation state.
///
/// The placeholder guides users on what they can do in the current state;
/// it is the only surfacing of the feedback gate besides the disabled input.
#[must_use]
pub fn input_placeholder(phase: Phase, awaiting_feedback: bool) -> &'static str {
    if awaiting_feedback {
        return "Please provide feedback first...";
    }
    match phase {
        Phase::Asking => "Type your question...",
        Phase::NeedMoreInfo => "Add more information...",
        Phase::GotAnswer | Phase::Resolved => "Chat is closed. Start a new question",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asking_placeholder() {
        assert_eq!(input_placeholder(Phase::Asking, false), "Type your question...");
    }

    #[test]
    fn test_feedback_placeholder_takes_precedence() {
        assert_eq!(
            input_placeholder(Phase::GotAnswer, true),
            "Please provide feedback first..."
        );
    }

    #[test]
    fn test_need_more_info_placeholder() {
        assert_eq!(
            input_placeholder(Phase::NeedMoreInfo, false),
            "Add more information..."
        );
    }

    #[test]
    fn test_resolved_placeholder() {
        assert_eq!(
            input_placeholder(Phase::Resolved, false),
            "Chat is closed. Start a new question"
        );
    }

    #[test]
    fn test_all_phases_have_placeholder() {
        let phases = [
            Phase::Asking,
            Phase::GotAnswer,
            Phase::NeedMoreInfo,
            Phase::Resolved,
        ];
        for phase in phases {
            for awaiting in [false, true] {
                assert!(!input_placeholder(phase, awaiting).is_empty());
            }
        }
    }
}

//! Application state and update logic for the concierge TUI.

use crate::event::Action;
use crate::ui::widgets::TextInputState;
use concierge_engine::{
    export_transcript, transcript_file_name, ChatConfig, Phase, Responder, Session,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::sync::Arc;

/// Application state.
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// The conversation session (controller + responder).
    pub session: Session,

    /// Title shown in the header.
    pub title: String,

    /// Text input state for the chat input.
    pub input: TextInputState,

    /// Transcript scroll offset, in lines up from the bottom (0 = pinned).
    pub scroll_from_bottom: usize,

    /// Tick counter for animations.
    pub tick: usize,

    /// Notification message (displayed temporarily, cleared after some ticks).
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,
}

impl App {
    /// Create a new app instance over the given responder.
    pub fn new(config: ChatConfig, responder: Arc<dyn Responder>) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            title: config.title.clone(),
            session: Session::new(responder, &config),
            input: TextInputState::new(),
            scroll_from_bottom: 0,
            tick: 0,
            notification: None,
            notification_ttl: 0,
        }
    }

    /// Handle a key event.
    ///
    /// While the input field accepts typing, printable keys edit the draft;
    /// otherwise plain keys map to actions (feedback, reset, quit).
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Control combos are commands regardless of input state
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.handle_action(Action::Quit),
                KeyCode::Char('e') => self.handle_action(Action::Export),
                _ => {}
            }
            return;
        }

        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.session.controller().input_enabled() {
            match key.code {
                KeyCode::Enter => self.handle_action(Action::Submit),
                KeyCode::Esc => self.handle_action(Action::Cancel),
                KeyCode::Char(c) => {
                    self.input.insert(c);
                    self.sync_draft();
                }
                KeyCode::Backspace => {
                    self.input.backspace();
                    self.sync_draft();
                }
                KeyCode::Delete => {
                    self.input.delete();
                    self.sync_draft();
                }
                KeyCode::Left => self.input.move_left(),
                KeyCode::Right => self.input.move_right(),
                KeyCode::Home => self.input.move_home(),
                KeyCode::End => self.input.move_end(),
                KeyCode::Up => {
                    // History navigation when the input is empty
                    if self.input.is_empty() {
                        self.input.history_prev();
                        self.sync_draft();
                    } else {
                        self.handle_action(Action::Up);
                    }
                }
                KeyCode::Down => {
                    if self.input.is_empty() {
                        self.input.history_next();
                        self.sync_draft();
                    } else {
                        self.handle_action(Action::Down);
                    }
                }
                _ => {}
            }
        } else {
            let action = crate::event::key_to_action(key);
            self.handle_action(action);
        }
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
            }
            Action::Help => {
                self.show_help = !self.show_help;
            }
            Action::Submit => self.submit_input(),
            Action::Cancel => {
                if self.session.controller().is_loading() {
                    self.session.cancel();
                    self.set_notification("Cancelling request...".to_string());
                } else {
                    self.should_quit = true;
                }
            }
            Action::FeedbackYes => {
                self.session.provide_feedback(true);
                self.scroll_from_bottom = 0;
            }
            Action::FeedbackNo => {
                self.session.provide_feedback(false);
                self.scroll_from_bottom = 0;
            }
            Action::NewConversation => {
                // Inert unless the conversation is resolved; matching the
                // reset affordance, which only shows then
                if self.session.controller().phase() == Phase::Resolved {
                    self.session.reset_conversation();
                    self.input.clear();
                    self.scroll_from_bottom = 0;
                }
            }
            Action::Export => self.export_transcript(),
            Action::Up => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(1);
            }
            Action::Down => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(1);
            }
            Action::None => {}
        }
    }

    /// Submit the current input as a message.
    fn submit_input(&mut self) {
        self.sync_draft();
        if self.session.submit() {
            // Accepted: record history and clear the field
            self.input.submit();
            self.scroll_from_bottom = 0;
        }
    }

    /// Mirror the input widget's content into the controller draft.
    fn sync_draft(&mut self) {
        self.session.set_draft_input(self.input.content());
    }

    /// Increment tick counter and update time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        // Clear notification after TTL expires
        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }

        // Apply any settlements that arrived since the last tick
        if self.session.poll_settlements() > 0 {
            self.scroll_from_bottom = 0;
        }
    }

    /// Set a temporary notification message.
    fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        // Display for ~3 seconds at 4 Hz tick rate (250ms) = 12 ticks
        self.notification_ttl = 12;
    }

    /// Export the transcript to a JSONL file in the working directory.
    fn export_transcript(&mut self) {
        let controller = self.session.controller();
        let path = PathBuf::from(transcript_file_name(controller.conversation_id()));
        match export_transcript(controller, &path) {
            Ok(()) => {
                self.set_notification(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                self.set_notification(format!("Export failed: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, key, FIXED_REPLY};

    #[tokio::test]
    async fn test_typing_edits_draft() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Char('i')));

        assert_eq!(app.input.content(), "hi");
        assert_eq!(app.session.controller().draft_input(), "hi");
    }

    #[tokio::test]
    async fn test_enter_submits_and_gates_typing() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Char('i')));
        app.handle_key(key(KeyCode::Enter));

        assert!(app.input.is_empty());
        assert!(app.session.controller().is_loading());

        // While loading, printable keys are not typed into the draft
        app.handle_key(key(KeyCode::Char('x')));
        assert!(app.input.is_empty());
        assert!(app.session.controller().draft_input().is_empty());
    }

    #[tokio::test]
    async fn test_enter_with_blank_input_is_inert() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.session.controller().is_loading());
        assert_eq!(app.session.controller().messages().len(), 1);
    }

    #[tokio::test]
    async fn test_feedback_keys_after_reply() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Enter));
        app.session.settled().await;
        assert_eq!(app.session.controller().phase(), Phase::GotAnswer);
        let reply = &app.session.controller().messages()[2];
        assert_eq!(reply.content, FIXED_REPLY);

        // Input is disabled, so a plain 'y' is the feedback command
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.session.controller().phase(), Phase::Resolved);
    }

    #[tokio::test]
    async fn test_reset_key_only_when_resolved() {
        let mut app = create_test_app();

        // 'r' types into the input while the conversation is open
        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.input.content(), "r");
        assert_eq!(app.session.controller().messages().len(), 1);
        app.handle_key(key(KeyCode::Backspace));

        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Enter));
        app.session.settled().await;
        app.handle_action(Action::FeedbackYes);
        assert_eq!(app.session.controller().phase(), Phase::Resolved);
        assert_eq!(app.session.controller().messages().len(), 4);

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.session.controller().phase(), Phase::Asking);
        assert_eq!(app.session.controller().messages().len(), 1);
    }

    #[tokio::test]
    async fn test_esc_cancels_while_loading() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.session.controller().is_loading());

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.should_quit);
        assert!(app.notification.is_some());
    }

    #[tokio::test]
    async fn test_esc_quits_when_idle() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_help_closes_before_quit() {
        let mut app = create_test_app();
        app.show_help = true;

        app.handle_action(Action::Quit);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_scroll_actions() {
        let mut app = create_test_app();
        app.handle_action(Action::Up);
        app.handle_action(Action::Up);
        assert_eq!(app.scroll_from_bottom, 2);

        app.handle_action(Action::Down);
        assert_eq!(app.scroll_from_bottom, 1);

        app.handle_action(Action::Down);
        app.handle_action(Action::Down);
        assert_eq!(app.scroll_from_bottom, 0);
    }

    #[tokio::test]
    async fn test_settlement_pins_transcript_to_bottom() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Enter));
        app.handle_action(Action::Up);

        while app.session.controller().is_loading() {
            tokio::task::yield_now().await;
            app.tick();
        }
        assert_eq!(app.scroll_from_bottom, 0);
    }

    #[tokio::test]
    async fn test_tick_applies_settlements() {
        let mut app = create_test_app();
        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Enter));

        while app.session.controller().is_loading() {
            tokio::task::yield_now().await;
            app.tick();
        }
        assert_eq!(app.session.controller().phase(), Phase::GotAnswer);
    }

    #[tokio::test]
    async fn test_export_transcript_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();

        let mut app = create_test_app();
        app.handle_action(Action::Export);
        assert!(app
            .notification
            .as_deref()
            .is_some_and(|n| n.starts_with("Exported to")));
    }
}

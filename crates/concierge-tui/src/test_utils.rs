//! Test utilities for concierge-tui rendering and interaction tests.
//!
//! Provides a deterministic responder, app constructors, and helpers for
//! rendering screens into plain strings on a `TestBackend` buffer.

use crate::app::App;
use crate::screens::Screen as ScreenTrait;
use async_trait::async_trait;
use concierge_engine::{ChatConfig, Message, Reply, Responder, ResponderError};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{buffer::Buffer, layout::Rect};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Reply the test responder always produces.
pub const FIXED_REPLY: &str = "Here's what I found in the handbook.";

/// Responder that replies immediately and deterministically.
pub struct TestResponder;

#[async_trait]
impl Responder for TestResponder {
    async fn respond(
        &self,
        _message: &str,
        _history: &[Message],
        cancel: CancellationToken,
    ) -> Result<Reply, ResponderError> {
        if cancel.is_cancelled() {
            return Err(ResponderError::Cancelled);
        }
        Ok(Reply::new(FIXED_REPLY))
    }
}

/// Create a test app over the deterministic responder.
pub fn create_test_app() -> App {
    App::new(ChatConfig::default(), Arc::new(TestResponder))
}

/// A plain key press.
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Convert a buffer to a string representation for assertions.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = buffer.cell((x, y)).unwrap();
            result.push_str(cell.symbol());
        }
        // Trim trailing whitespace from each line
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    result
}

/// Render a screen to a buffer and return it as a string.
pub fn render_screen_to_string<S: ScreenTrait>(screen: &S, app: &App) -> String {
    render_screen_to_string_sized(screen, app, TEST_WIDTH, TEST_HEIGHT)
}

/// Render a screen to a buffer and return it as a string with custom dimensions.
pub fn render_screen_to_string_sized<S: ScreenTrait>(
    screen: &S,
    app: &App,
    width: u16,
    height: u16,
) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_test_app() {
        let app = create_test_app();
        assert!(!app.should_quit);
        assert_eq!(app.session.controller().messages().len(), 1);
    }

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 1, "World", ratatui::style::Style::default());

        let result = buffer_to_string(&buffer);
        assert!(result.contains("Hello"));
        assert!(result.contains("World"));
    }
}

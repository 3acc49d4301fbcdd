//! Single-line text input widget for the chat prompt.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// A single-line text input widget.
#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    /// The text content.
    content: &'a str,
    /// Cursor position (character index).
    cursor: usize,
    /// Optional block for borders/title.
    block: Option<Block<'a>>,
    /// Whether the input accepts typing.
    enabled: bool,
    /// Placeholder text shown while empty.
    placeholder: &'a str,
    /// Prompt prefix.
    prompt: &'a str,
}

impl<'a> TextInput<'a> {
    /// Create a new text input over the given state.
    pub fn new(state: &'a TextInputState) -> Self {
        Self {
            content: state.content(),
            cursor: state.cursor,
            block: None,
            enabled: true,
            placeholder: "",
            prompt: "> ",
        }
    }

    /// Set the block for the text input.
    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Set whether the input accepts typing.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set placeholder text.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let prompt_style = if self.enabled {
            Styles::active()
        } else {
            Styles::dim()
        };
        let mut spans = vec![Span::styled(self.prompt, prompt_style)];

        if self.content.is_empty() {
            if self.enabled {
                spans.push(Span::styled("_", Styles::default()));
            }
            spans.push(Span::styled(self.placeholder, Styles::dim()));
        } else {
            let text_style = if self.enabled {
                Styles::default()
            } else {
                Styles::dim()
            };
            for (i, ch) in self.content.chars().enumerate() {
                if self.enabled && i == self.cursor {
                    spans.push(Span::styled("|", Styles::active()));
                }
                spans.push(Span::styled(ch.to_string(), text_style));
            }
            if self.enabled && self.cursor >= self.content.chars().count() {
                spans.push(Span::styled("_", Styles::default()));
            }
        }

        Paragraph::new(vec![Line::from(spans)]).render(inner, buf);
    }
}

/// State for a text input, managing content and cursor position.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    /// The text content.
    content: String,
    /// Cursor position (character index).
    pub cursor: usize,
    /// Input history for up/down navigation.
    history: Vec<String>,
    /// Current history index (-1 = current input).
    history_index: isize,
    /// Saved current input when navigating history.
    saved_input: String,
}

impl TextInputState {
    /// Create a new empty text input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Clear the content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    fn byte_index(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor)
            .map_or(self.content.len(), |(i, _)| i)
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index();
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_index();
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.content.remove(at);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.content.chars().count() {
            let at = self.byte_index();
            self.content.remove(at);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.content.chars().count() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.content.chars().count();
    }

    /// Add current content to history and clear.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        self.history_index = -1;
        self.saved_input.clear();
        content
    }

    /// Navigate to previous history entry.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }

        // Save current input if at the bottom
        if self.history_index == -1 {
            self.saved_input = self.content.clone();
        }

        let new_index = self.history_index + 1;
        #[allow(clippy::cast_sign_loss)]
        if (new_index as usize) < self.history.len() {
            self.history_index = new_index;
            #[allow(clippy::cast_sign_loss)]
            {
                self.content = self.history[self.history.len() - 1 - new_index as usize].clone();
            }
            self.cursor = self.content.chars().count();
        }
    }

    /// Navigate to next history entry.
    pub fn history_next(&mut self) {
        if self.history_index <= 0 {
            // Restore saved input
            if self.history_index == 0 {
                self.content = std::mem::take(&mut self.saved_input);
                self.cursor = self.content.chars().count();
            }
            self.history_index = -1;
            return;
        }

        self.history_index -= 1;
        #[allow(clippy::cast_sign_loss)]
        {
            self.content =
                self.history[self.history.len() - 1 - self.history_index as usize].clone();
        }
        self.cursor = self.content.chars().count();
    }
}

//! The chat screen: transcript, feedback bar, input, and status bar.

use crate::app::App;
use crate::placeholder::input_placeholder;
use crate::screens::Screen;
use crate::ui::theme::{spinner_frame, Styles, Symbols};
use crate::ui::widgets::{KeyHint, StatusBar, TextInput};
use concierge_engine::{Controller, Phase, Role};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Fixed height of the bordered input area (in lines).
const INPUT_HEIGHT: u16 = 3;

/// Height of the two-line header.
const HEADER_HEIGHT: u16 = 2;

/// Minimum wrap width before the transcript gives up on indentation.
const MIN_WRAP_WIDTH: usize = 10;

/// Status bar mode label for the current state.
fn mode_label(controller: &Controller) -> &'static str {
    if controller.is_loading() {
        return "WAITING";
    }
    match controller.phase() {
        Phase::Asking => "ASKING",
        Phase::GotAnswer => "ANSWERED",
        Phase::NeedMoreInfo => "NEED MORE",
        Phase::Resolved => "RESOLVED",
    }
}

/// Key hints for the current state.
fn key_hints(controller: &Controller) -> Vec<KeyHint> {
    if controller.is_loading() {
        vec![
            KeyHint::new("Esc", "cancel"),
            KeyHint::new("^C", "quit"),
        ]
    } else if controller.awaiting_feedback() {
        vec![
            KeyHint::new("y", "helpful"),
            KeyHint::new("n", "not quite"),
            KeyHint::new("^C", "quit"),
        ]
    } else if controller.phase() == Phase::Resolved {
        vec![
            KeyHint::new("r", "new question"),
            KeyHint::new("?", "help"),
            KeyHint::new("q", "quit"),
        ]
    } else {
        vec![
            KeyHint::new("Enter", "send"),
            KeyHint::new("^E", "export"),
            KeyHint::new("Esc", "quit"),
        ]
    }
}

/// The single conversation screen.
pub struct ChatScreen;

impl ChatScreen {
    fn render_header(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::from(Span::styled(app.title.clone(), Styles::title()))];
        if let Some(notification) = &app.notification {
            lines.push(Line::from(Span::styled(
                notification.clone(),
                Styles::warning(),
            )));
        }
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Styles::default())
            .render(area, buf);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_transcript(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let controller = app.session.controller();
        let width = area.width.saturating_sub(2) as usize;

        let mut lines: Vec<Line<'_>> = Vec::new();
        for message in controller.messages() {
            let (prefix, prefix_style) = match message.role {
                Role::User => ("You: ", Styles::user()),
                Role::Assistant => ("Assistant: ", Styles::assistant()),
            };
            let prefix_width = UnicodeWidthStr::width(prefix);
            let wrap_width = width.saturating_sub(prefix_width).max(MIN_WRAP_WIDTH);

            for (i, chunk) in textwrap::wrap(&message.content, wrap_width).iter().enumerate() {
                if i == 0 {
                    lines.push(Line::from(vec![
                        Span::styled(prefix, prefix_style),
                        Span::styled(chunk.to_string(), Styles::default()),
                    ]));
                } else {
                    lines.push(Line::from(vec![
                        Span::raw(" ".repeat(prefix_width)),
                        Span::styled(chunk.to_string(), Styles::default()),
                    ]));
                }
            }
            lines.push(Line::default());
        }

        if controller.is_loading() {
            lines.push(Line::from(Span::styled(
                format!("Assistant is typing {}", spinner_frame(app.tick)),
                Styles::dim(),
            )));
        }

        // Clamp the scroll offset and show the bottom-most window
        let visible = area.height as usize;
        let total = lines.len();
        if total > visible {
            let max_scroll = total - visible;
            let scroll = app.scroll_from_bottom.min(max_scroll);
            let start = total - visible - scroll;
            lines.drain(..start);
            lines.truncate(visible);
        }

        Paragraph::new(lines).style(Styles::default()).render(area, buf);
    }

    fn render_feedback_bar(&self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" Was this response helpful?  ", Styles::default()),
            Span::styled(Symbols::YES, Styles::success()),
            Span::styled(" yes  ", Styles::default()),
            Span::styled(Symbols::NO, Styles::error()),
            Span::styled(" no", Styles::default()),
        ]);
        Paragraph::new(vec![line]).style(Styles::default()).render(area, buf);
    }

    fn render_input(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let controller = app.session.controller();
        let enabled = controller.input_enabled();
        let border_style = if enabled {
            Styles::border_active()
        } else {
            Styles::border()
        };
        let block = Block::default()
            .title(" Message ")
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Styles::default());

        let placeholder = input_placeholder(controller.phase(), controller.awaiting_feedback());
        TextInput::new(&app.input)
            .enabled(enabled)
            .placeholder(placeholder)
            .block(block)
            .render(area, buf);
    }

    fn render_status_bar(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let controller = app.session.controller();
        StatusBar::new(mode_label(controller))
            .hints(key_hints(controller))
            .right(&app.title)
            .render(area, buf);
    }
}

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        // Fill the background
        Block::default().style(Styles::default()).render(area, buf);

        let awaiting = app.session.controller().awaiting_feedback();
        let mut constraints = vec![
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
        ];
        if awaiting {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(INPUT_HEIGHT));
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        self.render_header(app, chunks[0], buf);
        self.render_transcript(app, chunks[1], buf);

        let mut next = 2;
        if awaiting {
            self.render_feedback_bar(chunks[next], buf);
            next += 1;
        }
        self.render_input(app, chunks[next], buf);
        self.render_status_bar(app, chunks[next + 1], buf);
    }
}

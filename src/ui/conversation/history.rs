//! Conversation transcript display component

use crate::ui::markdown;
use chrono::{DateTime, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Role of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// A single message in the transcript. Immutable once created.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only transcript for the current session; insertion order is the
/// display order.
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Render the transcript, bottom-anchored. `typing` carries the current
    /// dot phase while a request is outstanding.
    pub fn render(&self, area: Rect, buf: &mut Buffer, typing: Option<&str>) {
        let block = Block::default().borders(Borders::ALL).title(" Conversation ");

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.messages.is_empty() && typing.is_none() {
            let welcome_lines = [
                Line::from(Span::styled(
                    "Welcome to gemchat.",
                    Style::default().fg(Color::Green),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Type a message below and press Enter to send.",
                    Style::default().fg(Color::Gray),
                )),
            ];

            for (i, line) in welcome_lines.iter().enumerate() {
                if i < inner_area.height as usize {
                    buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
                }
            }
            return;
        }

        let width = inner_area.width.saturating_sub(2) as usize;
        let mut all_lines: Vec<Line<'static>> = Vec::new();

        for message in &self.messages {
            all_lines.extend(render_message(message, width));
            // spacing between messages
            all_lines.push(Line::from(""));
        }

        if let Some(dots) = typing {
            all_lines.push(Line::from(vec![
                Span::styled("Typing", Style::default().fg(Color::Gray)),
                Span::styled(dots.to_string(), Style::default().fg(Color::Gray)),
            ]));
        }

        // Show the last lines that fit
        let height = inner_area.height as usize;
        let total = all_lines.len();
        let start = total.saturating_sub(height);

        for (i, line) in all_lines[start..].iter().enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        Role::Bot => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Bot => "Gemini",
    }
}

/// Header line plus the markdown-rendered body, wrapped and indented.
fn render_message(message: &Message, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let timestamp = message.timestamp.format("%H:%M:%S").to_string();
    lines.push(Line::from(vec![
        Span::styled(role_label(message.role), role_style(message.role)),
        Span::styled(
            format!(" {} {}", timestamp, "─".repeat(16)),
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    for content_line in markdown::render_markdown(&message.text) {
        for wrapped in markdown::wrap_line(&content_line, width) {
            let mut spans = vec![Span::raw("  ")];
            spans.extend(wrapped.spans);
            lines.push(Line::from(spans));
        }
    }

    lines
}

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Single-line draft editor for the next message.
///
/// Enter never reaches this widget; the manager turns it into a submission,
/// so the draft can never contain a newline.
pub struct ConversationComposer {
    content: String,
    /// Cursor position as a character index into `content`.
    cursor: usize,
    placeholder: String,
}

impl ConversationComposer {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            placeholder: placeholder.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the draft wholesale, cursor at the end.
    pub fn set_content(&mut self, content: String) {
        self.cursor = content.chars().count();
        self.content = content;
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Handle an editing key. Returns true if the visible state changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match key.code {
            KeyCode::Char(c) => {
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    true
                } else {
                    false
                }
            }
            KeyCode::Right => {
                if self.cursor < self.char_count() {
                    self.cursor += 1;
                    true
                } else {
                    false
                }
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.char_count();
                true
            }
            _ => false,
        }
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Byte offset of the given character index.
    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(offset, _)| offset)
            .unwrap_or(self.content.len())
    }

    fn insert_char(&mut self, c: char) {
        let offset = self.byte_offset(self.cursor);
        self.content.insert(offset, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            let offset = self.byte_offset(self.cursor);
            self.content.remove(offset);
            true
        } else {
            false
        }
    }

    fn delete(&mut self) -> bool {
        if self.cursor < self.char_count() {
            let offset = self.byte_offset(self.cursor);
            self.content.remove(offset);
            true
        } else {
            false
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Green));

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.content.is_empty() {
            let placeholder_line = Line::from(vec![Span::styled(
                &*self.placeholder,
                Style::default().fg(Color::DarkGray),
            )]);
            buf.set_line(inner_area.x, inner_area.y, &placeholder_line, inner_area.width);
        } else {
            // Show the cursor as a block character at its position
            let mut content = self.content.clone();
            let offset = self.byte_offset(self.cursor);
            content.insert(offset, '▌');

            let line = Line::from(vec![Span::raw(content)]);
            buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn type_str(composer: &mut ConversationComposer, text: &str) {
        for c in text.chars() {
            composer.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_appends_at_the_cursor() {
        let mut composer = ConversationComposer::new("");
        type_str(&mut composer, "hello");
        assert_eq!(composer.content(), "hello");
    }

    #[test]
    fn backspace_removes_before_the_cursor() {
        let mut composer = ConversationComposer::new("");
        type_str(&mut composer, "hey");
        assert!(composer.handle_key(press(KeyCode::Backspace)));
        assert_eq!(composer.content(), "he");
    }

    #[test]
    fn backspace_on_empty_draft_reports_no_change() {
        let mut composer = ConversationComposer::new("");
        assert!(!composer.handle_key(press(KeyCode::Backspace)));
    }

    #[test]
    fn cursor_moves_respect_char_boundaries() {
        let mut composer = ConversationComposer::new("");
        type_str(&mut composer, "héllo");
        composer.handle_key(press(KeyCode::Home));
        composer.handle_key(press(KeyCode::Right));
        composer.handle_key(press(KeyCode::Right));
        composer.handle_key(press(KeyCode::Char('x')));
        assert_eq!(composer.content(), "héxllo");
    }

    #[test]
    fn delete_removes_at_the_cursor() {
        let mut composer = ConversationComposer::new("");
        type_str(&mut composer, "abc");
        composer.handle_key(press(KeyCode::Home));
        assert!(composer.handle_key(press(KeyCode::Delete)));
        assert_eq!(composer.content(), "bc");
    }

    #[test]
    fn set_content_puts_the_cursor_at_the_end() {
        let mut composer = ConversationComposer::new("");
        composer.set_content("draft".to_string());
        composer.handle_key(press(KeyCode::Char('!')));
        assert_eq!(composer.content(), "draft!");
    }
}

//! Single-line text input used by the list browser's search box.

use crate::styles::theme;
use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Default)]
pub struct InputField {
    /// The current value of the field.
    pub value: String,
    /// The cursor position within the value, in chars.
    pub cursor: usize,
    /// Label displayed in the border.
    pub label: String,
    /// Placeholder shown when value is empty.
    pub placeholder: Option<String>,
    pub is_focused: bool,
}

impl InputField {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Handle a key press. Returns true if the value changed.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => {
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => self.handle_backspace(),
            KeyCode::Delete => self.handle_delete(),
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.chars().count());
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
                false
            }
            _ => false,
        }
    }

    fn byte_pos(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn insert_char(&mut self, c: char) {
        let byte_pos = self.byte_pos(self.cursor);
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    fn handle_backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.byte_pos(self.cursor - 1);
        let end = self.byte_pos(self.cursor);
        self.value.replace_range(start..end, "");
        self.cursor -= 1;
        true
    }

    fn handle_delete(&mut self) -> bool {
        if self.cursor >= self.value.chars().count() {
            return false;
        }
        let start = self.byte_pos(self.cursor);
        let end = self.byte_pos(self.cursor + 1);
        self.value.replace_range(start..end, "");
        true
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if self.is_focused {
                t.border_focused
            } else {
                t.border
            }))
            .title(format!(" {} ", self.label));

        let (text, style) = match (&self.placeholder, self.value.is_empty()) {
            (Some(placeholder), true) => (placeholder.clone(), Style::default().fg(t.text_muted)),
            _ => (self.value.clone(), Style::default().fg(t.text)),
        };
        frame.render_widget(Paragraph::new(text).style(style).block(block), area);

        if self.is_focused {
            let cursor_x = area.x + 1 + self.cursor as u16;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                frame.set_cursor_position((cursor_x, area.y + 1));
            }
        }
    }
}

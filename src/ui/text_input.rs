use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::theme::Theme;
use crate::ui::EventResult;

/// A single-line text field rendered inside its own bordered box.
///
/// The field only edits; whoever owns it decides what submit and cancel
/// mean, so Enter, Esc and Tab fall through as `Ignored`.
pub struct TextInput {
    label: &'static str,
    placeholder: &'static str,
    value: String,
    cursor: usize,
}

impl TextInput {
    pub const fn new(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            value: String::new(),
            cursor: 0,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Byte index of the character left of the cursor.
    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn delete_char_before_cursor(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.value.remove(prev);
            self.cursor = prev;
        }
    }

    fn delete_char_at_cursor(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    fn move_cursor_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    fn move_cursor_right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    fn delete_word_before_cursor(&mut self) {
        // Skip spaces right of the word, then take the word itself.
        let before = &self.value[..self.cursor];
        let trimmed = before.trim_end_matches(' ');
        let word_start = trimmed.rfind(' ').map_or(0, |i| i + 1);
        self.value.drain(word_start..self.cursor);
        self.cursor = word_start;
    }

    fn clear_line(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EventResult<()> {
        match (key.code, key.modifiers) {
            (KeyCode::Backspace, KeyModifiers::ALT) => self.delete_word_before_cursor(),
            (KeyCode::Backspace, _) => self.delete_char_before_cursor(),
            (KeyCode::Delete, _) => self.delete_char_at_cursor(),
            (KeyCode::Left, _) => self.move_cursor_left(),
            (KeyCode::Right, _) => self.move_cursor_right(),
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => self.cursor = 0,
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.value.len();
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => self.clear_line(),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => self.insert_char(c),
            _ => return EventResult::Ignored,
        }
        EventResult::Consumed
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme, focused: bool) {
        let border_color = if focused {
            theme.border_focused()
        } else {
            theme.border()
        };
        let title_color = if focused { theme.mauve } else { theme.subtext1 };

        let block = Block::default()
            .title(format!(" {} ", self.label))
            .title_style(Style::default().fg(title_color).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let input_style = Style::default().fg(theme.text);
        let cursor_style = Style::default()
            .fg(theme.base)
            .bg(theme.text)
            .add_modifier(Modifier::BOLD);
        let placeholder_style = Style::default().fg(theme.overlay0);

        let line = if self.value.is_empty() {
            if focused {
                Line::from(vec![
                    Span::styled(" ", cursor_style),
                    Span::styled(self.placeholder, placeholder_style),
                ])
            } else {
                Line::from(Span::styled(self.placeholder, placeholder_style))
            }
        } else if focused {
            let (before, after) = self.value.split_at(self.cursor);
            let cursor_char = after.chars().next().unwrap_or(' ');
            let rest: String = after.chars().skip(1).collect();

            Line::from(vec![
                Span::styled(before.to_string(), input_style),
                Span::styled(cursor_char.to_string(), cursor_style),
                Span::styled(rest, input_style),
            ])
        } else {
            Line::from(Span::styled(self.value.clone(), input_style))
        };

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::config::{FormAction, KeyResolver};
use crate::theme::Theme;
use crate::ui::{self, EventResult, TextInput};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueFormEvent {
    /// The user asked to join; values are raw and still need validation.
    Submitted { name: String, phone: String },
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Phone,
}

/// Modal form collecting the visitor's name and phone for a queue spot.
pub struct QueueForm {
    service_name: String,
    name: TextInput,
    phone: TextInput,
    focus: Field,
    resolver: Arc<KeyResolver>,
}

impl QueueForm {
    pub fn new(service_name: impl Into<String>, resolver: Arc<KeyResolver>) -> Self {
        Self {
            service_name: service_name.into(),
            name: TextInput::new("Name", "Your full name"),
            phone: TextInput::new("Phone", "e.g. 21 555 0199"),
            focus: Field::Name,
            resolver,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EventResult<QueueFormEvent> {
        if self.resolver.matches_form(&key, FormAction::Cancel) {
            return QueueFormEvent::Cancelled.into();
        }
        if self.resolver.matches_form(&key, FormAction::Submit) {
            return QueueFormEvent::Submitted {
                name: self.name.value().to_string(),
                phone: self.phone.value().to_string(),
            }
            .into();
        }
        if self.resolver.matches_form(&key, FormAction::NextField) {
            self.toggle_focus();
            return EventResult::Consumed;
        }

        let field = match self.focus {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
        };
        if field.handle_key(key).is_consumed() {
            return EventResult::Consumed;
        }

        // Arrow keys are not text edits, so let them move between fields.
        if matches!(key.code, KeyCode::Up | KeyCode::Down) {
            self.toggle_focus();
        }

        // Modal: nothing falls through to the screen below.
        EventResult::Consumed
    }

    const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Name => Field::Phone,
            Field::Phone => Field::Name,
        };
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup = ui::centered(area, Constraint::Percentage(50), Constraint::Length(11));
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" Join the queue · {} ", self.service_name))
            .title_style(
                Style::default()
                    .fg(theme.highlight())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border_focused()))
            .style(Style::default().bg(theme.base));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [name_area, phone_area, _, hint_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        self.name
            .render(frame, name_area, theme, self.focus == Field::Name);
        self.phone
            .render(frame, phone_area, theme, self.focus == Field::Phone);

        let hint = Line::from(vec![
            Span::styled(
                self.resolver.display_form(FormAction::Submit),
                Style::default().fg(theme.peach),
            ),
            Span::styled(" join   ", Style::default().fg(theme.subtext0)),
            Span::styled(
                self.resolver.display_form(FormAction::NextField),
                Style::default().fg(theme.peach),
            ),
            Span::styled(" next field   ", Style::default().fg(theme.subtext0)),
            Span::styled(
                self.resolver.display_form(FormAction::Cancel),
                Style::default().fg(theme.peach),
            ),
            Span::styled(" cancel", Style::default().fg(theme.subtext0)),
        ]);
        frame.render_widget(Paragraph::new(hint), hint_area);
    }
}

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::config::{DialogAction, KeyResolver};
use crate::intake::{Notice, Severity};
use crate::theme::Theme;
use crate::ui::{self, EventResult};

pub enum AlertEvent {
    Dismissed,
    CopyRequested,
}

/// Blocking notice dialog. Swallows every key except dismiss and, when the
/// notice carries a copyable payload, copy.
pub struct AlertDialog {
    notice: Notice,
    resolver: Arc<KeyResolver>,
}

impl AlertDialog {
    pub const fn new(notice: Notice, resolver: Arc<KeyResolver>) -> Self {
        Self { notice, resolver }
    }

    pub const fn notice(&self) -> &Notice {
        &self.notice
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EventResult<AlertEvent> {
        if self.resolver.matches_dialog(&key, DialogAction::Dismiss) {
            return AlertEvent::Dismissed.into();
        }
        if self.notice.copy_text.is_some() && self.resolver.matches_dialog(&key, DialogAction::Copy)
        {
            return AlertEvent::CopyRequested.into();
        }
        EventResult::Consumed
    }

    fn accent(&self, theme: &Theme) -> (Color, &'static str) {
        match self.notice.severity {
            Severity::Success => (theme.success(), " Success "),
            Severity::Warning => (theme.warning(), " Notice "),
            Severity::Error => (theme.error(), " Error "),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let (accent, title) = self.accent(theme);

        let mut lines = vec![Line::from("")];
        lines.extend(
            self.notice
                .message
                .lines()
                .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(theme.text)))),
        );
        lines.push(Line::from(""));

        let mut hint = format!(
            "{} dismiss",
            self.resolver.display_dialog(DialogAction::Dismiss)
        );
        if self.notice.copy_text.is_some() {
            hint.push_str(&format!(
                "  {} copy details",
                self.resolver.display_dialog(DialogAction::Copy)
            ));
        }
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(theme.overlay0),
        )));

        let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
        let popup_area = ui::centered(
            area,
            Constraint::Percentage(60),
            Constraint::Length(height.min(area.height)),
        );

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(theme.base));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
    }
}

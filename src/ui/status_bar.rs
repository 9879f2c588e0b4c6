use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::theme::Theme;

const FLASH_TTL: Duration = Duration::from_secs(3);

/// One `key → action` entry in the status bar.
pub struct Hint {
    pub key: String,
    pub action: &'static str,
}

impl Hint {
    pub fn new(key: impl Into<String>, action: &'static str) -> Self {
        Self {
            key: key.into(),
            action,
        }
    }
}

/// Bottom bar: brand and current selection on the left, key hints on the
/// right. A flash message temporarily replaces the hints.
pub struct StatusBar {
    flash: Option<(String, Instant)>,
}

impl StatusBar {
    pub const fn new() -> Self {
        Self { flash: None }
    }

    /// Show `text` in place of the hints for a few seconds.
    pub fn flash(&mut self, text: String) {
        self.flash = Some((text, Instant::now()));
    }

    pub fn handle_tick(&mut self) {
        if let Some((_, since)) = &self.flash
            && since.elapsed() >= FLASH_TTL
        {
            self.flash = None;
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        selection: Option<&str>,
        hints: &[Hint],
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border()))
            .style(Style::default().bg(theme.mantle));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut left = vec![Span::styled(
            "zerowait",
            Style::default()
                .fg(theme.highlight())
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(selection) = selection {
            left.push(Span::styled(" · ", Style::default().fg(theme.surface1)));
            left.push(Span::styled(
                selection.to_string(),
                Style::default().fg(theme.subtext1),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(left)), inner);

        let right = self.flash.as_ref().map_or_else(
            || hint_line(hints, theme),
            |(text, _)| {
                Line::from(Span::styled(
                    text.clone(),
                    Style::default().fg(theme.success()),
                ))
            },
        );
        frame.render_widget(
            Paragraph::new(right).alignment(Alignment::Right),
            inner,
        );
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

fn hint_line(hints: &[Hint], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 4);
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            hint.key.clone(),
            Style::default().fg(theme.peach),
        ));
        spans.push(Span::styled(" │ ", Style::default().fg(theme.surface1)));
        spans.push(Span::styled(
            hint.action,
            Style::default().fg(theme.subtext0),
        ));
    }
    Line::from(spans)
}

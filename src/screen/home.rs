use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::config::{HomeAction, KeyResolver};
use crate::theme::Theme;
use crate::ui::{EventResult, Spinner};

/// Events emitted by the landing screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeEvent {
    ChooseService,
}

/// Landing screen shown before a service has been picked.
///
/// While a location lookup is in flight it shows a spinner so the user
/// knows why the nearby list has not appeared yet.
pub struct HomeScreen {
    resolver: Arc<KeyResolver>,
    spinner: Spinner,
    locating: bool,
}

impl HomeScreen {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            resolver,
            spinner: Spinner::new().with_label("Finding your location..."),
            locating: false,
        }
    }

    pub const fn set_locating(&mut self, locating: bool) {
        self.locating = locating;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EventResult<HomeEvent> {
        if self.resolver.matches_home(&key, HomeAction::ChooseService) {
            return HomeEvent::ChooseService.into();
        }
        EventResult::Ignored
    }

    pub fn handle_tick(&mut self) {
        if self.locating {
            self.spinner.on_tick();
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border()))
            .title(" zerowait ")
            .title_style(
                Style::default()
                    .fg(theme.highlight())
                    .add_modifier(Modifier::BOLD),
            );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [_, content, spinner_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Fill(2),
        ])
        .areas(inner);

        let body = Style::default().fg(theme.subtext1);
        let lines = vec![
            Line::styled(
                "Skip the line.",
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::default(),
            Line::styled("Pick a service, see what is nearby, and join the", body),
            Line::styled("queue before you arrive.", body),
            Line::default(),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(theme.subtext0)),
                Span::styled(
                    self.resolver.display_home(HomeAction::ChooseService),
                    Style::default()
                        .fg(theme.peach)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to choose a service", Style::default().fg(theme.subtext0)),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            content,
        );

        if self.locating {
            self.spinner.render(frame, spinner_area, theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::config::KeybindingsConfig;

    fn screen() -> HomeScreen {
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        HomeScreen::new(resolver)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn choose_service_key_emits_event() {
        let mut home = screen();
        assert_eq!(
            home.handle_key(key(KeyCode::Char('s'))),
            EventResult::Event(HomeEvent::ChooseService)
        );
    }

    #[test]
    fn unrelated_keys_fall_through() {
        let mut home = screen();
        assert_eq!(home.handle_key(key(KeyCode::Char('x'))), EventResult::Ignored);
    }
}

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use throbber_widgets_tui::WhichUse::Spin;
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, ThrobberState};

use crate::theme::Theme;
use crate::ui;

/// Small animated activity indicator, centered in its area.
pub struct Spinner {
    state: ThrobberState,
    label: Option<&'static str>,
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            state: ThrobberState::default(),
            label: None,
        }
    }

    pub const fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn on_tick(&mut self) {
        self.state.calc_next();
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut throbber = Throbber::default()
            .throbber_set(BRAILLE_SIX)
            .use_type(Spin)
            .throbber_style(Style::default().fg(theme.lavender))
            .style(Style::default().fg(theme.subtext1));
        if let Some(label) = self.label {
            throbber = throbber.label(label);
        }

        // One glyph, plus a space and the label when present.
        let width = self.label.map_or(1, |label| {
            u16::try_from(label.len()).unwrap_or(u16::MAX).saturating_add(2)
        });
        let slot = ui::centered(area, Constraint::Length(width), Constraint::Length(1));
        frame.render_stateful_widget(throbber, slot, &mut self.state);
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

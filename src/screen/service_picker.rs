use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Clear, ListItem};

use crate::catalog::{self, ServiceCategory};
use crate::config::{GlobalAction, KeyResolver};
use crate::theme::Theme;
use crate::ui::{self, EventResult, ListRow, SelectList, SelectListEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServicePickerEvent {
    /// A category was activated; carries the category id.
    Selected(String),
    Cancelled,
}

impl ListRow for ServiceCategory {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        ListItem::new(Span::styled(self.name, Style::default().fg(theme.text)))
    }
}

/// Modal picker listing the service categories a queue can be joined for.
pub struct ServicePicker {
    list: SelectList<ServiceCategory>,
    resolver: Arc<KeyResolver>,
}

impl ServicePicker {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            list: SelectList::new(catalog::CATEGORIES.to_vec(), Arc::clone(&resolver)),
            resolver,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EventResult<ServicePickerEvent> {
        if self.resolver.matches_global(&key, GlobalAction::Back) {
            return ServicePickerEvent::Cancelled.into();
        }
        match self.list.handle_key(key) {
            EventResult::Event(SelectListEvent::Activated(category)) => {
                ServicePickerEvent::Selected(category.id.to_string()).into()
            }
            // Modal: keys that mean nothing here must not reach the screen below.
            _ => EventResult::Consumed,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let height = u16::try_from(catalog::CATEGORIES.len() + 2).unwrap_or(10);
        let popup = ui::centered(area, Constraint::Percentage(40), Constraint::Length(height));
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Choose a service ")
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
        self.list.render(frame, inner, theme);
    }
}

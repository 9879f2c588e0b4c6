use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{List, ListItem, ListState};

use crate::config::{KeyResolver, NavAction};
use crate::theme::Theme;
use crate::ui::EventResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectListEvent<T> {
    Activated(T),
}

/// Something that can draw itself as one list row.
pub trait ListRow {
    fn render_row(&self, theme: &Theme) -> ListItem<'static>;
}

/// A navigable list of rows. Selection follows the configured navigation
/// keys; activating a row clones it into the event.
pub struct SelectList<T: ListRow + Clone> {
    items: Vec<T>,
    state: ListState,
    resolver: Arc<KeyResolver>,
}

impl<T: ListRow + Clone> SelectList<T> {
    pub fn new(items: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        let state = ListState::default().with_selected((!items.is_empty()).then_some(0));
        Self {
            items,
            state,
            resolver,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the rows, clamping the selection to the new bounds.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        let last = self.items.len().checked_sub(1);
        match (last, self.state.selected()) {
            (None, _) => self.state.select(None),
            (Some(last), Some(current)) if current > last => self.state.select(Some(last)),
            (Some(_), Some(_)) => {}
            (Some(_), None) => self.state.select(Some(0)),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EventResult<SelectListEvent<T>> {
        let Some(action) = self.resolver.nav_action(&key) else {
            return EventResult::Ignored;
        };
        match action {
            NavAction::Up => self.state.select_previous(),
            NavAction::Down => self.state.select_next(),
            NavAction::Home => self.state.select_first(),
            NavAction::End => self.state.select_last(),
            NavAction::Select => {
                if let Some(selected) = self.state.selected()
                    && let Some(item) = self.items.get(selected)
                {
                    return SelectListEvent::Activated(item.clone()).into();
                }
            }
        }
        EventResult::Consumed
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let items: Vec<ListItem> = self.items.iter().map(|i| i.render_row(theme)).collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.selection_fg())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::config::KeybindingsConfig;

    impl ListRow for &'static str {
        fn render_row(&self, _theme: &Theme) -> ListItem<'static> {
            ListItem::new(*self)
        }
    }

    fn list(items: Vec<&'static str>) -> SelectList<&'static str> {
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        SelectList::new(items, resolver)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn activation_reports_the_selected_row() {
        let mut list = list(vec!["first", "second"]);
        assert_eq!(list.handle_key(key(KeyCode::Down)), EventResult::Consumed);

        match list.handle_key(key(KeyCode::Enter)) {
            EventResult::Event(SelectListEvent::Activated(item)) => assert_eq!(item, "second"),
            other => panic!("expected activation, got {other:?}"),
        }
    }

    #[test]
    fn activation_on_an_empty_list_is_consumed() {
        let mut list = list(vec![]);
        assert_eq!(list.handle_key(key(KeyCode::Enter)), EventResult::Consumed);
    }

    #[test]
    fn set_items_clamps_the_selection() {
        let mut list = list(vec!["a", "b", "c"]);
        list.handle_key(key(KeyCode::End));

        list.set_items(vec!["a"]);
        match list.handle_key(key(KeyCode::Enter)) {
            EventResult::Event(SelectListEvent::Activated(item)) => assert_eq!(item, "a"),
            other => panic!("expected activation, got {other:?}"),
        }
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut list = list(vec!["a"]);
        assert_eq!(
            list.handle_key(key(KeyCode::Char('x'))),
            EventResult::Ignored
        );
    }
}

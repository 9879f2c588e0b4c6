use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, ListItem, Paragraph};

use crate::catalog::{self, NearbyVenue, ServiceCategory};
use crate::config::{KeyResolver, SearchAction};
use crate::location::LocationFix;
use crate::search::Matcher;
use crate::theme::Theme;
use crate::ui::{EventResult, ListRow, SelectList, SelectListEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NearbyEvent {
    /// Join the queue at the named venue.
    Join(String),
}

impl ListRow for NearbyVenue {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        let distance = self
            .distance_km
            .map_or_else(String::new, |km| format!("  {}", format_km(km)));
        ListItem::new(vec![
            Line::from(vec![
                Span::styled(
                    self.venue.name,
                    Style::default()
                        .fg(theme.text)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(distance, Style::default().fg(theme.peach)),
            ]),
            Line::from(Span::styled(
                format!(
                    "{} · ~{} min wait · {} in line",
                    self.venue.address, self.venue.typical_wait_min, self.venue.queue_len
                ),
                Style::default().fg(theme.subtext0),
            )),
        ])
    }
}

fn format_km(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else {
        format!("{km:.1} km")
    }
}

/// List of venues for the chosen category, closest first when a location
/// fix is available.
pub struct NearbyScreen {
    category: ServiceCategory,
    rows: Vec<NearbyVenue>,
    list: SelectList<NearbyVenue>,
    /// `Some` while the filter line is active; holds the typed pattern.
    search: Option<String>,
    matcher: Matcher,
    approximate: bool,
    resolver: Arc<KeyResolver>,
}

impl NearbyScreen {
    pub fn new(
        category: ServiceCategory,
        fix: Option<LocationFix>,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        let approximate = fix.is_none();
        let rows = catalog::nearby(category, fix);
        let list = SelectList::new(rows.clone(), Arc::clone(&resolver));
        Self {
            category,
            rows,
            list,
            search: None,
            matcher: Matcher::new(),
            approximate,
            resolver,
        }
    }

    pub const fn category(&self) -> ServiceCategory {
        self.category
    }

    pub const fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EventResult<NearbyEvent> {
        if self.search.is_some() {
            return self.handle_search_key(key);
        }
        if self.resolver.matches_search(&key, SearchAction::Toggle) {
            self.search = Some(String::new());
            return EventResult::Consumed;
        }
        match self.list.handle_key(key) {
            EventResult::Event(SelectListEvent::Activated(row)) => {
                NearbyEvent::Join(row.venue.name.to_string()).into()
            }
            EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
        }
    }

    /// While the filter is active printable keys edit the pattern and the
    /// rest still drive the list, so Enter joins the highlighted venue
    /// without leaving search first.
    fn handle_search_key(&mut self, key: KeyEvent) -> EventResult<NearbyEvent> {
        if self.resolver.matches_search(&key, SearchAction::Exit) {
            self.search = None;
            self.refresh();
            return EventResult::Consumed;
        }
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(pattern) = &mut self.search {
                    pattern.push(c);
                }
                self.refresh();
                EventResult::Consumed
            }
            KeyCode::Backspace => {
                if let Some(pattern) = &mut self.search {
                    pattern.pop();
                }
                self.refresh();
                EventResult::Consumed
            }
            _ => match self.list.handle_key(key) {
                EventResult::Event(SelectListEvent::Activated(row)) => {
                    NearbyEvent::Join(row.venue.name.to_string()).into()
                }
                _ => EventResult::Consumed,
            },
        }
    }

    fn refresh(&mut self) {
        let rows: Vec<NearbyVenue> = match &self.search {
            Some(pattern) if !pattern.is_empty() => self
                .rows
                .iter()
                .filter(|row| {
                    self.matcher
                        .matches_any([row.venue.name, row.venue.address], pattern)
                })
                .cloned()
                .collect(),
            _ => self.rows.clone(),
        };
        self.list.set_items(rows);
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border()))
            .title(format!(" {} near you ", self.category.name))
            .title_style(
                Style::default()
                    .fg(theme.highlight())
                    .add_modifier(Modifier::BOLD),
            );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [context_area, list_area, search_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(u16::from(self.search.is_some())),
        ])
        .areas(inner);

        let context = if self.approximate {
            format!(
                "Location unavailable. Showing all {} locations.",
                self.category.name.to_lowercase()
            )
        } else {
            format!("{} places, closest first.", self.rows.len())
        };
        frame.render_widget(
            Paragraph::new(Span::styled(context, Style::default().fg(theme.subtext0))),
            context_area,
        );

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "No matches.",
                    Style::default().fg(theme.subtext0),
                ))
                .alignment(Alignment::Center),
                list_area,
            );
        } else {
            self.list.render(frame, list_area, theme);
        }

        if let Some(pattern) = &self.search {
            let line = Line::from(vec![
                Span::styled("/", Style::default().fg(theme.peach)),
                Span::styled(pattern.clone(), Style::default().fg(theme.text)),
                Span::styled("█", Style::default().fg(theme.text)),
            ]);
            frame.render_widget(Paragraph::new(line), search_area);
        }
    }
}

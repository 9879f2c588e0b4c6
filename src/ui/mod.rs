//! UI building blocks for the TUI.
//!
//! Widgets here are domain-free: they render into a given area, take key
//! events, and report what happened through [`EventResult`]. Screens own
//! them and translate their events into app messages.

mod alert;
mod select_list;
mod spinner;
mod status_bar;
mod text_input;

pub use alert::{AlertDialog, AlertEvent};
use ratatui::layout::{Constraint, Flex, Layout, Rect};
pub use select_list::{ListRow, SelectList, SelectListEvent};
pub use spinner::Spinner;
pub use status_bar::{Hint, StatusBar};
pub use text_input::TextInput;

/// Result of handling an input event.
///
/// - `Ignored` - The handler didn't recognize this input
/// - `Consumed` - The input was handled but produced no event
/// - `Event(E)` - The input was handled and produced an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    /// Input was not handled, parent should process it.
    Ignored,
    /// Input was consumed but produced no event.
    Consumed,
    /// Input was consumed and produced an event.
    Event(E),
}

impl<E> EventResult<E> {
    /// Whether the input was consumed (not ignored).
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }

    /// Map the event type, leaving `Ignored` and `Consumed` untouched.
    pub fn map<F, U>(self, f: F) -> EventResult<U>
    where
        F: FnOnce(E) -> U,
    {
        match self {
            Self::Ignored => EventResult::Ignored,
            Self::Consumed => EventResult::Consumed,
            Self::Event(event) => EventResult::Event(f(event)),
        }
    }
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// Center a popup of the given width and height inside `area`.
pub fn centered(area: Rect, width: Constraint, height: Constraint) -> Rect {
    let [area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
    let [area] = Layout::vertical([height]).flex(Flex::Center).areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_keeps_non_events_untouched() {
        let ignored: EventResult<u8> = EventResult::Ignored;
        assert_eq!(ignored.map(|n| n + 1), EventResult::Ignored);

        let consumed: EventResult<u8> = EventResult::Consumed;
        assert_eq!(consumed.map(|n| n + 1), EventResult::Consumed);

        let event: EventResult<u8> = 1.into();
        assert_eq!(event.map(|n| n + 1), EventResult::Event(2));
    }

    #[test]
    fn centered_stays_inside_the_outer_area() {
        let outer = Rect::new(0, 0, 100, 40);
        let popup = centered(outer, Constraint::Percentage(60), Constraint::Length(10));

        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 10);
        assert!(popup.x >= outer.x && popup.right() <= outer.right());
        assert!(popup.y >= outer.y && popup.bottom() <= outer.bottom());
    }
}

use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{
    DialogAction, FormAction, GlobalAction, HomeAction, NavAction, SearchAction,
};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps terminal key events to configured actions.
///
/// Each action group gets a `matches_*` predicate for dispatch and a
/// `display_*` accessor for the hint line; both go through one binding
/// lookup per group.
pub struct KeyResolver {
    keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global_binding(&self, action: GlobalAction) -> &KeyBinding {
        let group = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &group.quit,
            GlobalAction::Back => &group.back,
        }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global_binding(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global_binding(action).display()
    }

    fn nav_binding(&self, action: NavAction) -> &KeyBinding {
        let group = &self.keybindings.navigation;
        match action {
            NavAction::Up => &group.up,
            NavAction::Down => &group.down,
            NavAction::Home => &group.home,
            NavAction::End => &group.end,
            NavAction::Select => &group.select,
        }
    }

    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav_binding(action).matches(event)
    }

    /// First navigation action bound to this key, if any.
    pub fn nav_action(&self, event: &KeyEvent) -> Option<NavAction> {
        [
            NavAction::Up,
            NavAction::Down,
            NavAction::Home,
            NavAction::End,
            NavAction::Select,
        ]
        .into_iter()
        .find(|&action| self.matches_nav(event, action))
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav_binding(action).display()
    }

    fn search_binding(&self, action: SearchAction) -> &KeyBinding {
        let group = &self.keybindings.search;
        match action {
            SearchAction::Toggle => &group.toggle,
            SearchAction::Exit => &group.exit,
        }
    }

    pub fn matches_search(&self, event: &KeyEvent, action: SearchAction) -> bool {
        self.search_binding(action).matches(event)
    }

    pub fn display_search(&self, action: SearchAction) -> String {
        self.search_binding(action).display()
    }

    fn home_binding(&self, action: HomeAction) -> &KeyBinding {
        let group = &self.keybindings.home;
        match action {
            HomeAction::ChooseService => &group.choose_service,
        }
    }

    pub fn matches_home(&self, event: &KeyEvent, action: HomeAction) -> bool {
        self.home_binding(action).matches(event)
    }

    pub fn display_home(&self, action: HomeAction) -> String {
        self.home_binding(action).display()
    }

    fn form_binding(&self, action: FormAction) -> &KeyBinding {
        let group = &self.keybindings.form;
        match action {
            FormAction::Submit => &group.submit,
            FormAction::Cancel => &group.cancel,
            FormAction::NextField => &group.next_field,
        }
    }

    pub fn matches_form(&self, event: &KeyEvent, action: FormAction) -> bool {
        self.form_binding(action).matches(event)
    }

    pub fn display_form(&self, action: FormAction) -> String {
        self.form_binding(action).display()
    }

    fn dialog_binding(&self, action: DialogAction) -> &KeyBinding {
        let group = &self.keybindings.dialog;
        match action {
            DialogAction::Dismiss => &group.dismiss,
            DialogAction::Copy => &group.copy,
        }
    }

    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        self.dialog_binding(action).matches(event)
    }

    pub fn display_dialog(&self, action: DialogAction) -> String {
        self.dialog_binding(action).display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn resolver() -> KeyResolver {
        KeyResolver::new(Arc::new(KeybindingsConfig::default()))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_global_bindings_resolve() {
        let resolver = resolver();
        assert!(resolver.matches_global(&key(KeyCode::Char('q')), GlobalAction::Quit));
        assert!(resolver.matches_global(&key(KeyCode::Esc), GlobalAction::Back));
        assert!(!resolver.matches_global(&key(KeyCode::Char('x')), GlobalAction::Quit));
    }

    #[test]
    fn navigation_accepts_vim_and_arrow_keys() {
        let resolver = resolver();
        assert!(resolver.matches_nav(&key(KeyCode::Char('j')), NavAction::Down));
        assert!(resolver.matches_nav(&key(KeyCode::Down), NavAction::Down));
        assert!(resolver.matches_nav(&key(KeyCode::Char('k')), NavAction::Up));
        assert!(resolver.matches_nav(&key(KeyCode::Enter), NavAction::Select));
    }

    #[test]
    fn nav_action_resolves_bound_keys_only() {
        let resolver = resolver();
        assert_eq!(
            resolver.nav_action(&key(KeyCode::Char('j'))),
            Some(NavAction::Down)
        );
        assert_eq!(resolver.nav_action(&key(KeyCode::End)), Some(NavAction::End));
        assert_eq!(resolver.nav_action(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn form_bindings_resolve() {
        let resolver = resolver();
        assert!(resolver.matches_form(&key(KeyCode::Enter), FormAction::Submit));
        assert!(resolver.matches_form(&key(KeyCode::Esc), FormAction::Cancel));
        assert!(resolver.matches_form(&key(KeyCode::Tab), FormAction::NextField));
    }

    #[test]
    fn dialog_dismiss_displays_both_alternatives() {
        let resolver = resolver();
        assert_eq!(resolver.display_dialog(DialogAction::Dismiss), "Enter/Esc");
        assert_eq!(resolver.display_dialog(DialogAction::Copy), "y");
    }
}

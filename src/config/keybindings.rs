use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

/// All bindings, grouped the way the config file groups them. A config file
/// may override one group and leave the rest at their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeybindingsConfig {
    #[serde(default)]
    pub global: GlobalKeybindings,
    #[serde(default)]
    pub navigation: NavigationKeybindings,
    #[serde(default)]
    pub search: SearchKeybindings,
    #[serde(default)]
    pub home: HomeKeybindings,
    #[serde(default)]
    pub form: FormKeybindings,
    #[serde(default)]
    pub dialog: DialogKeybindings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub back: KeyBinding,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: bind(KeyCode::Char('q')),
            back: bind(KeyCode::Esc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationKeybindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub home: KeyBinding,
    pub end: KeyBinding,
    pub select: KeyBinding,
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: either(KeyCode::Char('k'), KeyCode::Up),
            down: either(KeyCode::Char('j'), KeyCode::Down),
            home: either(KeyCode::Char('g'), KeyCode::Home),
            end: either(KeyCode::Char('G'), KeyCode::End),
            select: bind(KeyCode::Enter),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchKeybindings {
    pub toggle: KeyBinding,
    pub exit: KeyBinding,
}

impl Default for SearchKeybindings {
    fn default() -> Self {
        Self {
            toggle: bind(KeyCode::Char('/')),
            exit: bind(KeyCode::Esc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeKeybindings {
    pub choose_service: KeyBinding,
}

impl Default for HomeKeybindings {
    fn default() -> Self {
        Self {
            choose_service: bind(KeyCode::Char('s')),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormKeybindings {
    pub submit: KeyBinding,
    pub cancel: KeyBinding,
    pub next_field: KeyBinding,
}

impl Default for FormKeybindings {
    fn default() -> Self {
        Self {
            submit: bind(KeyCode::Enter),
            cancel: bind(KeyCode::Esc),
            next_field: bind(KeyCode::Tab),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogKeybindings {
    pub dismiss: KeyBinding,
    pub copy: KeyBinding,
}

impl Default for DialogKeybindings {
    fn default() -> Self {
        Self {
            dismiss: either(KeyCode::Enter, KeyCode::Esc),
            copy: bind(KeyCode::Char('y')),
        }
    }
}

fn bind(code: KeyCode) -> KeyBinding {
    Key::new(code).into()
}

fn either(first: KeyCode, second: KeyCode) -> KeyBinding {
    KeyBinding::multiple(vec![Key::new(first), Key::new(second)])
}

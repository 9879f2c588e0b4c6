pub mod actions;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::time::Duration;

pub use actions::*;
pub use keybindings::KeybindingsConfig;
pub use loader::load;
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

use crate::location::FixRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

/// Settings for the device-location capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Turn off to run without any location lookup.
    pub enabled: bool,
    /// Ask providers for their most precise answer.
    pub high_accuracy: bool,
    /// Upper bound on a single fix request.
    pub timeout_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            high_accuracy: true,
            timeout_secs: 10,
        }
    }
}

impl LocationConfig {
    pub const fn fix_request(&self) -> FixRequest {
        FixRequest {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

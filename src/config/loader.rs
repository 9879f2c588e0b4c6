use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "zerowait";
const CONFIG_FILE: &str = "config.toml";

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|path| path.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the config file, falling back to defaults when it does not exist.
/// A malformed file is an error.
pub fn load() -> color_eyre::Result<AppConfig> {
    let Some(path) = config_path() else {
        debug!("no config directory on this system, using defaults");
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(&path)?;
    let config = toml::from_str::<AppConfig>(&raw)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

//! Session storage.
//!
//! The intake flow leaves two traces between screens: the chosen service
//! category and the last location fix. Both live in a small JSON file under
//! the platform data directory so a later run starts where the previous one
//! left off. Every write replaces the whole value for its key.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::Result;
use color_eyre::eyre::eyre;
use tracing::debug;

/// Key holding the selected service category id.
pub const SERVICE_TYPE_KEY: &str = "serviceType";

/// Key holding the last location fix as `{"lat":..,"lng":..}`.
pub const USER_LOCATION_KEY: &str = "userLocation";

const SESSION_FILE: &str = "session.json";

/// String key-value storage with overwrite semantics.
pub trait SessionStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;
}

/// [`SessionStore`] backed by a JSON file.
///
/// A missing or unreadable file is treated as an empty session; writes
/// rewrite the file in full.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the session file in the platform data directory, creating the
    /// directory when needed.
    pub fn open_default() -> Result<Self> {
        let directory = dirs::data_dir()
            .ok_or_else(|| eyre!("Could not determine the user data directory"))?
            .join("zerowait");
        fs::create_dir_all(&directory)?;
        Ok(Self::open(directory.join(SESSION_FILE)))
    }

    /// Open the session file at `path`.
    pub fn open(path: PathBuf) -> Self {
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_else(|| {
                debug!(path = %path.display(), "starting with an empty session");
                BTreeMap::new()
            });

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let data = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("session store lock poisoned");
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().expect("session store lock poisoned");
        Ok(entries.get(key).cloned())
    }
}

/// In-memory store for tests, with an optional failure mode.
#[cfg(test)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    fail_puts: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            fail_puts: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_puts: true,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("memory store lock").len()
    }
}

#[cfg(test)]
impl SessionStore for MemoryStore {
    fn put(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_puts {
            return Err(eyre!("store unavailable"));
        }
        let mut entries = self.entries.lock().expect("memory store lock");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().expect("memory store lock");
        Ok(entries.get(key).cloned())
    }
}

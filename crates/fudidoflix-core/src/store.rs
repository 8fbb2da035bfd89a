use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Storage keys, kept identical to the browser build so data maps one-to-one.
pub mod keys {
    pub const WATCHED_HISTORY: &str = "fudidoFlixWatchedHistory";
    pub const CONTINUE_WATCHING: &str = "fudidoFlixContinueWatching";
    pub const MY_LIST: &str = "fudidoFlixMyList";
    pub const WATCHED_EPISODES: &str = "fudidoFlixWatchedEpisodes";
    pub const NOTIFICATIONS: &str = "fudidoFlixNotifications";
    pub const LAST_CHECK: &str = "fudidoFlixLastCheck";
    pub const ROULETTE: &str = "fudidoFlixRoleta";
    pub const PLAYER_SESSION: &str = "fudidoFlixPlayerSession";
}

/// Current list envelope version. Version 0 is the bare JSON array.
pub const SCHEMA_VERSION: u64 = 1;

/// String key/value persistence.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value)?;
        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-process store; also stands in for session storage.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Read a versioned list. Missing, malformed or unknown-version blobs come
/// back empty; items that fail to decode are dropped one by one.
pub fn read_list<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored list");
            return Vec::new();
        }
    };

    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Stored list is not valid JSON, treating as empty");
            return Vec::new();
        }
    };

    let items = match value {
        Value::Array(items) => {
            debug!(key, count = items.len(), "Migrating version 0 list");
            items
        }
        Value::Object(mut envelope) => {
            let version = envelope.get("version").and_then(Value::as_u64);
            match (version, envelope.remove("items")) {
                (Some(SCHEMA_VERSION), Some(Value::Array(items))) => items,
                (version, _) => {
                    warn!(key, ?version, "Unsupported stored list envelope, treating as empty");
                    return Vec::new();
                }
            }
        }
        Value::Null => return Vec::new(),
        _ => {
            warn!(key, "Stored value is not a list, treating as empty");
            return Vec::new();
        }
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(key, error = %e, "Skipping unreadable stored item");
                None
            }
        })
        .collect();

    if decoded.len() < total {
        debug!(key, kept = decoded.len(), total, "Dropped invalid stored items");
    }
    decoded
}

/// Write `items` under the current envelope version. Failures are logged.
pub fn write_list<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) {
    let envelope = serde_json::json!({
        "version": SCHEMA_VERSION,
        "items": items,
    });
    match serde_json::to_string(&envelope) {
        Ok(content) => {
            if let Err(e) = store.set(key, &content) {
                warn!(key, error = %e, "Failed to write stored list");
            }
        }
        Err(e) => warn!(key, error = %e, "Failed to encode list"),
    }
}

/// Remove `key`, logging failures.
pub fn remove_key(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key) {
        warn!(key, error = %e, "Failed to remove stored key");
    }
}

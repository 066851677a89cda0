//! Key-value storage used by the usage tracker.
//!
//! The tracker only needs `get` and `put` with a time-to-live. Any error
//! returned from a store is treated by callers as "store unavailable".

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Minimal key-value capability with per-entry expiry.
pub trait KvStore: Send + Sync {
    /// Reads a value. Expired or missing keys return `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Writes a value that expires after `ttl`, replacing any previous value.
    fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    value: Value,
    expires_at: DateTime<Utc>,
}

impl StoredEntry {
    fn new(value: Value, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Utc::now() + ttl,
        }
    }

    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, StoredEntry>>,
}

impl MemoryKvStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|e| e.is_live(now)).count())
            .unwrap_or(0)
    }

    /// Whether the store has no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Usage store lock poisoned"))?;

        match entries.get(key) {
            Some(entry) if entry.is_live(Utc::now()) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Usage store lock poisoned"))?;

        let now = Utc::now();
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(key.to_string(), StoredEntry::new(value, ttl));
        Ok(())
    }
}

/// Store persisted as a single JSON file.
///
/// Every write rewrites the file through a temp file + rename so the file is
/// never left half written. Expired entries are dropped whenever the file is
/// rewritten.
#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    // Serializes read-modify-write within this process only.
    lock: Mutex<()>,
}

impl FileKvStore {
    /// Creates a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, StoredEntry>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&self.path).context(format!(
            "Failed to read usage store: {}",
            self.path.display()
        ))?;

        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content).context(format!(
            "Failed to parse usage store: {}",
            self.path.display()
        ))
    }

    fn save(&self, entries: &HashMap<String, StoredEntry>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context(format!(
                    "Failed to create usage store directory: {}",
                    parent.display()
                ))?;
            }
        }

        let content =
            serde_json::to_string_pretty(entries).context("Failed to serialize usage store")?;
        let temp_path = self.path.with_extension("json.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp usage store: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, &self.path).context(format!(
            "Failed to rename temp usage store to: {}",
            self.path.display()
        ))?;

        Ok(())
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Usage store lock poisoned"))?;

        let entries = self.load()?;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(Utc::now()))
            .map(|entry| entry.value.clone()))
    }

    fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Usage store lock poisoned"))?;

        let now = Utc::now();
        let mut entries = self.load()?;
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(key.to_string(), StoredEntry::new(value, ttl));
        self.save(&entries)
    }
}

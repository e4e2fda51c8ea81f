// Cache store for reading and writing cached gist lists.
// Defines the store trait, entry metadata, and the filesystem backend.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::github::GistSummary;

use super::clock::{Clock, SystemClock};
use super::paths;

/// TTL for a successful listing: 24 hours.
pub const SUCCESS_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// TTL for a failure marker: 1 hour.
pub const FAILURE_TTL: Duration = Duration::from_secs(60 * 60);

/// Value held under a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "gists", rename_all = "snake_case")]
pub enum CachedGists {
    Gists(Vec<GistSummary>),
    /// The last fetch failed or returned nothing.
    Failed,
}

/// Wrapper for a cached value with expiry metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: CachedGists,
    /// When the value was cached.
    pub cached_at: DateTime<Utc>,
    /// When the value stops being served.
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(value: CachedGists, now: DateTime<Utc>, ttl: Duration) -> Self {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        Self {
            value,
            cached_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Key-value store with per-entry TTL.
///
/// Expired entries read as absent. Writes replace whatever was stored under
/// the key.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<CachedGists>>;

    fn set(&self, key: &str, value: &CachedGists, ttl: Duration) -> Result<()>;

    fn delete(&self, key: &str) -> Result<()>;
}

/// Store that keeps one JSON file per key under a root directory.
pub struct FileStore {
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_clock(root, Arc::new(SystemClock))
    }

    pub fn with_clock(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        paths::entry_path(&self.root, key)
    }
}

impl CacheStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<CachedGists>> {
        let path = self.path_for(key);
        match read_entry(&path)? {
            Some(entry) if entry.is_expired(self.clock.now()) => {
                delete(&path)?;
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &CachedGists, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(value.clone(), self.clock.now(), ttl);
        write_entry(&self.path_for(key), &entry)
    }

    fn delete(&self, key: &str) -> Result<()> {
        delete(&self.path_for(key))
    }
}

/// Read a cache entry from a file.
pub fn read_entry(path: &Path) -> Result<Option<CacheEntry>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let entry: CacheEntry = serde_json::from_str(&contents)?;
    Ok(Some(entry))
}

/// Write a cache entry as JSON.
pub fn write_entry(path: &Path, entry: &CacheEntry) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(entry)?;

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Delete a cached file.
pub fn delete(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

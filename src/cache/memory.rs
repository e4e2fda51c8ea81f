// In-process cache store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{GistError, Result};

use super::clock::{Clock, SystemClock};
use super::store::{CacheEntry, CacheStore, CachedGists};

/// Map-backed store. Entries live as long as the process does.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of entries held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<CachedGists>> {
        let entries = self.entries.lock().map_err(|_| GistError::LockPoisoned)?;
        let now = self.clock.now();
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: &CachedGists, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(value.clone(), self.clock.now(), ttl);
        self.entries
            .lock()
            .map_err(|_| GistError::LockPoisoned)?
            .insert(key.to_string(), entry);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| GistError::LockPoisoned)?
            .remove(key);
        Ok(())
    }
}

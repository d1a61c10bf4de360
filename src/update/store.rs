//! Expiring key-value store abstraction

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

#[cfg(test)]
use mockall::automock;

use crate::update::error::StoreError;

/// Trait for the host's expiring key-value storage
///
/// Values are opaque strings; expired entries must read as absent.
#[cfg_attr(test, automock)]
pub trait Store: Send + Sync {
    /// Get a value by key, or `None` when absent or expired
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Set a value that expires after `ttl`, replacing any existing value
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Remove a value by key
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Expiry used when `now + ttl` does not fit in an `Instant` (~100 years)
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// In-memory store
///
/// Useful for testing or for hosts that keep state for a single process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
            match entries.get(key) {
                Some((value, expires_at)) if *expires_at > now => return Ok(Some(value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: evict lazily
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        if entries
            .get(key)
            .is_some_and(|(_, expires_at)| *expires_at <= now)
        {
            entries.remove(key);
        }
        Ok(None)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        self.entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn get_returns_value_before_expiry() {
        let store = MemoryStore::new();
        store.set("k", "v", HOUR).unwrap();

        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let store = MemoryStore::new();

        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn get_returns_none_after_expiry_and_evicts_entry() {
        let store = MemoryStore::new();
        store.set("k", "v", Duration::ZERO).unwrap();

        assert_eq!(store.get("k").unwrap(), None);
        assert!(store.entries.read().unwrap().is_empty());
    }

    #[test]
    fn set_overwrites_existing_value() {
        let store = MemoryStore::new();
        store.set("k", "old", HOUR).unwrap();
        store.set("k", "new", HOUR).unwrap();

        assert_eq!(store.get("k").unwrap(), Some("new".to_string()));
    }

    #[test]
    fn delete_removes_value() {
        let store = MemoryStore::new();
        store.set("k", "v", HOUR).unwrap();
        store.delete("k").unwrap();

        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn delete_of_missing_key_is_ok() {
        let store = MemoryStore::new();

        assert!(store.delete("missing").is_ok());
    }

    #[test]
    fn set_with_unbounded_ttl_saturates() {
        let store = MemoryStore::new();
        store.set("k", "v", Duration::MAX).unwrap();

        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
    }
}

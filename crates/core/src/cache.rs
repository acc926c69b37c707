//! Best-effort cache for profile records (providers and customers).
//!
//! Values are stored as JSON. Readers treat every failure as a miss and
//! fall back to the store; writers log and move on.
//!
//! Readers fill the cache with [`Cache::add`], which never replaces a live
//! entry, while profile writers overwrite with [`Cache::set`]. A reader that
//! fetched a record before an update therefore cannot put the old version
//! back over the new one.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use eyre::Result;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Stores `value` only when `key` has no live entry. Returns whether it
    /// was stored.
    async fn add(&self, key: &str, value: String) -> Result<bool>;

    async fn delete(&self, key: &str);
}

pub fn user_key(id: i64) -> String {
    format!("user-{id}")
}

pub fn customer_key(id: i64) -> String {
    format!("customer-{id}")
}

pub async fn get_json<T: DeserializeOwned>(cache: &dyn Cache, key: &str) -> Option<T> {
    let raw = match cache.get(key).await {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(key, error = %e, "cache read failed");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "dropping undecodable cache entry");
            cache.delete(key).await;
            None
        }
    }
}

fn encode<T: Serialize>(key: &str, value: &T) -> Option<String> {
    serde_json::to_string(value)
        .map_err(|e| warn!(key, error = %e, "failed to encode cache entry"))
        .ok()
}

/// Overwrites `key` with `value`. Returns `false` when the write failed.
pub async fn set_json<T: Serialize>(cache: &dyn Cache, key: &str, value: &T) -> bool {
    let Some(encoded) = encode(key, value) else {
        return false;
    };

    match cache.set(key, encoded).await {
        Ok(()) => true,
        Err(e) => {
            warn!(key, error = %e, "cache write failed");
            false
        }
    }
}

/// Fills `key` with `value` unless a live entry is already there.
pub async fn add_json<T: Serialize>(cache: &dyn Cache, key: &str, value: &T) {
    let Some(encoded) = encode(key, value) else {
        return;
    };

    if let Err(e) = cache.add(key, encoded).await {
        warn!(key, error = %e, "cache fill failed");
    }
}

/// Process-local cache with a fixed time-to-live per entry.
pub struct InMemoryCache {
    entries: DashMap<String, (String, Instant)>,
    ttl: Duration,
}

impl InMemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every expired entry, including ones nobody reads again.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, (_, expires)| *expires > now);
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if let Some(entry) = self.entries.get(key) {
            if entry.1 > Instant::now() {
                return Ok(Some(entry.0.clone()));
            }
        }
        // Only an entry that is still expired goes; a fresh `set` survives.
        self.entries
            .remove_if(key, |_, (_, expires)| *expires <= Instant::now());
        Ok(None)
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), (value, Instant::now() + self.ttl));
        Ok(())
    }

    async fn add(&self, key: &str, value: String) -> Result<bool> {
        let now = Instant::now();
        let stored = match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut entry) if entry.get().1 <= now => {
                entry.insert((value, now + self.ttl));
                true
            }
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert((value, now + self.ttl));
                true
            }
        };
        Ok(stored)
    }

    async fn delete(&self, key: &str) {
        self.entries.remove(key);
    }
}

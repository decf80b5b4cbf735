//! In-memory response caching
//!
//! Memoizes fetched data per request key with a freshness window, so that
//! repeated analyses within the window do not hit the exchange again.
//! The cache is owned by whoever injects it; nothing here is global.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::core::GexResult;

/// Cache configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum age before refresh (in seconds)
    pub ttl_secs: i64,
    /// Whether to use cache
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60,
            enabled: true,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_secs.max(0))
    }
}

struct Entry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// Key-value cache with stored-timestamp expiry
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key` if it is younger than `ttl`,
    /// otherwise compute, store and return a fresh one
    ///
    /// Errors from `compute` are returned as-is and nothing is stored.
    pub fn get_or_compute<F>(&self, key: K, ttl: Duration, compute: F) -> GexResult<V>
    where
        F: FnOnce() -> GexResult<V>,
    {
        self.get_or_compute_at(key, ttl, Utc::now(), compute)
    }

    /// [`get_or_compute`](Self::get_or_compute) against an explicit clock
    pub fn get_or_compute_at<F>(&self, key: K, ttl: Duration, now: DateTime<Utc>, compute: F) -> GexResult<V>
    where
        F: FnOnce() -> GexResult<V>,
    {
        if let Some(value) = self.get_fresh(&key, ttl, now) {
            return Ok(value);
        }

        // The lock is not held while computing; a concurrent miss may compute twice
        let value = compute()?;
        self.insert_at(key, value.clone(), now);
        Ok(value)
    }

    fn get_fresh(&self, key: &K, ttl: Duration, now: DateTime<Utc>) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if now - entry.stored_at < ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert_at(&self, key: K, value: V, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, Entry { value, stored_at: now });
    }

    pub fn invalidate(&self, key: &K) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

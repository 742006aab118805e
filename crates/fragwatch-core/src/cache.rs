//! Keyed time-to-live cache backing both fetch paths.
//!
//! One entry per key; `set` always overwrites with a fresh timestamp and
//! entries are never mutated in place. Freshness is a pure function of
//! elapsed time — never of access count — so an expired entry behaves
//! exactly as if the key were absent.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

struct CacheEntry<T> {
    data: T,
    fetched_at: DateTime<Utc>,
}

/// Snapshot of cache occupancy for observability.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
    pub oldest_fetched_at: Option<DateTime<Utc>>,
}

/// In-memory TTL cache. The TTL is fixed at construction; each data source
/// owns its own instance with its own duration.
///
/// All access goes through the methods here — the backing map is not
/// reachable from outside, which is what keeps the TTL contract uniform
/// across callers.
pub struct TtlCache<T> {
    ttl: TimeDelta,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached data for `key` only while the entry is fresh.
    /// An expired or missing entry returns `None`; the caller must refetch.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    /// Stores `data` under `key`, overwriting any prior entry and restarting
    /// its TTL. There is no partial update.
    pub fn set(&self, key: &str, data: T) {
        self.set_at(key, data, Utc::now());
    }

    /// True iff `key` holds an entry whose age is still below the TTL.
    #[must_use]
    pub fn is_valid(&self, key: &str) -> bool {
        self.is_valid_at(key, Utc::now())
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: entries.len(),
            keys,
            oldest_fetched_at: entries.values().map(|e| e.fetched_at).min(),
        }
    }

    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let entries = self.lock();
        let entry = entries.get(key)?;
        if self.is_fresh(entry, now) {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    fn set_at(&self, key: &str, data: T, now: DateTime<Utc>) {
        self.lock().insert(
            key.to_owned(),
            CacheEntry {
                data,
                fetched_at: now,
            },
        );
    }

    fn is_valid_at(&self, key: &str, now: DateTime<Utc>) -> bool {
        let entries = self.lock();
        entries.get(key).is_some_and(|e| self.is_fresh(e, now))
    }

    fn is_fresh(&self, entry: &CacheEntry<T>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.fetched_at) < self.ttl
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        // A panic while holding the lock leaves plain cache data behind, not
        // a broken invariant; recover rather than poisoning every caller.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

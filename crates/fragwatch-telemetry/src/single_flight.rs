//! Per-key serialization of cache-miss fetches.
//!
//! Two concurrent misses for the same key must not trigger two independent
//! upstream fetches (one browser render or one HTTP request each). The
//! first caller through the keyed lock performs the fetch; everyone queued
//! behind it re-checks the cache after acquiring and finds it warm.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};

pub(crate) struct KeyedLock {
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLock {
    pub(crate) fn new() -> Self {
        Self {
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Acquires the lock for `key`, creating it on first use.
    ///
    /// The guard owns its mutex, so the registry lock is held only for the
    /// map lookup, never across the await.
    pub(crate) async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Sweep per-key mutexes nobody holds; a held mutex has a guard
            // or a waiter keeping its count above the map's own reference.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(
                locks
                    .entry(key.to_owned())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn same_key_is_mutually_exclusive() {
        let lock = Arc::new(KeyedLock::new());
        let in_flight = Arc::new(AtomicU32::new(0));
        let peak = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let lock = Arc::clone(&lock);
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            handles.push(tokio::spawn(async move {
                let _guard = lock.acquire("region").await;
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_keys_do_not_block_each_other() {
        let lock = KeyedLock::new();
        let first = lock.acquire("stats:1.2.3.4:27960").await;
        // Would deadlock if keys shared one mutex.
        let second = lock.acquire("stats:5.6.7.8:27960").await;
        drop(first);
        drop(second);
    }

    #[tokio::test]
    async fn released_keys_are_swept() {
        let lock = KeyedLock::new();
        drop(lock.acquire("a").await);
        drop(lock.acquire("b").await);
        // Acquiring a third key sweeps the two idle entries.
        let _guard = lock.acquire("c").await;
        let locks = lock.locks.lock().unwrap();
        assert_eq!(locks.len(), 1);
        assert!(locks.contains_key("c"));
    }
}

//! Time-based result cache keyed by query.
//!
//! Entries go stale after a fixed freshness window and are never refreshed in
//! the background; the next lookup after expiry simply misses. Concurrent
//! fetches for the same key are not coalesced. Each fetch takes a ticket
//! before it starts, and a result is only stored when no fetch with a newer
//! ticket has stored first, so the most recently issued request wins.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

struct CacheEntry<V> {
    value: V,
    ticket: u64,
    stored_at: Instant,
}

/// Cache owned by the caller, parameterized by key type and freshness window.
pub struct QueryCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    next_ticket: AtomicU64,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            next_ticket: AtomicU64::new(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a ticket for a fetch about to start. Tickets increase
    /// monotonically across all keys.
    pub fn ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::Relaxed)
    }

    /// A fresh value for `key`, if one exists.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        (entry.stored_at.elapsed() < self.ttl).then(|| entry.value.clone())
    }

    /// Store the result of the fetch holding `ticket`.
    ///
    /// Returns `false` (and keeps the existing entry) when a fetch issued
    /// later has already stored its result for this key.
    pub async fn store(&self, key: K, ticket: u64, value: V) -> bool {
        let mut entries = self.entries.write().await;
        if entries.get(&key).is_some_and(|existing| existing.ticket > ticket) {
            return false;
        }
        entries.insert(
            key,
            CacheEntry {
                value,
                ticket,
                stored_at: Instant::now(),
            },
        );
        true
    }

    /// Drop the entry for `key`.
    pub async fn invalidate(&self, key: &K) {
        self.entries.write().await.remove(key);
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of entries, fresh or stale.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

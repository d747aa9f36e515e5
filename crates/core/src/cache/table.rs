//! The shared sanitized-content table.

use super::key::CacheKey;
use chrono::{DateTime, TimeZone, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// One sanitized result, replaced wholesale on every fresh fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub sanitized_content: String,
    pub cached_at_millis: i64,
}

impl CacheEntry {
    /// Age of the entry at `now_millis`; clock skew backwards counts as zero.
    pub fn age(&self, now_millis: i64) -> Duration {
        let elapsed = now_millis.saturating_sub(self.cached_at_millis).max(0);
        Duration::from_millis(elapsed as u64)
    }

    pub fn is_fresh(&self, max_age: Duration, now_millis: i64) -> bool {
        self.age(now_millis) < max_age
    }

    pub fn cached_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.cached_at_millis).single().unwrap_or_default()
    }
}

/// Listing row for an entry, as reported by the cache tools.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CacheEntryInfo {
    pub hash: String,
    pub key: CacheKey,
    pub cached_at: String,
    pub bytes: usize,
    pub fresh: bool,
}

/// In-memory table of sanitized content keyed by [`CacheKey`].
///
/// Writes are single-key replaces; two loads racing on the same key both
/// write and the later one wins. Expiry is checked on lookup only.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry that is younger than `max_age` at `now_millis`.
    ///
    /// Stale entries are left in place and overwritten by the next store.
    pub fn get_fresh(&self, key: &CacheKey, max_age: Duration, now_millis: i64) -> Option<CacheEntry> {
        let entry = self.entries.get(key)?;
        if entry.is_fresh(max_age, now_millis) {
            tracing::debug!(%key, "content cache hit");
            Some(entry.value().clone())
        } else {
            tracing::debug!(%key, age_ms = entry.age(now_millis).as_millis() as u64, "content cache entry stale");
            None
        }
    }

    /// Store content stamped with the current time.
    pub fn insert(&self, key: CacheKey, sanitized_content: String) {
        self.insert_at(key, sanitized_content, now_millis());
    }

    pub fn insert_at(&self, key: CacheKey, sanitized_content: String, cached_at_millis: i64) {
        tracing::debug!(%key, bytes = sanitized_content.len(), "content cache store");
        self.entries.insert(key, CacheEntry { sanitized_content, cached_at_millis });
    }

    pub fn remove(&self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by its key digest.
    pub fn find_by_hash(&self, hash: &str) -> Option<(CacheKey, CacheEntry)> {
        self.entries
            .iter()
            .find(|item| item.key().digest() == hash)
            .map(|item| (item.key().clone(), item.value().clone()))
    }

    /// Snapshot of all entries, newest first.
    pub fn entries(&self, max_age: Duration, now_millis: i64) -> Vec<CacheEntryInfo> {
        let mut rows: Vec<(i64, CacheEntryInfo)> = self
            .entries
            .iter()
            .map(|item| {
                let entry = item.value();
                let info = CacheEntryInfo {
                    hash: item.key().digest(),
                    key: item.key().clone(),
                    cached_at: entry.cached_at().to_rfc3339(),
                    bytes: entry.sanitized_content.len(),
                    fresh: entry.is_fresh(max_age, now_millis),
                };
                (entry.cached_at_millis, info)
            })
            .collect();
        rows.sort_by(|a, b| b.0.cmp(&a.0));
        rows.into_iter().map(|(_, info)| info).collect()
    }

    /// Drop every entry older than `max_age`.
    ///
    /// Returns the number of removed entries.
    pub fn purge_expired(&self, max_age: Duration, now_millis: i64) -> u64 {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(max_age, now_millis));
        (before.saturating_sub(self.entries.len())) as u64
    }

    /// Drop every entry. Returns the number of removed entries.
    pub fn clear(&self) -> u64 {
        let before = self.entries.len();
        self.entries.clear();
        before as u64
    }
}

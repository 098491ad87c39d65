//! Bounded freshness cache of crawl results.
//!
//! Keyed by (normalized URL, time bucket, plan). Only the crawl output (snapshot and
//! aux data) is stored; rules are re-run on a hit so a report always reflects the
//! current rule set.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::model::{AuxData, PageSnapshot, Plan};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub url: String,
    /// Unix seconds divided by the window width
    pub bucket: u64,
    pub plan: Plan,
}

/// Output of stages 1-4 for one URL.
#[derive(Debug, Clone)]
pub struct CachedCrawl {
    pub snapshot: Arc<PageSnapshot>,
    pub aux: Arc<AuxData>,
}

#[derive(Debug)]
struct Entry {
    crawl: CachedCrawl,
    last_access: AtomicU64,
}

/// Concurrent-read, last-writer-wins cache with bucket rollover and LRU eviction.
#[derive(Debug)]
pub struct ReportCache {
    window_secs: u64,
    capacity: usize,
    entries: RwLock<HashMap<CacheKey, Entry>>,
    tick: AtomicU64,
}

impl ReportCache {
    pub fn new(window: Duration, capacity: usize) -> Self {
        Self {
            window_secs: window.as_secs().max(1),
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
            tick: AtomicU64::new(0),
        }
    }

    /// Builds the key for `url` at time `now`.
    pub fn key(&self, url: &str, plan: Plan, now: DateTime<Utc>) -> CacheKey {
        let secs = u64::try_from(now.timestamp()).unwrap_or(0);
        CacheKey {
            url: url.to_string(),
            bucket: secs / self.window_secs,
            plan,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<CachedCrawl> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;
        entry
            .last_access
            .store(self.tick.fetch_add(1, Ordering::Relaxed), Ordering::Relaxed);
        Some(entry.crawl.clone())
    }

    /// Stores `crawl` under `key`, replacing any previous value.
    ///
    /// Entries from older buckets are dropped first; if the cache is still full the
    /// least recently used entry is evicted.
    pub fn insert(&self, key: CacheKey, crawl: CachedCrawl) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        let before = entries.len();
        entries.retain(|k, _| k.bucket >= key.bucket);
        let purged = before - entries.len();
        if purged > 0 {
            log::debug!("Purged {} stale cache entries", purged);
        }

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_access.load(Ordering::Relaxed))
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                log::debug!("Evicting cached crawl of {}", oldest.url);
                entries.remove(&oldest);
            }
        }

        let entry = Entry {
            crawl,
            last_access: AtomicU64::new(self.tick.fetch_add(1, Ordering::Relaxed)),
        };
        entries.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

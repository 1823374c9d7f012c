use std::num::NonZeroUsize;
use std::sync::Mutex;

use log::debug;
use lru::LruCache;

use crate::services::resolver::models::types::{CacheEntry, CacheKey};

/// Default number of remembered resolutions.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Bounded memo of past resolutions, keyed by (system, raw title, filter).
///
/// Both successes and "no match" outcomes are stored so repeated misses skip
/// the full strategy chain. Safe to share across threads; a poisoned lock is
/// recovered since entries are plain values.
pub struct ResultCache {
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
}

impl ResultCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let hit = entries.get(key).cloned();
        if hit.is_some() {
            debug!("[ResultCache] Hit for {}/{}", key.system_id, key.title);
        }
        hit
    }

    pub fn put(&self, key: CacheKey, entry: CacheEntry) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.put(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
#[path = "tests/result_cache_tests.rs"]
mod tests;

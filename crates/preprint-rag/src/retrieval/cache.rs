//! Cache of built knowledge bases keyed by document content
//!
//! Building an index means embedding every segment of a document, so
//! repeated questions about the same PDF reuse the index instead.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

use super::index::VectorIndex;

/// A built index with bookkeeping for eviction
#[derive(Debug, Clone)]
struct CachedIndex {
    index: Arc<VectorIndex>,
    cached_at: DateTime<Utc>,
    /// Logical clock value of the last access
    last_used: u64,
    hit_count: u32,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CachedIndex>,
    clock: u64,
    hits: u64,
    misses: u64,
}

/// Least-recently-used cache of knowledge bases
///
/// The lock is only held for map operations, never while an index is built.
pub struct KnowledgeBaseCache {
    state: Mutex<CacheState>,
    max_entries: usize,
}

impl KnowledgeBaseCache {
    /// Create a cache holding at most `max_entries` indexes (0 disables it)
    pub fn new(max_entries: usize) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            max_entries,
        }
    }

    /// Cache key for a document's text
    pub fn content_key(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn is_enabled(&self) -> bool {
        self.max_entries > 0
    }

    /// Look up an index, marking it most recently used
    pub fn get(&self, key: &str) -> Option<Arc<VectorIndex>> {
        let mut state = self.state.lock();
        state.clock += 1;
        let now = state.clock;

        match state.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = now;
                entry.hit_count += 1;
                let index = Arc::clone(&entry.index);
                tracing::debug!(
                    "Knowledge base cache hit: {} (hits: {})",
                    short_key(key),
                    entry.hit_count
                );
                state.hits += 1;
                Some(index)
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    /// Store an index, evicting the least recently used entry when full
    pub fn insert(&self, key: String, index: Arc<VectorIndex>) {
        if !self.is_enabled() {
            return;
        }

        let mut state = self.state.lock();
        state.clock += 1;
        let now = state.clock;

        if !state.entries.contains_key(&key) && state.entries.len() >= self.max_entries {
            if let Some(oldest_key) = state
                .entries
                .iter()
                .min_by_key(|(_, v)| v.last_used)
                .map(|(k, _)| k.clone())
            {
                state.entries.remove(&oldest_key);
                tracing::debug!("Evicted knowledge base {}", short_key(&oldest_key));
            }
        }

        state.entries.insert(
            key,
            CachedIndex {
                index,
                cached_at: Utc::now(),
                last_used: now,
                hit_count: 0,
            },
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached index
    pub fn clear(&self) {
        self.state.lock().entries.clear();
        tracing::info!("Knowledge base cache cleared");
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            entries: state.entries.len(),
            max_entries: self.max_entries,
            hits: state.hits,
            misses: state.misses,
            oldest_cached_at: state.entries.values().map(|e| e.cached_at).min(),
        }
    }
}

fn short_key(key: &str) -> &str {
    key.get(..12).unwrap_or(key)
}

impl Default for KnowledgeBaseCache {
    fn default() -> Self {
        Self::new(32)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub oldest_cached_at: Option<DateTime<Utc>>,
}

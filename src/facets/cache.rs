//! TTL-bounded LRU cache for facet existence checks.
//!
//! Route dispatch asks "is `seo` a skill?" on every request; the answer
//! changes rarely, so it is cached for a configurable time-to-live
//! (one hour by default). Entries age out on their own; `clear` drops
//! everything after a bulk load.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

use super::FacetKind;

/// Default number of `(kind, slug)` answers kept.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Default time-to-live for an existence answer.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy)]
struct CachedExistence {
    exists: bool,
    cached_at: Instant,
}

/// Cache statistics for monitoring and tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExistenceCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
}

impl ExistenceCacheStats {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct Inner {
    entries: LruCache<(FacetKind, String), CachedExistence>,
    stats: ExistenceCacheStats,
}

/// Thread-safe existence cache shared by concurrent resolvers.
pub struct ExistenceCache {
    inner: Mutex<Inner>,
    ttl: Duration,
}

impl Default for ExistenceCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

impl std::fmt::Debug for ExistenceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExistenceCache")
            .field("ttl", &self.ttl)
            .field("len", &self.len())
            .finish()
    }
}

impl ExistenceCache {
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                stats: ExistenceCacheStats::default(),
            }),
            ttl,
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached answer for `(kind, slug)`, if present and fresh.
    pub fn get(&self, kind: FacetKind, slug: &str) -> Option<bool> {
        self.get_at(kind, slug, Instant::now())
    }

    fn get_at(&self, kind: FacetKind, slug: &str, now: Instant) -> Option<bool> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let key = (kind, slug.to_string());
        let Some(entry) = inner.entries.get(&key).copied() else {
            inner.stats.misses += 1;
            return None;
        };
        if now.saturating_duration_since(entry.cached_at) < self.ttl {
            inner.stats.hits += 1;
            return Some(entry.exists);
        }
        inner.entries.pop(&key);
        inner.stats.expired += 1;
        inner.stats.misses += 1;
        None
    }

    pub fn put(&self, kind: FacetKind, slug: &str, exists: bool) {
        self.put_at(kind, slug, exists, Instant::now());
    }

    fn put_at(&self, kind: FacetKind, slug: &str, exists: bool, now: Instant) {
        self.inner.lock().entries.put(
            (kind, slug.to_string()),
            CachedExistence {
                exists,
                cached_at: now,
            },
        );
    }

    #[must_use]
    pub fn stats(&self) -> ExistenceCacheStats {
        self.inner.lock().stats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }
}

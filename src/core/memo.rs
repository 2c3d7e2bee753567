//! Memoized derived values keyed by snapshot identity.
//!
//! Queries such as "size of the biggest completed city" walk the whole
//! feature graph. The scoring pipeline asks them several times per turn, on
//! the same snapshot, from different capabilities. A [`Memoized`] caches the
//! answer per [`StateVersion`]:
//!
//! - the same snapshot (or a clone of it) hits the cache
//! - a derived snapshot has a fresh version and recomputes, even when it is
//!   structurally equal to a cached one
//!
//! The cache is bounded by an LRU capacity: a hit marks the entry as most
//! recently used. The compute step runs outside the lock, so a racing
//! recomputation just overwrites the entry with an identical value.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::RwLock;
use tracing::trace;

use super::state::{GameState, StateVersion};

/// Default number of snapshots a memo remembers.
pub const DEFAULT_MEMO_CAPACITY: usize = 64;

/// Cache hit/miss counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

/// A pure function of a [`GameState`], cached per snapshot.
pub struct Memoized<V> {
    name: &'static str,
    cache: RwLock<LruCache<StateVersion, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> Memoized<V> {
    /// Create a new memo remembering up to `capacity` snapshots.
    #[must_use]
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            name,
            cache: RwLock::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The cached value for `state`, computing and storing it on a miss.
    ///
    /// `compute` must depend only on the state it is given.
    pub fn get_or_compute(&self, state: &GameState, compute: impl FnOnce(&GameState) -> V) -> V {
        let version = state.version();

        // `get` bumps recency, so a hit needs the write lock.
        if let Some(value) = self.cache.write().get(&version).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(memo = self.name, %version, "memo hit");
            return value;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(memo = self.name, %version, "memo miss");
        let value = compute(state);
        self.cache.write().put(version, value.clone());
        value
    }

    /// Hit/miss counters since creation.
    #[must_use]
    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Snapshots currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> fmt::Debug for Memoized<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("name", &self.name)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

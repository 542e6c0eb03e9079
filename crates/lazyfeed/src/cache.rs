//! Bounded, TTL-based page cache.
//!
//! [`PageCache`] maps composite keys (endpoint + page number + filter set)
//! to recently fetched pages. Two properties matter to callers:
//!
//! - **Eviction is by insertion order**, not access recency. When the bound
//!   is exceeded the oldest-inserted entry goes, regardless of how often it
//!   was read. This is deliberate: it keeps eviction deterministic under
//!   test and matches the behavior call sites were written against.
//! - **Expiry is lazy.** An entry past its TTL is dropped by the `get` that
//!   finds it; there is no background sweep.
//!
//! The cache is a pure in-memory map: no operation can fail.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tokio::time::Instant;

use lazyfeed_core::logging::targets;
use lazyfeed_core::FilterSet;

/// Derive the composite cache key for one page fetch.
///
/// The filter fragment is deterministic (see [`FilterSet::key_fragment`]),
/// so a filter change produces a different key and old pages simply stop
/// being found; no traversal-based invalidation is needed.
pub fn composite_key(endpoint: &str, page: u32, filters: &FilterSet) -> String {
    format!("{endpoint}::page={page}::{}", filters.key_fragment())
}

/// Diagnostic snapshot of the cache contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of live entries.
    pub size: usize,
    /// Configured eviction bound.
    pub max_size: usize,
    /// Live keys in insertion order, oldest first.
    pub keys: Vec<String>,
}

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// A bounded key→value cache with TTL and insertion-order eviction.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use lazyfeed::cache::PageCache;
///
/// let mut cache: PageCache<&str> = PageCache::new(2, Duration::from_secs(60));
/// cache.set("a", "first");
/// cache.set("b", "second");
/// cache.set("c", "third"); // evicts "a", the oldest-inserted entry
///
/// assert!(cache.get("a").is_none());
/// assert_eq!(cache.get("c"), Some(&"third"));
/// ```
pub struct PageCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Keys in first-insertion order; the eviction queue.
    order: VecDeque<String>,
    max_size: usize,
    ttl: Duration,
}

impl<V> PageCache<V> {
    /// Create a cache holding at most `max_size` entries, each valid for `ttl`.
    ///
    /// A bound of zero is coerced to one.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_size: max_size.max(1),
            ttl,
        }
    }

    /// Store a value under `key` with the current timestamp.
    ///
    /// Re-setting an existing key refreshes its value and timestamp but
    /// keeps its original position in the eviction queue. If the bound is
    /// exceeded, the oldest-inserted entry is evicted.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
        };

        if self.entries.insert(key.clone(), entry).is_none() {
            self.order.push_back(key);
        }

        while self.entries.len() > self.max_size {
            // order is non-empty whenever entries is.
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                tracing::debug!(target: targets::CACHE, key = %oldest, "evicted oldest entry");
            }
        }
    }

    /// Look up `key`, dropping the entry if its TTL has elapsed.
    ///
    /// Returns `None` for missing and expired entries alike.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.stored_at.elapsed() > self.ttl,
            None => return None,
        };

        if expired {
            self.remove(key);
            tracing::debug!(target: targets::CACHE, key, "entry expired");
            return None;
        }

        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Number of live entries (expired-but-unswept entries included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostic snapshot: size, bound, and keys in insertion order.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            max_size: self.max_size,
            keys: self.order.iter().cloned().collect(),
        }
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }
}

impl<V> std::fmt::Debug for PageCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCache")
            .field("size", &self.entries.len())
            .field("max_size", &self.max_size)
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn test_composite_key_shape() {
        let filters = FilterSet::new().with("status", "paid");
        assert_eq!(
            composite_key("/api/entries", 3, &filters),
            "/api/entries::page=3::status=paid"
        );
        assert_eq!(
            composite_key("/api/entries", 1, &FilterSet::new()),
            "/api/entries::page=1::"
        );
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut cache: PageCache<u32> = PageCache::new(5, TTL);
        cache.set("k", 7);
        assert_eq!(cache.get("k"), Some(&7));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_eviction_bound() {
        let max = 4;
        let mut cache: PageCache<usize> = PageCache::new(max, TTL);
        for i in 0..max + 2 {
            cache.set(format!("key-{i}"), i);
        }
        assert!(cache.stats().size <= max);
        // The two oldest-inserted entries are gone, the rest survive.
        assert_eq!(cache.get("key-0"), None);
        assert_eq!(cache.get("key-1"), None);
        assert_eq!(cache.get("key-2"), Some(&2));
        assert_eq!(cache.get(&format!("key-{}", max + 1)), Some(&(max + 1)));
    }

    #[test]
    fn test_eviction_is_insertion_order_not_access_order() {
        let mut cache: PageCache<u32> = PageCache::new(2, TTL);
        cache.set("a", 1);
        cache.set("b", 2);

        // Touch "a" repeatedly; a true LRU would protect it.
        assert!(cache.get("a").is_some());
        assert!(cache.get("a").is_some());

        cache.set("c", 3);
        assert_eq!(cache.get("a"), None, "oldest-inserted entry must go first");
        assert_eq!(cache.get("b"), Some(&2));
        assert_eq!(cache.get("c"), Some(&3));
    }

    #[test]
    fn test_reset_keeps_eviction_position() {
        let mut cache: PageCache<u32> = PageCache::new(2, TTL);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("a", 10); // refresh, not re-insertion

        cache.set("c", 3);
        // "a" kept its original (oldest) position, so it is evicted.
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(&2));
    }

    #[test]
    fn test_clear() {
        let mut cache: PageCache<u32> = PageCache::new(3, TTL);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().size, 0);
        assert!(cache.stats().keys.is_empty());
    }

    #[test]
    fn test_stats_keys_in_insertion_order() {
        let mut cache: PageCache<u32> = PageCache::new(5, TTL);
        cache.set("z", 1);
        cache.set("a", 2);
        cache.set("m", 3);
        assert_eq!(cache.stats().keys, vec!["z", "a", "m"]);
        assert_eq!(cache.stats().max_size, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry() {
        let mut cache: PageCache<u32> = PageCache::new(3, TTL);
        cache.set("k", 42);

        tokio::time::advance(TTL + Duration::from_millis(1)).await;
        assert_eq!(cache.get("k"), None);
        // The expired entry was dropped, not just hidden.
        assert_eq!(cache.stats().size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_valid_at_exact_ttl() {
        let mut cache: PageCache<u32> = PageCache::new(3, TTL);
        cache.set("k", 42);

        tokio::time::advance(TTL).await;
        assert_eq!(cache.get("k"), Some(&42));
    }

    #[test]
    fn test_zero_bound_coerced() {
        let mut cache: PageCache<u32> = PageCache::new(0, TTL);
        cache.set("a", 1);
        assert_eq!(cache.get("a"), Some(&1));
        assert_eq!(cache.stats().max_size, 1);
    }
}

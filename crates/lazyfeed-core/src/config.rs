//! Loader configuration.
//!
//! Every [`LoaderConfig`] is an explicit value passed to a loader at
//! construction time. There is no ambient global configuration: two loaders
//! on the same page can run with entirely different tuning.

use std::time::Duration;

/// Configuration for a single lazy loader.
///
/// All fields have conservative defaults suitable for list endpoints in the
/// tens-of-thousands-of-rows range. Use the chained setters to override
/// individual knobs:
///
/// ```
/// use std::time::Duration;
/// use lazyfeed_core::LoaderConfig;
///
/// let config = LoaderConfig::new()
///     .page_size(100)
///     .max_cached_pages(20)
///     .cache_ttl(Duration::from_secs(60));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LoaderConfig {
    /// Number of items requested per page.
    pub page_size: u32,
    /// How many rows ahead of the visible edge the sentinel observer should
    /// lead by. This is advisory: the host passes it to its visibility
    /// observer as a lead distance, the loader itself never issues
    /// overlapping prefetches.
    pub buffer_size: u32,
    /// How long a cached page stays valid before a lookup treats it as absent.
    pub cache_ttl: Duration,
    /// Fraction of sentinel visibility that triggers the next page load.
    /// Clamped to `0.0..=1.0` on construction.
    pub scroll_threshold: f64,
    /// Maximum number of pages kept in the cache. When exceeded, the
    /// oldest-inserted entry is evicted.
    pub max_cached_pages: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            buffer_size: 10,
            cache_ttl: Duration::from_secs(300),
            scroll_threshold: 0.1,
            max_cached_pages: 10,
        }
    }
}

impl LoaderConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of items requested per page.
    ///
    /// A page size of zero is coerced to one; the backend contract requires
    /// at least one item per page request.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the observer lead distance, in rows.
    pub fn buffer_size(mut self, buffer_size: u32) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set how long cached pages stay valid.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the sentinel visibility fraction that triggers loading.
    ///
    /// Values outside `0.0..=1.0` are clamped.
    pub fn scroll_threshold(mut self, threshold: f64) -> Self {
        self.scroll_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the cache eviction bound.
    ///
    /// A bound of zero is coerced to one so that the page just fetched is
    /// always cacheable.
    pub fn max_cached_pages(mut self, max: usize) -> Self {
        self.max_cached_pages = max.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.buffer_size, 10);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.scroll_threshold, 0.1);
        assert_eq!(config.max_cached_pages, 10);
    }

    #[test]
    fn test_chained_setters() {
        let config = LoaderConfig::new()
            .page_size(100)
            .buffer_size(5)
            .cache_ttl(Duration::from_secs(60))
            .scroll_threshold(0.5)
            .max_cached_pages(3);

        assert_eq!(config.page_size, 100);
        assert_eq!(config.buffer_size, 5);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.scroll_threshold, 0.5);
        assert_eq!(config.max_cached_pages, 3);
    }

    #[test]
    fn test_degenerate_values_coerced() {
        let config = LoaderConfig::new()
            .page_size(0)
            .scroll_threshold(2.0)
            .max_cached_pages(0);

        assert_eq!(config.page_size, 1);
        assert_eq!(config.scroll_threshold, 1.0);
        assert_eq!(config.max_cached_pages, 1);
    }

    #[test]
    fn test_negative_threshold_clamped() {
        let config = LoaderConfig::new().scroll_threshold(-0.3);
        assert_eq!(config.scroll_threshold, 0.0);
    }
}

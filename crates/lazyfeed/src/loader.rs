//! The lazy loader: cached pagination with sentinel-triggered infinite scroll.
//!
//! One [`LazyLoader`] owns one data list: it fetches pages through a
//! [`PageSource`], renders items through a caller-supplied callback, inserts
//! the resulting nodes before the surface's sentinel in backend order, and
//! keeps a bounded TTL cache so revisited pages never touch the network.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --init()--> Loading(1)
//! Loading(n) --items--> Idle (finished = false)
//! Loading(1) --empty--> Terminal (placeholder shown, finished = true)
//! Loading(n>1) --empty--> Idle (finished = true, rows untouched)
//! Loading(n) --failure--> Idle (banner shown, finished unchanged)
//! any --destroy()--> Destroyed (terminal)
//! any but Destroyed --update_filters()/reload()--> Loading(1)
//! ```
//!
//! # Concurrency
//!
//! At most one fetch per loader is in flight. The `loading` flag is set
//! under the state lock before the fetch suspends and cleared after it
//! resolves, so concurrent [`load_next`](LazyLoader::load_next) calls
//! collapse to a single request. No lock is ever held across an await.
//!
//! There is no request cancellation: a [`destroy`](LazyLoader::destroy)
//! (or filter change) during an in-flight load lets the request complete
//! and silently discards its result via an epoch check after the await.
//! A reload or filter change that supersedes an in-flight load still ends
//! in `Loading(1)`: the in-flight call discards its result and then issues
//! the page-1 load itself under the new filters.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lazyfeed::prelude::*;
//!
//! let source = HttpPageSource::builder("https://api.example.com/entries").build()?;
//! let loader = LazyLoader::builder(
//!     "/entries",
//!     source,
//!     VecSurface::new(),
//!     |entry: &Entry| format!("{} — {}", entry.date, entry.description),
//! )
//! .config(LoaderConfig::new().page_size(100))
//! .monitor(Arc::new(PerformanceMonitor::new()))
//! .build();
//!
//! loader.init().await;                     // renders page 1, arms the trigger
//! loader.on_sentinel_visible(1.0).await;   // host reports: sentinel scrolled into view
//! ```

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use lazyfeed_core::logging::targets;
use lazyfeed_core::telemetry::PerformanceMonitor;
use lazyfeed_core::{FilterSet, LoaderConfig};
use lazyfeed_net::{Page, PageRequest, PageSource};

use crate::cache::{composite_key, CacheStats, PageCache};
use crate::error::LoaderError;
use crate::surface::ListSurface;
use crate::trigger::VisibilityTrigger;

/// The user-visible banner emitted when a page load fails.
pub const LOAD_ERROR_BANNER: &str = "Erro ao carregar dados. Tente novamente.";

/// The placeholder row text shown when page 1 comes back empty.
pub const EMPTY_PLACEHOLDER_TEXT: &str = "Nenhum registro encontrado";

/// Sink for user-visible notifications (error banners).
///
/// The host binds this to its toast/banner widget; the default
/// [`TracingNotifier`] routes messages to the log.
pub trait Notifier: Send + Sync {
    /// Show a message to the user.
    fn notify(&self, message: &str);
}

/// Default notifier: error-level log lines instead of UI banners.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::error!(target: targets::LOADER, "{message}");
    }
}

/// What a single load attempt left behind.
enum LoadOutcome {
    /// The attempt ran to completion (or was a guarded no-op).
    Done,
    /// The attempt's result was discarded by a concurrent reload or filter
    /// change; a page-1 load under the new state is still owed.
    Restart,
}

/// Type alias for the render callback mapping one item to one node.
///
/// Must be a pure constructor: build the node from the item and nothing
/// else. The loader's ordering guarantees rely on renders having no side
/// effects on the surface.
pub type RenderFn<T, N> = Arc<dyn Fn(&T) -> N + Send + Sync>;

/// Mutable per-list state.
struct LoaderState {
    /// Last successfully loaded page, 0 before any.
    current_page: u32,
    /// Total pages reported by the backend. Informational only: it never
    /// sets `finished`, only an empty item list does.
    total_pages: Option<u32>,
    /// Total items reported by the backend.
    total_items: Option<u64>,
    /// No further pages until an explicit reload or filter change.
    finished: bool,
    /// A fetch is in flight.
    loading: bool,
    /// Terminal: every operation is a no-op.
    destroyed: bool,
    /// Bumped by reload/update_filters/destroy; an in-flight load whose
    /// epoch no longer matches discards its result.
    epoch: u64,
    /// A reload or filter change arrived while a fetch was in flight; the
    /// in-flight call issues the page-1 load after discarding its result.
    pending_restart: bool,
    /// Active filter set.
    filters: FilterSet,
}

/// A lazy-loading list controller. See the [module docs](self).
pub struct LazyLoader<T, S: ListSurface, C> {
    endpoint: String,
    source: C,
    render: RenderFn<T, S::Node>,
    config: LoaderConfig,
    monitor: Option<Arc<PerformanceMonitor>>,
    notifier: Arc<dyn Notifier>,
    surface: Mutex<S>,
    trigger: Mutex<VisibilityTrigger>,
    cache: Mutex<PageCache<Page<T>>>,
    state: Mutex<LoaderState>,
}

impl<T, S, C> LazyLoader<T, S, C>
where
    T: Clone,
    S: ListSurface,
    C: PageSource<T>,
{
    /// Create a builder.
    ///
    /// `endpoint` namespaces the cache keys (use the list's API path),
    /// `source` produces pages, `surface` receives rendered rows, and
    /// `render` maps one item to one node.
    pub fn builder(
        endpoint: impl Into<String>,
        source: C,
        surface: S,
        render: impl Fn(&T) -> S::Node + Send + Sync + 'static,
    ) -> LazyLoaderBuilder<T, S, C> {
        LazyLoaderBuilder::new(endpoint, source, surface, render)
    }

    /// Idempotent setup: ensure the sentinel exists, arm the visibility
    /// trigger, and load page 1.
    ///
    /// Tolerates a surface that already has content; the page-1 load clears
    /// it. A destroyed loader ignores the call.
    pub async fn init(&self) {
        {
            let st = self.state.lock();
            if st.destroyed {
                tracing::warn!(
                    target: targets::LOADER,
                    endpoint = %self.endpoint,
                    error = %LoaderError::Destroyed,
                    "init ignored"
                );
                return;
            }
        }
        self.surface.lock().ensure_sentinel();
        self.trigger.lock().connect();
        tracing::debug!(target: targets::LOADER, endpoint = %self.endpoint, "initialized");
        self.load_page(1).await;
    }

    /// Load page `page` for the current filter set.
    ///
    /// Resolution order: cache first (a hit renders without network access),
    /// then the page source. A page-1 result clears the surface before
    /// rendering; the sentinel is recreated as part of the clear. Failures
    /// are contained: the banner fires, the metrics log records the error,
    /// and the loading flag is always released.
    ///
    /// No-op when destroyed, when a load is already in flight, or when the
    /// loader is finished (an empty result set is terminal until
    /// [`reload`](Self::reload) or [`update_filters`](Self::update_filters)).
    pub async fn load_page(&self, page: u32) {
        let mut page = page;
        loop {
            match self.load_page_once(page).await {
                LoadOutcome::Done => break,
                // A reload or filter change superseded this load while it
                // was in flight; it owes the page-1 load it deferred.
                LoadOutcome::Restart => page = 1,
            }
        }
    }

    async fn load_page_once(&self, page: u32) -> LoadOutcome {
        let epoch = {
            let mut st = self.state.lock();
            if st.destroyed {
                tracing::warn!(
                    target: targets::LOADER,
                    endpoint = %self.endpoint,
                    error = %LoaderError::Destroyed,
                    "load_page ignored"
                );
                return LoadOutcome::Done;
            }
            if st.loading {
                tracing::debug!(target: targets::LOADER, page, "load in flight; ignoring");
                return LoadOutcome::Done;
            }
            if st.finished {
                tracing::debug!(target: targets::LOADER, page, "loader finished; ignoring");
                return LoadOutcome::Done;
            }
            st.loading = true;
            st.epoch
        };

        let started = Instant::now();
        let filters = self.state.lock().filters.clone();
        let key = composite_key(&self.endpoint, page, &filters);

        let cached = self.cache.lock().get(&key).cloned();
        if let Some(page_data) = cached {
            tracing::debug!(target: targets::LOADER, page, "cache hit");
            match self.apply_page(page, &page_data) {
                Ok(()) => {
                    if let Some(monitor) = &self.monitor {
                        monitor.log_page_load(page, started.elapsed(), true, page_data.len());
                    }
                }
                Err(err) => self.report_render_failure(page, &err),
            }
            self.state.lock().loading = false;
            return LoadOutcome::Done;
        }

        let request = PageRequest::new(page, self.config.page_size, filters);
        let result = self.source.fetch_page(&request).await;

        // Release the guard first; it must clear on every path, including
        // discard. The epoch check drops results that raced a teardown or
        // filter change.
        let (stale, restart) = {
            let mut st = self.state.lock();
            st.loading = false;
            let stale = st.destroyed || st.epoch != epoch;
            let restart = stale && !st.destroyed && st.pending_restart;
            if restart {
                st.pending_restart = false;
            }
            (stale, restart)
        };
        if stale {
            tracing::debug!(target: targets::LOADER, page, "discarding stale page result");
            return if restart {
                LoadOutcome::Restart
            } else {
                LoadOutcome::Done
            };
        }

        match result {
            Ok(page_data) => {
                let item_count = page_data.len();
                match self.apply_page(page, &page_data) {
                    Ok(()) => {
                        self.cache.lock().set(key, page_data);
                        if let Some(monitor) = &self.monitor {
                            monitor.log_page_load(page, started.elapsed(), false, item_count);
                        }
                    }
                    Err(err) => self.report_render_failure(page, &err),
                }
            }
            Err(err) => {
                let err = LoaderError::from(err);
                tracing::error!(
                    target: targets::LOADER,
                    endpoint = %self.endpoint,
                    page,
                    error = %err,
                    "page load failed"
                );
                if let Some(monitor) = &self.monitor {
                    monitor.log_error("load_page", err.to_string());
                }
                self.notifier.notify(LOAD_ERROR_BANNER);
            }
        }
        LoadOutcome::Done
    }

    /// Request the next sequential page.
    ///
    /// No-op while a load is in flight, after the loader finished, or after
    /// destroy. Concurrent calls collapse to a single request.
    pub async fn load_next(&self) {
        let next = {
            let st = self.state.lock();
            if st.destroyed || st.loading || st.finished {
                return;
            }
            st.current_page + 1
        };
        self.load_page(next).await;
    }

    /// Host entry point for sentinel visibility events.
    ///
    /// `visible_ratio` is the fraction of the sentinel inside the viewport.
    /// Fires [`load_next`](Self::load_next) when the armed trigger's
    /// threshold is crossed; a disconnected trigger ignores all events.
    pub async fn on_sentinel_visible(&self, visible_ratio: f64) {
        if !self.trigger.lock().should_fire(visible_ratio) {
            return;
        }
        if let Some(monitor) = &self.monitor {
            monitor.log_scroll_event();
        }
        self.load_next().await;
    }

    /// Merge new filter values into the active set and restart from page 1.
    ///
    /// The cache is cleared (old pages are invalid under the new filters)
    /// and pagination state resets. Values in `new_filters` override
    /// existing keys; untouched filters stay active. If a fetch is in
    /// flight, its result is discarded and that call performs the page-1
    /// load under the new filters.
    pub async fn update_filters(&self, new_filters: FilterSet) {
        {
            let mut st = self.state.lock();
            if st.destroyed {
                tracing::warn!(
                    target: targets::LOADER,
                    endpoint = %self.endpoint,
                    error = %LoaderError::Destroyed,
                    "update_filters ignored"
                );
                return;
            }
            st.filters.merge(new_filters);
            st.current_page = 0;
            st.finished = false;
            st.epoch += 1;
            if st.loading {
                st.pending_restart = true;
            }
        }
        self.cache.lock().clear();
        self.surface.lock().ensure_sentinel();
        self.trigger.lock().connect();
        tracing::debug!(target: targets::LOADER, endpoint = %self.endpoint, "filters updated");
        self.load_page(1).await;
    }

    /// Clear the cache and reload page 1 under the current filter set.
    pub async fn reload(&self) {
        {
            let mut st = self.state.lock();
            if st.destroyed {
                return;
            }
            st.current_page = 0;
            st.finished = false;
            st.epoch += 1;
            if st.loading {
                st.pending_restart = true;
            }
        }
        self.cache.lock().clear();
        tracing::debug!(target: targets::LOADER, endpoint = %self.endpoint, "reloading");
        self.load_page(1).await;
    }

    /// Tear the loader down: disconnect the visibility trigger, clear the
    /// cache, and remove the sentinel.
    ///
    /// Terminal and idempotent; safe before `init` and safe to call twice.
    /// An in-flight load completes and its result is discarded.
    pub fn destroy(&self) {
        {
            let mut st = self.state.lock();
            if st.destroyed {
                tracing::debug!(target: targets::LOADER, endpoint = %self.endpoint, "already destroyed");
            }
            st.destroyed = true;
            st.epoch += 1;
            st.pending_restart = false;
        }
        self.trigger.lock().disconnect();
        self.cache.lock().clear();
        self.surface.lock().remove_sentinel();
        tracing::debug!(target: targets::LOADER, endpoint = %self.endpoint, "destroyed");
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Whether the loader reached the end of the data set.
    pub fn is_finished(&self) -> bool {
        self.state.lock().finished
    }

    /// Whether the loader has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.state.lock().destroyed
    }

    /// The last successfully loaded page, 0 before any.
    pub fn current_page(&self) -> u32 {
        self.state.lock().current_page
    }

    /// Total pages reported by the backend, once known.
    pub fn total_pages(&self) -> Option<u32> {
        self.state.lock().total_pages
    }

    /// Total items reported by the backend, once known.
    pub fn total_items(&self) -> Option<u64> {
        self.state.lock().total_items
    }

    /// A copy of the active filter set.
    pub fn filters(&self) -> FilterSet {
        self.state.lock().filters.clone()
    }

    /// Diagnostic snapshot of the page cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    /// The loader's configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// The endpoint namespace used for cache keys.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run `f` against the surface. Intended for assertions and host reads;
    /// mutating the surface from here voids the sentinel guarantees.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.surface.lock())
    }

    /// Apply a fetched page to surface and state.
    ///
    /// Synchronous: runs entirely between suspension points.
    fn apply_page(&self, page: u32, data: &Page<T>) -> crate::error::Result<()> {
        {
            let mut st = self.state.lock();
            st.current_page = page;
            st.total_pages = Some(data.pagination.pages);
            st.total_items = Some(data.pagination.total);
        }

        if data.is_empty() {
            if page == 1 {
                let mut surface = self.surface.lock();
                surface.clear();
                surface.show_placeholder(EMPTY_PLACEHOLDER_TEXT);
                tracing::debug!(target: targets::LOADER, "page 1 empty; showing placeholder");
            } else {
                tracing::debug!(target: targets::LOADER, page, "empty page; end of data");
            }
            self.state.lock().finished = true;
            return Ok(());
        }

        let render_started = Instant::now();
        {
            let mut surface = self.surface.lock();
            if page == 1 {
                surface.clear();
            }
            for item in &data.items {
                let node = (self.render)(item);
                if !surface.insert_before_sentinel(node) {
                    return Err(LoaderError::MissingSentinel);
                }
            }
        }
        if let Some(monitor) = &self.monitor {
            monitor.log_render_time(page, render_started.elapsed());
        }
        self.state.lock().finished = false;
        tracing::debug!(target: targets::LOADER, page, rows = data.len(), "page rendered");
        Ok(())
    }

    /// Configuration errors abort the render without a user banner.
    fn report_render_failure(&self, page: u32, err: &LoaderError) {
        tracing::warn!(
            target: targets::LOADER,
            endpoint = %self.endpoint,
            page,
            error = %err,
            "render aborted"
        );
        if let Some(monitor) = &self.monitor {
            monitor.log_error("render", err.to_string());
        }
    }
}

impl<T, S: ListSurface, C> std::fmt::Debug for LazyLoader<T, S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.state.lock();
        f.debug_struct("LazyLoader")
            .field("endpoint", &self.endpoint)
            .field("current_page", &st.current_page)
            .field("finished", &st.finished)
            .field("loading", &st.loading)
            .field("destroyed", &st.destroyed)
            .finish()
    }
}

/// Builder for [`LazyLoader`].
pub struct LazyLoaderBuilder<T, S: ListSurface, C> {
    endpoint: String,
    source: C,
    surface: S,
    render: RenderFn<T, S::Node>,
    config: LoaderConfig,
    monitor: Option<Arc<PerformanceMonitor>>,
    notifier: Arc<dyn Notifier>,
    filters: FilterSet,
}

impl<T, S: ListSurface, C> LazyLoaderBuilder<T, S, C> {
    /// Create a builder; see [`LazyLoader::builder`].
    pub fn new(
        endpoint: impl Into<String>,
        source: C,
        surface: S,
        render: impl Fn(&T) -> S::Node + Send + Sync + 'static,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            source,
            surface,
            render: Arc::new(render),
            config: LoaderConfig::default(),
            monitor: None,
            notifier: Arc::new(TracingNotifier),
            filters: FilterSet::new(),
        }
    }

    /// Set the loader configuration.
    pub fn config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a shared performance monitor.
    pub fn monitor(mut self, monitor: Arc<PerformanceMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Set the notification sink for error banners.
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Set the initial filter set.
    pub fn filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    /// Build the loader. It starts idle; call
    /// [`init`](LazyLoader::init) to load page 1 and arm the trigger.
    pub fn build(self) -> LazyLoader<T, S, C> {
        let cache = PageCache::new(self.config.max_cached_pages, self.config.cache_ttl);
        let trigger = VisibilityTrigger::new(self.config.scroll_threshold, self.config.buffer_size);
        LazyLoader {
            endpoint: self.endpoint,
            source: self.source,
            render: self.render,
            config: self.config,
            monitor: self.monitor,
            notifier: self.notifier,
            surface: Mutex::new(self.surface),
            trigger: Mutex::new(trigger),
            cache: Mutex::new(cache),
            state: Mutex::new(LoaderState {
                current_page: 0,
                total_pages: None,
                total_items: None,
                finished: false,
                loading: false,
                destroyed: false,
                epoch: 0,
                pending_restart: false,
                filters: self.filters,
            }),
        }
    }
}

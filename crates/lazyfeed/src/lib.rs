//! # Lazyfeed
//!
//! A lazy-loading engine for paginated data lists: fetch pages on demand as
//! the user scrolls, render them through a host-supplied callback, and keep
//! a bounded TTL cache so revisited pages never refetch.
//!
//! The engine is split across three crates:
//!
//! - `lazyfeed-core`: configuration, filter sets, and performance telemetry
//! - `lazyfeed-net`: the pagination wire contract and the HTTP page source
//! - `lazyfeed` (this crate): the [`LazyLoader`] controller, the
//!   [`PageCache`](cache::PageCache), the [`ListSurface`](surface::ListSurface)
//!   rendering abstraction, and the sentinel [`VisibilityTrigger`](trigger::VisibilityTrigger)
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use lazyfeed::prelude::*;
//!
//! #[derive(Clone, serde::Deserialize)]
//! struct Entry {
//!     id: u64,
//!     description: String,
//! }
//!
//! let source = HttpPageSource::builder("https://api.example.com/api/entries")
//!     .bearer_auth(token)
//!     .build()?;
//!
//! let loader = LazyLoader::builder(
//!     "/api/entries",
//!     source,
//!     VecSurface::new(),
//!     |entry: &Entry| entry.description.clone(),
//! )
//! .config(LoaderConfig::new().page_size(100).max_cached_pages(20))
//! .filters(FilterSet::new().with("status", "active"))
//! .monitor(Arc::new(PerformanceMonitor::new()))
//! .build();
//!
//! loader.init().await;
//!
//! // Wire the host's scroll observer to the loader:
//! loader.on_sentinel_visible(1.0).await;
//! ```
//!
//! See the [`loader`] module docs for the full lifecycle and concurrency
//! contract.

pub mod cache;
pub mod loader;
pub mod surface;
pub mod trigger;

mod error;

pub use cache::{composite_key, CacheStats, PageCache};
pub use error::LoaderError;
pub use loader::{
    LazyLoader, LazyLoaderBuilder, Notifier, RenderFn, TracingNotifier, EMPTY_PLACEHOLDER_TEXT,
    LOAD_ERROR_BANNER,
};
pub use surface::{ListSurface, SurfaceChild, VecSurface};
pub use trigger::VisibilityTrigger;

pub use lazyfeed_core::{
    FilterSet, LoaderConfig, PerformanceMonitor, Recommendation, RecommendationLevel, Report,
};
pub use lazyfeed_net::{
    AnalyticsClient, HttpPageSource, NetError, Page, PageRequest, PageSource, Pagination,
};

/// Convenience re-exports for host code.
pub mod prelude {
    pub use crate::loader::{LazyLoader, LazyLoaderBuilder, Notifier, TracingNotifier};
    pub use crate::surface::{ListSurface, VecSurface};
    pub use lazyfeed_core::{FilterSet, LoaderConfig, PerformanceMonitor};
    pub use lazyfeed_net::{HttpPageSource, Page, PageRequest, PageSource, Pagination};
}

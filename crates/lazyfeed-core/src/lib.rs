//! Core types for Lazyfeed.
//!
//! This crate provides the foundational, I/O-free components of the Lazyfeed
//! lazy-loading list engine:
//!
//! - **Loader configuration**: Per-loader tuning knobs with documented defaults
//! - **Filter sets**: Ordered filter key/value maps with deterministic
//!   serialization, used for query strings and cache keys
//! - **Performance monitor**: Passive telemetry sink producing a diagnostic
//!   report with rule-based recommendations
//! - **Logging targets**: Constants for filtering `tracing` output by subsystem
//!
//! # Configuration Example
//!
//! ```
//! use std::time::Duration;
//! use lazyfeed_core::LoaderConfig;
//!
//! let config = LoaderConfig::new()
//!     .page_size(100)
//!     .cache_ttl(Duration::from_secs(120));
//!
//! assert_eq!(config.page_size, 100);
//! ```
//!
//! # Telemetry Example
//!
//! ```
//! use std::time::Duration;
//! use lazyfeed_core::telemetry::PerformanceMonitor;
//!
//! let monitor = PerformanceMonitor::new();
//! monitor.log_page_load(1, Duration::from_millis(80), false, 50);
//! monitor.log_render_time(1, Duration::from_millis(12));
//!
//! let report = monitor.generate_report();
//! assert_eq!(report.total_page_loads, 1);
//! ```

pub mod config;
pub mod filters;
pub mod logging;
pub mod telemetry;

pub use config::LoaderConfig;
pub use filters::FilterSet;
pub use telemetry::{PerformanceMonitor, Recommendation, RecommendationLevel, Report};

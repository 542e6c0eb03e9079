//! Networking module for Lazyfeed.
//!
//! This crate provides the network-facing half of the Lazyfeed engine:
//!
//! - **Wire types**: [`Page`], [`Pagination`], and [`PageRequest`] matching
//!   the backend's pagination contract
//! - **Page source**: the [`PageSource`] trait the loader fetches through,
//!   and [`HttpPageSource`], its reqwest-backed production implementation
//! - **Analytics sink**: [`AnalyticsClient`], a best-effort uploader for
//!   telemetry reports
//!
//! # Backend contract
//!
//! One endpoint per data list, shaped as:
//!
//! ```text
//! GET {endpoint}?page={n}&page_size={size}&{filter}={value}...
//! 200 OK -> { "items": [...], "pagination": { "total": int, "pages": int, "current": int } }
//! ```
//!
//! Any non-2xx status is a [`NetError::HttpStatus`] failure.
//!
//! # Example
//!
//! ```ignore
//! use lazyfeed_core::FilterSet;
//! use lazyfeed_net::{HttpPageSource, PageRequest, PageSource};
//!
//! let source = HttpPageSource::builder("https://api.example.com/entries")
//!     .bearer_auth("token")
//!     .build()?;
//!
//! let request = PageRequest::new(1, 50, FilterSet::new());
//! let page: lazyfeed_net::Page<serde_json::Value> = source.fetch_page(&request).await?;
//! println!("{} of {} items", page.items.len(), page.pagination.total);
//! ```

mod error;

pub mod analytics;
pub mod page;
pub mod source;

pub use analytics::AnalyticsClient;
pub use error::{NetError, Result};
pub use page::{Page, PageRequest, Pagination};
pub use source::{HttpPageSource, HttpPageSourceBuilder, PageSource};

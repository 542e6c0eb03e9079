//! Logging facilities for Lazyfeed.
//!
//! Lazyfeed uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! Every log line carries an explicit target from [`targets`], so hosts can
//! filter by subsystem, for example `RUST_LOG=lazyfeed::loader=debug`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Loader lifecycle and page loads.
    pub const LOADER: &str = "lazyfeed::loader";
    /// Page cache hits, misses, and evictions.
    pub const CACHE: &str = "lazyfeed::cache";
    /// HTTP page source and analytics sink.
    pub const NET: &str = "lazyfeed::net";
    /// Performance monitor.
    pub const TELEMETRY: &str = "lazyfeed::telemetry";
}

//! Passive performance telemetry for lazy loaders.
//!
//! [`PerformanceMonitor`] is a best-effort observability sink: loaders report
//! page loads, render timings, scroll triggers, and errors to it, and it
//! never blocks or alters loader behavior. A disabled monitor turns every
//! logging call into a no-op.
//!
//! One monitor is typically shared (`Arc<PerformanceMonitor>`) by all the
//! loaders on a page, accumulating a session-wide [`Report`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;

use crate::logging::targets;

/// One recorded page load.
#[derive(Clone, Debug)]
pub struct PageLoadRecord {
    /// 1-based page number.
    pub page: u32,
    /// Wall time from request to rendered rows.
    pub duration: Duration,
    /// Whether the page came from the cache instead of the network.
    pub cache_hit: bool,
    /// Number of items in the page.
    pub item_count: usize,
    /// Offset from session start.
    pub at: Duration,
}

/// One recorded render pass.
#[derive(Clone, Debug)]
pub struct RenderRecord {
    /// 1-based page number.
    pub page: u32,
    /// Time spent building and inserting row nodes.
    pub duration: Duration,
    /// Offset from session start.
    pub at: Duration,
}

/// One recorded error.
#[derive(Clone, Debug, Serialize)]
pub struct ErrorRecord {
    /// Where the error happened (for example `"load_page"`).
    pub context: String,
    /// The error message.
    pub message: String,
    /// Milliseconds from session start.
    pub at_ms: u64,
}

/// Severity of a report recommendation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationLevel {
    /// Everything within expected bounds.
    Success,
    /// Worth investigating.
    Warning,
    /// Actively degrading the user experience.
    Error,
}

/// A single rule-based recommendation derived from the metrics.
#[derive(Clone, Debug, Serialize)]
pub struct Recommendation {
    /// Severity.
    pub level: RecommendationLevel,
    /// Human-readable advice.
    pub message: String,
}

/// Aggregate diagnostic report over one monitor session.
///
/// Serializable so it can be posted to a diagnostics endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    /// Session length in milliseconds.
    pub session_duration_ms: u64,
    /// Total page loads recorded (cache hits included).
    pub total_page_loads: usize,
    /// Of which served from the cache.
    pub cache_hits: usize,
    /// `cache_hits / total_page_loads`, or 0 for an empty session.
    pub cache_hit_rate: f64,
    /// Average page-load time across all loads, in milliseconds.
    pub average_load_ms: f64,
    /// Average load time for network (non-cache-hit) loads, in milliseconds.
    pub average_network_ms: f64,
    /// Average render time, in milliseconds.
    pub average_render_ms: f64,
    /// Total items delivered across all loads.
    pub total_items: usize,
    /// Number of sentinel visibility triggers.
    pub scroll_triggers: u64,
    /// Recorded errors, in order.
    pub errors: Vec<ErrorRecord>,
    /// Rule-based advice derived from the numbers above.
    pub recommendations: Vec<Recommendation>,
}

/// Append-only metric log for one session.
struct MetricsLog {
    session_start: Instant,
    page_loads: Vec<PageLoadRecord>,
    renders: Vec<RenderRecord>,
    errors: Vec<ErrorRecord>,
    scroll_triggers: u64,
}

impl MetricsLog {
    fn new() -> Self {
        Self {
            session_start: Instant::now(),
            page_loads: Vec::new(),
            renders: Vec::new(),
            errors: Vec::new(),
            scroll_triggers: 0,
        }
    }
}

/// Passive telemetry sink for lazy loaders.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use lazyfeed_core::telemetry::PerformanceMonitor;
///
/// let monitor = PerformanceMonitor::new();
/// monitor.log_page_load(1, Duration::from_millis(90), false, 50);
/// monitor.log_page_load(1, Duration::from_millis(2), true, 50);
///
/// let report = monitor.generate_report();
/// assert_eq!(report.total_page_loads, 2);
/// assert_eq!(report.cache_hits, 1);
/// ```
pub struct PerformanceMonitor {
    enabled: AtomicBool,
    log: Mutex<MetricsLog>,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMonitor {
    /// Create an enabled monitor with an empty session.
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            log: Mutex::new(MetricsLog::new()),
        }
    }

    /// Create a disabled monitor. Every logging call is a no-op until
    /// [`set_enabled`](Self::set_enabled) turns it on.
    pub fn disabled() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            log: Mutex::new(MetricsLog::new()),
        }
    }

    /// Enable or disable metric collection.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Whether the monitor is currently recording.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Record one page load.
    pub fn log_page_load(&self, page: u32, duration: Duration, cache_hit: bool, item_count: usize) {
        if !self.is_enabled() {
            return;
        }
        let mut log = self.log.lock();
        let at = log.session_start.elapsed();
        log.page_loads.push(PageLoadRecord {
            page,
            duration,
            cache_hit,
            item_count,
            at,
        });
        tracing::debug!(
            target: targets::TELEMETRY,
            page,
            duration_ms = duration.as_millis() as u64,
            cache_hit,
            item_count,
            "page load recorded"
        );
    }

    /// Record one render pass.
    pub fn log_render_time(&self, page: u32, duration: Duration) {
        if !self.is_enabled() {
            return;
        }
        let mut log = self.log.lock();
        let at = log.session_start.elapsed();
        log.renders.push(RenderRecord { page, duration, at });
    }

    /// Record an error with the context it occurred in.
    pub fn log_error(&self, context: impl Into<String>, message: impl Into<String>) {
        if !self.is_enabled() {
            return;
        }
        let mut log = self.log.lock();
        let at_ms = log.session_start.elapsed().as_millis() as u64;
        log.errors.push(ErrorRecord {
            context: context.into(),
            message: message.into(),
            at_ms,
        });
    }

    /// Record one sentinel visibility trigger.
    pub fn log_scroll_event(&self) {
        if !self.is_enabled() {
            return;
        }
        self.log.lock().scroll_triggers += 1;
    }

    /// Derive the aggregate report for the current session.
    ///
    /// Works whether or not the monitor is enabled; it reports whatever has
    /// been recorded so far.
    pub fn generate_report(&self) -> Report {
        let log = self.log.lock();

        let total = log.page_loads.len();
        let hits = log.page_loads.iter().filter(|r| r.cache_hit).count();
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        let average_load_ms = mean_ms(log.page_loads.iter().map(|r| r.duration));
        let average_network_ms = mean_ms(
            log.page_loads
                .iter()
                .filter(|r| !r.cache_hit)
                .map(|r| r.duration),
        );
        let average_render_ms = mean_ms(log.renders.iter().map(|r| r.duration));
        let total_items = log.page_loads.iter().map(|r| r.item_count).sum();

        let mut report = Report {
            session_duration_ms: log.session_start.elapsed().as_millis() as u64,
            total_page_loads: total,
            cache_hits: hits,
            cache_hit_rate: hit_rate,
            average_load_ms,
            average_network_ms,
            average_render_ms,
            total_items,
            scroll_triggers: log.scroll_triggers,
            errors: log.errors.clone(),
            recommendations: Vec::new(),
        };
        report.recommendations = recommendations_for(&report);
        report
    }

    /// Clear all recorded metrics and restart the session clock.
    pub fn reset(&self) {
        *self.log.lock() = MetricsLog::new();
        tracing::debug!(target: targets::TELEMETRY, "metrics reset");
    }
}

impl std::fmt::Debug for PerformanceMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let log = self.log.lock();
        f.debug_struct("PerformanceMonitor")
            .field("enabled", &self.is_enabled())
            .field("page_loads", &log.page_loads.len())
            .field("errors", &log.errors.len())
            .finish()
    }
}

fn mean_ms(durations: impl Iterator<Item = Duration>) -> f64 {
    let mut sum = Duration::ZERO;
    let mut count = 0u32;
    for d in durations {
        sum += d;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum.as_secs_f64() * 1000.0 / f64::from(count)
    }
}

/// Derive the rule-based recommendation set for a report.
///
/// Thresholds: hit rate below 30% warns (only once loads exist), average
/// network latency above 1000 ms is an error, average render time above
/// 500 ms warns, any recorded error is an error. A clean session gets a
/// single success entry.
fn recommendations_for(report: &Report) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if report.total_page_loads > 0 && report.cache_hit_rate < 0.30 {
        out.push(Recommendation {
            level: RecommendationLevel::Warning,
            message: format!(
                "Cache hit rate is {:.0}%; consider a longer TTL or larger cache bound",
                report.cache_hit_rate * 100.0
            ),
        });
    }

    if report.average_network_ms > 1000.0 {
        out.push(Recommendation {
            level: RecommendationLevel::Error,
            message: format!(
                "Average network latency is {:.0} ms; the backend or page size needs attention",
                report.average_network_ms
            ),
        });
    }

    if report.average_render_ms > 500.0 {
        out.push(Recommendation {
            level: RecommendationLevel::Warning,
            message: format!(
                "Average render time is {:.0} ms; row construction is too slow",
                report.average_render_ms
            ),
        });
    }

    if !report.errors.is_empty() {
        out.push(Recommendation {
            level: RecommendationLevel::Error,
            message: format!("{} error(s) recorded during this session", report.errors.len()),
        });
    }

    if out.is_empty() {
        out.push(Recommendation {
            level: RecommendationLevel::Success,
            message: "Lazy loading is performing within expected bounds".to_string(),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session_report() {
        let monitor = PerformanceMonitor::new();
        let report = monitor.generate_report();

        assert_eq!(report.total_page_loads, 0);
        assert_eq!(report.cache_hit_rate, 0.0);
        assert_eq!(report.average_load_ms, 0.0);
        // No loads, no errors: the single success recommendation.
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].level, RecommendationLevel::Success);
    }

    #[test]
    fn test_cache_hit_rate() {
        let monitor = PerformanceMonitor::new();
        monitor.log_page_load(1, Duration::from_millis(100), false, 50);
        monitor.log_page_load(1, Duration::from_millis(1), true, 50);
        monitor.log_page_load(2, Duration::from_millis(120), false, 50);
        monitor.log_page_load(2, Duration::from_millis(1), true, 50);

        let report = monitor.generate_report();
        assert_eq!(report.total_page_loads, 4);
        assert_eq!(report.cache_hits, 2);
        assert!((report.cache_hit_rate - 0.5).abs() < f64::EPSILON);
        assert_eq!(report.total_items, 200);
    }

    #[test]
    fn test_low_hit_rate_warns() {
        let monitor = PerformanceMonitor::new();
        monitor.log_page_load(1, Duration::from_millis(100), false, 50);

        let report = monitor.generate_report();
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.level == RecommendationLevel::Warning && r.message.contains("hit rate")));
    }

    #[test]
    fn test_slow_network_is_error() {
        let monitor = PerformanceMonitor::new();
        monitor.log_page_load(1, Duration::from_millis(1500), false, 50);
        monitor.log_page_load(1, Duration::from_millis(1), true, 50);
        monitor.log_page_load(1, Duration::from_millis(1), true, 50);

        let report = monitor.generate_report();
        // Network average counts only the non-hit load.
        assert!(report.average_network_ms > 1000.0);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.level == RecommendationLevel::Error && r.message.contains("network")));
    }

    #[test]
    fn test_slow_render_warns() {
        let monitor = PerformanceMonitor::new();
        monitor.log_render_time(1, Duration::from_millis(800));

        let report = monitor.generate_report();
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.level == RecommendationLevel::Warning && r.message.contains("render")));
    }

    #[test]
    fn test_errors_produce_error_recommendation() {
        let monitor = PerformanceMonitor::new();
        monitor.log_error("load_page", "HTTP 500");

        let report = monitor.generate_report();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].context, "load_page");
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.level == RecommendationLevel::Error));
    }

    #[test]
    fn test_disabled_monitor_records_nothing() {
        let monitor = PerformanceMonitor::disabled();
        monitor.log_page_load(1, Duration::from_millis(100), false, 50);
        monitor.log_render_time(1, Duration::from_millis(10));
        monitor.log_error("x", "y");
        monitor.log_scroll_event();

        let report = monitor.generate_report();
        assert_eq!(report.total_page_loads, 0);
        assert_eq!(report.errors.len(), 0);
        assert_eq!(report.scroll_triggers, 0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let monitor = PerformanceMonitor::new();
        monitor.log_page_load(1, Duration::from_millis(100), false, 50);
        monitor.log_scroll_event();
        monitor.reset();

        let report = monitor.generate_report();
        assert_eq!(report.total_page_loads, 0);
        assert_eq!(report.scroll_triggers, 0);
    }

    #[test]
    fn test_report_serializes() {
        let monitor = PerformanceMonitor::new();
        monitor.log_page_load(1, Duration::from_millis(100), false, 50);

        let report = monitor.generate_report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_page_loads"], 1);
        assert!(json["recommendations"].is_array());
    }
}

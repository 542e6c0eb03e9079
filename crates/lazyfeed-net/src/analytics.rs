//! Best-effort upload of telemetry reports.
//!
//! The analytics endpoint is advisory: a failed upload must never disturb
//! the host application, so [`AnalyticsClient::post_report`] logs failures
//! at warn level and returns nothing.

use std::time::Duration;

use url::Url;

use lazyfeed_core::logging::targets;
use lazyfeed_core::telemetry::Report;

use crate::error::Result;

/// Path of the diagnostics endpoint, relative to the API base URL.
pub const ANALYTICS_PATH: &str = "/api/analytics/lazy-loading";

/// Posts telemetry reports to the diagnostics endpoint.
#[derive(Clone, Debug)]
pub struct AnalyticsClient {
    client: reqwest::Client,
    url: Url,
}

impl AnalyticsClient {
    /// Create a client posting to `{base_url}/api/analytics/lazy-loading`.
    ///
    /// Fails only if `base_url` is not a valid absolute URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base = base_url.as_ref().trim_end_matches('/');
        let url = Url::parse(&format!("{base}{ANALYTICS_PATH}"))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, url })
    }

    /// The full URL reports are posted to.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Post a report to the diagnostics endpoint.
    ///
    /// Best-effort: any transport or status failure is logged at warn level
    /// and swallowed. The backend's response is advisory only.
    pub async fn post_report(&self, report: &Report) {
        let result = self.client.post(self.url.clone()).json(report).send().await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(target: targets::NET, "analytics report delivered");
            }
            Ok(response) => {
                tracing::warn!(
                    target: targets::NET,
                    status = response.status().as_u16(),
                    "analytics endpoint rejected report"
                );
            }
            Err(err) => {
                tracing::warn!(
                    target: targets::NET,
                    error = %err,
                    "failed to deliver analytics report"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_construction() {
        let client = AnalyticsClient::new("https://api.example.com").unwrap();
        assert_eq!(
            client.url(),
            "https://api.example.com/api/analytics/lazy-loading"
        );
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let client = AnalyticsClient::new("https://api.example.com/").unwrap();
        assert_eq!(
            client.url(),
            "https://api.example.com/api/analytics/lazy-loading"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(AnalyticsClient::new("nope").is_err());
    }
}

//! Paginated page sources.
//!
//! [`PageSource`] is the seam between the loader and the network: the loader
//! only ever asks "give me page `n` under these filters". Production code
//! uses [`HttpPageSource`]; tests drive the loader with scripted sources.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use lazyfeed_core::logging::targets;

use crate::error::{NetError, Result};
use crate::page::{Page, PageRequest};

/// A source of pages for one data list.
///
/// Implementations must be cheap to call repeatedly; the loader guarantees
/// at most one `fetch_page` per loader is in flight at a time.
pub trait PageSource<T> {
    /// Fetch one page for the given request.
    fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> impl std::future::Future<Output = Result<Page<T>>> + Send;
}

/// Internal state for the HTTP page source.
struct HttpPageSourceInner {
    client: reqwest::Client,
    endpoint: Url,
    fixed_query: Vec<(String, String)>,
    bearer_token: Option<String>,
}

/// A reqwest-backed page source for one paginated REST endpoint.
///
/// Cheaply cloneable; clones share the same connection pool.
///
/// # Example
///
/// ```ignore
/// let source = HttpPageSource::builder("https://api.example.com/entries")
///     .timeout(Duration::from_secs(10))
///     .query("order", "date")
///     .build()?;
/// ```
#[derive(Clone)]
pub struct HttpPageSource {
    inner: Arc<HttpPageSourceInner>,
}

impl HttpPageSource {
    /// Create a builder for the given endpoint URL.
    pub fn builder(endpoint: impl Into<String>) -> HttpPageSourceBuilder {
        HttpPageSourceBuilder::new(endpoint)
    }

    /// The endpoint this source fetches from.
    pub fn endpoint(&self) -> &str {
        self.inner.endpoint.as_str()
    }

    async fn fetch<T: DeserializeOwned>(&self, request: &PageRequest) -> Result<Page<T>> {
        let inner = &self.inner;

        let mut url = inner.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &inner.fixed_query {
                pairs.append_pair(key, value);
            }
            for (key, value) in request.filters.iter() {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("page", &request.page.to_string());
            pairs.append_pair("page_size", &request.page_size.to_string());
        }

        tracing::debug!(
            target: targets::NET,
            page = request.page,
            url = %url,
            "fetching page"
        );

        let mut req = inner.client.get(url);
        if let Some(token) = &inner.bearer_token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.ok().filter(|body| !body.is_empty());
            return Err(NetError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let page: Page<T> = serde_json::from_str(&body)?;
        Ok(page)
    }
}

impl<T: DeserializeOwned + Send> PageSource<T> for HttpPageSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<T>> {
        self.fetch(request).await
    }
}

impl std::fmt::Debug for HttpPageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageSource")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("has_auth", &self.inner.bearer_token.is_some())
            .finish()
    }
}

/// Builder for creating an [`HttpPageSource`].
pub struct HttpPageSourceBuilder {
    endpoint: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    fixed_query: Vec<(String, String)>,
    bearer_token: Option<String>,
}

impl HttpPageSourceBuilder {
    /// Create a new builder for the given endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            user_agent: Some(format!("Lazyfeed/{} (Rust)", env!("CARGO_PKG_VERSION"))),
            fixed_query: Vec::new(),
            bearer_token: None,
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable the request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Add a fixed query pair sent with every page request, before the
    /// filters and pagination parameters.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fixed_query.push((key.into(), value.into()));
        self
    }

    /// Set bearer token authentication.
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Build the page source.
    ///
    /// Fails if the endpoint is not a valid absolute URL or the underlying
    /// HTTP client cannot be constructed.
    pub fn build(self) -> Result<HttpPageSource> {
        let endpoint = Url::parse(&self.endpoint)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(ref ua) = self.user_agent {
            builder = builder.user_agent(ua);
        }
        let client = builder.build()?;

        Ok(HttpPageSource {
            inner: Arc::new(HttpPageSourceInner {
                client,
                endpoint,
                fixed_query: self.fixed_query,
                bearer_token: self.bearer_token,
            }),
        })
    }
}

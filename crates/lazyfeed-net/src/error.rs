//! Error types for the networking module.

/// A specialized Result type for network operations.
pub type Result<T> = std::result::Result<T, NetError>;

/// Errors that can occur while fetching pages.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NetError {
    /// HTTP request failed.
    #[error("HTTP request error: {0}")]
    Request(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// Connection refused or failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Response body was not valid JSON for the expected page shape.
    #[error("JSON error: {0}")]
    Json(String),

    /// HTTP error status (anything outside 2xx).
    #[error("{}", http_status_display(.status, .message))]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// Optional error message from the response body.
        message: Option<String>,
    },
}

fn http_status_display(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(msg) => format!("HTTP {status}: {msg}"),
        None => format!("HTTP {status}"),
    }
}

impl From<reqwest::Error> for NetError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for NetError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for NetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

//! Error types for the loader engine.
//!
//! Nothing in this crate is fatal to the host: loader operations report
//! failures through the notifier and the telemetry log rather than
//! returning errors. `LoaderError` is the internal taxonomy those paths
//! classify failures with.

use std::fmt;

use lazyfeed_net::NetError;

/// Failures the loader can encounter internally.
#[derive(Debug, Clone)]
pub enum LoaderError {
    /// A page fetch failed (transport, status, or parse).
    Fetch(NetError),
    /// The surface has no sentinel to insert before.
    MissingSentinel,
    /// An operation was invoked on a destroyed loader.
    Destroyed,
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(err) => write!(f, "Page fetch failed: {err}"),
            Self::MissingSentinel => {
                write!(f, "List surface has no sentinel; was the loader initialized?")
            }
            Self::Destroyed => write!(f, "Loader has been destroyed"),
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NetError> for LoaderError {
    fn from(err: NetError) -> Self {
        Self::Fetch(err)
    }
}

/// A specialized Result type for loader internals.
pub type Result<T> = std::result::Result<T, LoaderError>;

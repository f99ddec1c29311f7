//! Error types for mirror operations.
//!
//! One structured error enum covers the whole fetch/filter/download cycle,
//! with enough context (URL, path) to point at the failing resource.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while mirroring a browse endpoint.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The configured browse URL is unusable (missing scheme or host).
    ///
    /// Raised during engine construction, before any network activity.
    #[error("invalid browse URL '{url}': {reason}")]
    InvalidBrowseUrl {
        /// The offending URL string from the settings file.
        url: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Network-level error (DNS resolution, connection refused, TLS, timeout).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error (directory creation, file write, directory listing).
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl MirrorError {
    /// Creates a browse-URL configuration error.
    pub fn invalid_browse_url(url: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidBrowseUrl {
            url: url.into(),
            reason,
        }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// No blanket `From<reqwest::Error>`/`From<std::io::Error>` impls: the variants
// require context (url, path) the source errors don't carry. The helper
// constructors keep call sites honest about providing it.

//! HTTP client wrapper for listing fetches and file downloads.
//!
//! One `reqwest` client serves the whole run: listing pages and file bodies
//! come from the same browse host, so connection pooling pays off.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use super::error::MirrorError;

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Read timeout in seconds. Logger files are small; this is generous.
const READ_TIMEOUT_SECS: u64 = 300;

/// HTTP client for listing fetches and file downloads.
///
/// Created once per run and reused for every request.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches a page body as text.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Network`] on transport failure or
    /// [`MirrorError::HttpStatus`] on a non-success response.
    pub(crate) async fn fetch_text(&self, url: &Url) -> Result<String, MirrorError> {
        let response = self.get_checked(url).await?;
        response
            .text()
            .await
            .map_err(|e| MirrorError::network(url.as_str(), e))
    }

    /// Downloads `url` and writes the full response body to `destination`.
    ///
    /// The body is held in memory and written in one binary write; there is
    /// no streaming, checksum, or content-length verification. Creates or
    /// truncates the destination file — the engine only calls this when the
    /// destination is absent, so truncation is reachable only if that check
    /// was bypassed.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Network`] or [`MirrorError::HttpStatus`] for
    /// the request, [`MirrorError::Io`] for the write.
    pub async fn download_to_file(
        &self,
        url: &Url,
        destination: &Path,
    ) -> Result<(), MirrorError> {
        info!(url = %url, "downloading");
        let response = self.get_checked(url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| MirrorError::network(url.as_str(), e))?;

        tokio::fs::write(destination, &body)
            .await
            .map_err(|e| MirrorError::io(destination.to_path_buf(), e))?;

        info!(path = %destination.display(), bytes = body.len(), "saved");
        Ok(())
    }

    async fn get_checked(&self, url: &Url) -> Result<reqwest::Response, MirrorError> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| MirrorError::network(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::http_status(url.as_str(), status.as_u16()));
        }
        Ok(response)
    }
}

fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("flexmirror/{version}")
}

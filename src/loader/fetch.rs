//! SVG download seam.
//!
//! `SvgFetch` is the one asynchronous suspension point of the mask. The
//! production implementation is a thin `reqwest` wrapper; tests substitute
//! in-memory fetchers.

#[cfg(test)]
#[path = "fetch_test.rs"]
mod fetch_test;

use async_trait::async_trait;

use crate::config::RuntimeConfig;
use crate::error::MaskError;

/// Fetches the text body of an SVG document.
#[async_trait]
pub trait SvgFetch: Send + Sync {
    /// Download `url` and return its body.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::FetchFailed`] for a non-success status and
    /// [`MaskError::FetchRequest`] for transport failures.
    async fn fetch_text(&self, url: &str) -> Result<String, MaskError>;
}

// =============================================================================
// HTTP FETCHER
// =============================================================================

/// `reqwest`-backed fetcher with request and connect timeouts.
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher using the timeouts in `runtime`.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::HttpClientBuild`] if the TLS backend fails to initialize.
    pub fn new(runtime: &RuntimeConfig) -> Result<Self, MaskError> {
        let http = reqwest::Client::builder()
            .timeout(runtime.fetch_timeout)
            .connect_timeout(runtime.connect_timeout)
            .build()
            .map_err(|e| MaskError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl SvgFetch for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, MaskError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| MaskError::FetchRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MaskError::FetchFailed { status: status.as_u16() });
        }

        response
            .text()
            .await
            .map_err(|e| MaskError::FetchRequest(e.to_string()))
    }
}

//! eve-scout wormhole directory client.
//!
//! The directory exposes a single endpoint: a bare `GET` returns every
//! current Thera connection, and `?systemSearch=<name>` narrows the list to
//! connections mentioning the searched system. Non-success statuses and
//! malformed payloads both surface as errors; callers decide whether that
//! means a failed refresh cycle or an unavailable query.

use reqwest::Client;

use crate::connection::WormholeConnection;
use crate::error::Result;
use crate::http::build_client;

/// Public eve-scout directory endpoint.
pub const DEFAULT_API_URL: &str = "https://www.eve-scout.com/api/wormholes";

/// Client for the wormhole connection directory.
#[derive(Debug, Clone)]
pub struct ScoutClient {
    http: Client,
    api_url: String,
}

impl ScoutClient {
    /// Client against the public directory endpoint.
    pub fn new() -> Result<Self> {
        Self::with_api_url(DEFAULT_API_URL)
    }

    /// Client against an alternate endpoint, used by tests and by
    /// deployments that proxy the directory.
    pub fn with_api_url(api_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: build_client()?,
            api_url: api_url.into(),
        })
    }

    /// Fetch the full connection directory.
    pub async fn all_connections(&self) -> Result<Vec<WormholeConnection>> {
        let response = self
            .http
            .get(&self.api_url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Fetch connections mentioning the searched system.
    ///
    /// The returned subset may still contain zero-jump artifacts; callers
    /// apply [`crate::query::discard_search_artifacts`] before use.
    pub async fn search(&self, system_name: &str) -> Result<Vec<WormholeConnection>> {
        let response = self
            .http
            .get(&self.api_url)
            .query(&[("systemSearch", system_name)])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

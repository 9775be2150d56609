//! Authenticated gate-route lookup.
//!
//! The route endpoint answers with the ordered intermediate systems between
//! two endpoints through normal space; the jump count is the length of that
//! sequence. It requires a bearer token, so availability follows the token
//! cache: no token, no gate comparison.

use reqwest::Client;

use crate::error::Result;
use crate::http::build_client;

/// Public route endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://esi.evetech.net/latest";

/// Injected system-name-to-id reference lookup.
///
/// The table itself is static reference data owned by the hosting
/// application; the planner only ever asks it for one name at a time.
pub trait SystemIds: Send + Sync {
    fn system_id(&self, name: &str) -> Option<u64>;
}

/// [`SystemIds`] backed by an in-memory map, keyed case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StaticSystemIds {
    ids: std::collections::HashMap<String, u64>,
}

impl StaticSystemIds {
    pub fn new(entries: impl IntoIterator<Item = (String, u64)>) -> Self {
        let ids = entries
            .into_iter()
            .map(|(name, id)| (name.to_lowercase(), id))
            .collect();
        Self { ids }
    }
}

impl SystemIds for StaticSystemIds {
    fn system_id(&self, name: &str) -> Option<u64> {
        self.ids.get(&name.to_lowercase()).copied()
    }
}

/// Client for the authenticated gate-route endpoint.
#[derive(Debug, Clone)]
pub struct EsiClient {
    http: Client,
    base_url: String,
}

impl EsiClient {
    /// Client against the public route endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against an alternate base URL, used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: build_client()?,
            base_url: base_url.into(),
        })
    }

    /// Jump count of the direct gate route between two system ids.
    pub async fn gate_route_jumps(
        &self,
        access_token: &str,
        source_id: u64,
        destination_id: u64,
    ) -> Result<u32> {
        let url = format!("{}/route/{}/{}", self.base_url, source_id, destination_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?;
        let systems: Vec<u64> = response.json().await?;
        Ok(systems.len() as u32)
    }
}

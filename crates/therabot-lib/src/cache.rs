//! Process-wide caches fed by the background refreshers.
//!
//! Each cache is single-writer (its refresher) and multi-reader. Readers
//! clone the whole snapshot under a read lock, so they observe either the
//! fully-previous or fully-current state, never a mix. Handles are cheaply
//! cloneable and share the underlying state.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::connection::WormholeConnection;

/// Point-in-time view of the connection directory.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSnapshot {
    pub connections: Vec<WormholeConnection>,
    /// Count of successful refreshes since process start.
    pub fetch_count: u64,
    pub last_fetch_succeeded: bool,
}

/// Shared cache of the most recently fetched connection directory.
#[derive(Debug, Clone, Default)]
pub struct ConnectionCache {
    inner: Arc<RwLock<ConnectionSnapshot>>,
}

impl ConnectionCache {
    /// Empty cache in the unknown state: no data, no successful fetch yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the current snapshot.
    pub async fn snapshot(&self) -> ConnectionSnapshot {
        self.inner.read().await.clone()
    }

    /// Replace the cached directory after a successful fetch.
    pub async fn record_success(&self, connections: Vec<WormholeConnection>) {
        let mut state = self.inner.write().await;
        state.connections = connections;
        state.fetch_count += 1;
        state.last_fetch_succeeded = true;
    }

    /// Drop the cached directory after a failed fetch.
    ///
    /// The fetch counter tracks successes only and is left untouched.
    pub async fn record_failure(&self) {
        let mut state = self.inner.write().await;
        state.connections.clear();
        state.last_fetch_succeeded = false;
    }

    /// Diagnostic counter of successful refreshes.
    pub async fn fetch_count(&self) -> u64 {
        self.inner.read().await.fetch_count
    }
}

/// Point-in-time view of the access-token state.
#[derive(Debug, Clone, Default)]
pub struct TokenSnapshot {
    /// Absent means the authenticated gate-route comparator is unavailable
    /// this cycle; dependent logic degrades rather than failing.
    pub access_token: Option<String>,
    pub fetch_count: u64,
}

/// Shared cache of the most recently obtained access token.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<TokenSnapshot>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the current snapshot.
    pub async fn snapshot(&self) -> TokenSnapshot {
        self.inner.read().await.clone()
    }

    /// The current access token, if the last exchange succeeded.
    pub async fn access_token(&self) -> Option<String> {
        self.inner.read().await.access_token.clone()
    }

    /// Store a fresh access token.
    pub async fn record_success(&self, access_token: String) {
        let mut state = self.inner.write().await;
        state.access_token = Some(access_token);
        state.fetch_count += 1;
    }

    /// Clear the token after a failed exchange.
    pub async fn record_failure(&self) {
        let mut state = self.inner.write().await;
        state.access_token = None;
    }

    /// Diagnostic counter of successful exchanges.
    pub async fn fetch_count(&self) -> u64 {
        self.inner.read().await.fetch_count
    }
}

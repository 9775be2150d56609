//! TheraBot core library.
//!
//! This crate holds the background data-refresh and route-computation engine
//! behind the TheraBot chat commands: the periodic pollers for the eve-scout
//! wormhole directory and the SSO access token, the in-memory caches they
//! populate, and the query/route operations served against those caches.
//! Higher-level consumers (the chat front-end, the CLI) should only depend
//! on the types exported here.

#![deny(warnings)]

pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod esi;
mod http;
pub mod query;
pub mod refresh;
pub mod route;
pub mod scout;
pub mod ship;
pub mod sso;

pub use cache::{ConnectionCache, ConnectionSnapshot, TokenCache, TokenSnapshot};
pub use config::Config;
pub use connection::{SolarSystem, WormholeConnection, WormholeSize};
pub use error::{Error, Result};
pub use esi::{EsiClient, StaticSystemIds, SystemIds};
pub use query::{closest_connection, list_connections, ConnectionListing};
pub use refresh::{ConnectionRefresher, PeriodicTask, RefreshSchedule, TokenRefresher};
pub use route::{compare_routes, RouteComparison, RouteDecision, RoutePlanner};
pub use scout::ScoutClient;
pub use ship::ShipClass;
pub use sso::{SsoClient, SsoCredentials};

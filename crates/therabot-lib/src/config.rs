//! Environment-driven configuration.
//!
//! Endpoints and cadences have production defaults; only the SSO credential
//! triple is deployment-specific, and even that is optional. Without it the
//! token refresher is simply never scheduled and route planning degrades to
//! the shortcut-only answer.

use std::env;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::esi;
use crate::scout;
use crate::sso::{self, SsoCredentials};

/// Default cadence of the wormhole directory poll.
pub const DEFAULT_CONNECTION_REFRESH: Duration = Duration::from_secs(10 * 60);

/// Default cadence of the access-token exchange.
pub const DEFAULT_TOKEN_REFRESH: Duration = Duration::from_secs(20 * 60);

const CONNECTION_REFRESH_ENV: &str = "THERABOT_CONNECTION_REFRESH_SECS";
const TOKEN_REFRESH_ENV: &str = "THERABOT_TOKEN_REFRESH_SECS";
const SCOUT_API_URL_ENV: &str = "THERABOT_SCOUT_API_URL";
const SSO_TOKEN_URL_ENV: &str = "THERABOT_SSO_TOKEN_URL";
const ESI_BASE_URL_ENV: &str = "THERABOT_ESI_BASE_URL";
const CLIENT_ID_ENV: &str = "ESI_CLIENT_ID";
const CLIENT_SECRET_ENV: &str = "ESI_SECRET_KEY";
const REFRESH_TOKEN_ENV: &str = "ESI_REFRESH_TOKEN";

/// Runtime configuration for the core.
#[derive(Debug, Clone)]
pub struct Config {
    pub scout_api_url: String,
    pub sso_token_url: String,
    pub esi_base_url: String,
    /// SSO credentials; `None` disables the token schedule entirely.
    pub sso_credentials: Option<SsoCredentials>,
    pub connection_refresh: Duration,
    pub token_refresh: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scout_api_url: scout::DEFAULT_API_URL.to_string(),
            sso_token_url: sso::DEFAULT_TOKEN_URL.to_string(),
            esi_base_url: esi::DEFAULT_BASE_URL.to_string(),
            sso_credentials: None,
            connection_refresh: DEFAULT_CONNECTION_REFRESH,
            token_refresh: DEFAULT_TOKEN_REFRESH,
        }
    }
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// The SSO triple (`ESI_CLIENT_ID`, `ESI_SECRET_KEY`,
    /// `ESI_REFRESH_TOKEN`) must be set together or not at all; a partial
    /// triple is a configuration mistake, not a degraded mode.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            scout_api_url: env::var(SCOUT_API_URL_ENV)
                .unwrap_or_else(|_| scout::DEFAULT_API_URL.to_string()),
            sso_token_url: env::var(SSO_TOKEN_URL_ENV)
                .unwrap_or_else(|_| sso::DEFAULT_TOKEN_URL.to_string()),
            esi_base_url: env::var(ESI_BASE_URL_ENV)
                .unwrap_or_else(|_| esi::DEFAULT_BASE_URL.to_string()),
            sso_credentials: credentials_from_values(
                env::var(CLIENT_ID_ENV).ok(),
                env::var(CLIENT_SECRET_ENV).ok(),
                env::var(REFRESH_TOKEN_ENV).ok(),
            )?,
            connection_refresh: refresh_from_value(
                CONNECTION_REFRESH_ENV,
                env::var(CONNECTION_REFRESH_ENV).ok(),
                DEFAULT_CONNECTION_REFRESH,
            )?,
            token_refresh: refresh_from_value(
                TOKEN_REFRESH_ENV,
                env::var(TOKEN_REFRESH_ENV).ok(),
                DEFAULT_TOKEN_REFRESH,
            )?,
        })
    }
}

fn refresh_from_value(name: &str, raw: Option<String>, default: Duration) -> Result<Duration> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| Error::InvalidEnv {
            name: name.to_string(),
            value: raw,
        })
}

fn credentials_from_values(
    client_id: Option<String>,
    client_secret: Option<String>,
    refresh_token: Option<String>,
) -> Result<Option<SsoCredentials>> {
    match (client_id, client_secret, refresh_token) {
        (Some(client_id), Some(client_secret), Some(refresh_token)) => Ok(Some(SsoCredentials {
            client_id,
            client_secret,
            refresh_token,
        })),
        (None, None, None) => Ok(None),
        (client_id, client_secret, _) => {
            let name = if client_id.is_none() {
                CLIENT_ID_ENV
            } else if client_secret.is_none() {
                CLIENT_SECRET_ENV
            } else {
                REFRESH_TOKEN_ENV
            };
            Err(Error::MissingEnv {
                name: name.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_value_defaults_when_unset() {
        let parsed = refresh_from_value("X", None, DEFAULT_CONNECTION_REFRESH).unwrap();
        assert_eq!(parsed, DEFAULT_CONNECTION_REFRESH);
    }

    #[test]
    fn refresh_value_parses_seconds() {
        let parsed =
            refresh_from_value("X", Some("90".to_string()), DEFAULT_CONNECTION_REFRESH).unwrap();
        assert_eq!(parsed, Duration::from_secs(90));
    }

    #[test]
    fn refresh_value_rejects_garbage() {
        let err = refresh_from_value("X", Some("soon".to_string()), DEFAULT_CONNECTION_REFRESH)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEnv { .. }));
    }

    #[test]
    fn credentials_require_the_full_triple() {
        let err = credentials_from_values(Some("id".into()), None, Some("token".into()))
            .unwrap_err();
        assert!(matches!(err, Error::MissingEnv { name } if name == CLIENT_SECRET_ENV));
    }

    #[test]
    fn credentials_absent_is_not_an_error() {
        assert!(credentials_from_values(None, None, None).unwrap().is_none());
    }
}

use thiserror::Error;

use crate::ship::ShipClass;

/// Convenient result alias for the TheraBot library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// An upstream fetch failed or returned a non-success status.
    #[error("wormhole data is unavailable: {reason}")]
    DataUnavailable { reason: String },

    /// A search yielded zero usable records after artifact filtering.
    #[error("no wormhole connection found for {system}")]
    NoConnectionFound { system: String },

    /// The ship-class filter eliminated every candidate at one or both endpoints.
    #[error("no wormhole connection is passable by a {ship_class}")]
    NoRouteForShipClass { ship_class: ShipClass },

    /// Capital hulls cannot pass any Thera connection.
    #[error("capital ships cannot pass through wormhole connections")]
    ShipTooLarge,

    /// A system name argument was empty or whitespace.
    #[error("system name must not be empty")]
    EmptySystemName,

    /// A required environment variable was not set.
    #[error("missing required environment variable {name}")]
    MissingEnv { name: String },

    /// An environment variable held a value that could not be parsed.
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidEnv { name: String, value: String },

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Fold any error from a searched-system fetch into the unavailable kind.
    ///
    /// The directory API returns no distinct "not found" signal, so the
    /// message hints at a possible spelling mistake.
    pub(crate) fn search_unavailable(err: &Error) -> Error {
        Error::DataUnavailable {
            reason: format!("{err}; did you spell the system name correctly?"),
        }
    }
}

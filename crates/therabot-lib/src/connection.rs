//! Typed model for eve-scout wormhole connection records.
//!
//! Records are parsed strictly at the HTTP boundary; a payload that does not
//! match this shape is a fetch failure, never a crash. Parsed records are
//! immutable and cloned into cache snapshots.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ship;

/// Generic signature tag meaning "this side's type is determined by the
/// other end of the hole".
pub const GENERIC_CONNECTOR: &str = "K162";

/// One directional Thera-network link as reported by the directory API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WormholeConnection {
    /// Signature id on the Thera side.
    pub signature_id: String,
    /// Signature id on the destination side.
    pub wormhole_destination_signature_id: String,
    pub source_wormhole_type: String,
    pub destination_wormhole_type: String,
    pub destination_solar_system: SolarSystem,
    /// Gate jumps between the destination system and the searched system.
    /// Zero is reserved for "the destination *is* the searched system".
    pub jumps: u32,
    /// Qualitative decay state, e.g. "stable" or "critical".
    pub wormhole_eol: String,
    /// Remaining-mass state, e.g. "stable" or "destab".
    pub wormhole_mass: String,
    /// Predicted collapse time; the directory omits it for fresh holes.
    #[serde(default)]
    pub wormhole_estimated_eol: Option<DateTime<Utc>>,
}

/// Destination system details nested inside a connection record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarSystem {
    pub name: String,
    pub security: f64,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub name: String,
}

/// Human-facing size classification of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WormholeSize {
    Freighter,
    Battleship,
    Cruiser,
}

impl WormholeSize {
    /// Classify a wormhole type tag by the largest hull it admits.
    pub fn classify(wormhole_type: &str) -> Self {
        if ship::freighter_passable(wormhole_type) {
            WormholeSize::Freighter
        } else if ship::battleship_passable(wormhole_type) {
            WormholeSize::Battleship
        } else {
            WormholeSize::Cruiser
        }
    }
}

impl fmt::Display for WormholeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WormholeSize::Freighter => "Large (Freighter)",
            WormholeSize::Battleship => "Large (Battleship)",
            WormholeSize::Cruiser => "Medium (Cruiser)",
        };
        f.write_str(label)
    }
}

impl WormholeConnection {
    /// Wormhole type tag used for size eligibility.
    ///
    /// A K162 destination tag carries no size information of its own, so the
    /// source side's tag applies instead.
    pub fn effective_wormhole_type(&self) -> &str {
        if self.destination_wormhole_type == GENERIC_CONNECTOR {
            &self.source_wormhole_type
        } else {
            &self.destination_wormhole_type
        }
    }

    /// Size classification derived from [`effective_wormhole_type`].
    ///
    /// [`effective_wormhole_type`]: WormholeConnection::effective_wormhole_type
    pub fn size(&self) -> WormholeSize {
        WormholeSize::classify(self.effective_wormhole_type())
    }

    /// Estimated remaining lifetime in whole hours, negative once stale.
    ///
    /// `None` when the directory did not report a collapse estimate.
    pub fn hours_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        let eol = self.wormhole_estimated_eol?;
        let seconds = (eol - now).num_seconds();
        Some((seconds as f64 / 3600.0).round() as i64)
    }
}

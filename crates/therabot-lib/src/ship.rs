//! Ship classes and wormhole passability.
//!
//! Thera holes come in three size tiers. The type tags below are the known
//! large-hole statics; anything else is medium and admits cruisers and
//! smaller hulls only.

use std::fmt;

/// Type tags passable by freighter-sized hulls.
pub const FREIGHTER_TYPES: [&str; 2] = ["E587", "L031"];

/// Type tags passable by battleship-sized (but not freighter-sized) hulls.
pub const BATTLESHIP_TYPES: [&str; 3] = ["V898", "F135", "M164"];

/// Whether a freighter fits through a hole of the given type.
pub fn freighter_passable(wormhole_type: &str) -> bool {
    FREIGHTER_TYPES.contains(&wormhole_type)
}

/// Whether a battleship fits through a hole of the given type.
///
/// Every freighter-passable hole also admits battleships.
pub fn battleship_passable(wormhole_type: &str) -> bool {
    BATTLESHIP_TYPES.contains(&wormhole_type) || freighter_passable(wormhole_type)
}

/// Recognized hull classes for route filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipClass {
    Frigate,
    Destroyer,
    Cruiser,
    Battlecruiser,
    Battleship,
    Freighter,
    Industrial,
    CapitalIndustrial,
    Capital,
}

/// Filter a hull class imposes on usable connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRestriction {
    /// Fits through any Thera hole.
    Unrestricted,
    /// Needs a battleship-passable hole.
    BattleshipOnly,
    /// Needs a freighter-passable hole.
    FreighterOnly,
    /// Fits through no Thera hole at all.
    Prohibited,
}

impl ShipClass {
    /// Parse a free-form user-supplied class name.
    ///
    /// Matching is case-insensitive and ignores separators, so
    /// "Capital Industrial" and "capital-industrial" both resolve. Empty or
    /// unrecognized input yields `None`, meaning no restriction applies.
    pub fn parse(input: &str) -> Option<Self> {
        let normalized: String = input
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "frigate" => Some(ShipClass::Frigate),
            "destroyer" => Some(ShipClass::Destroyer),
            "cruiser" => Some(ShipClass::Cruiser),
            "battlecruiser" => Some(ShipClass::Battlecruiser),
            "battleship" => Some(ShipClass::Battleship),
            "freighter" => Some(ShipClass::Freighter),
            "industrial" => Some(ShipClass::Industrial),
            "capitalindustrial" => Some(ShipClass::CapitalIndustrial),
            "capital" => Some(ShipClass::Capital),
            _ => None,
        }
    }

    /// Size restriction this hull imposes on connection selection.
    pub fn restriction(&self) -> SizeRestriction {
        match self {
            ShipClass::Frigate | ShipClass::Destroyer | ShipClass::Cruiser => {
                SizeRestriction::Unrestricted
            }
            ShipClass::Battlecruiser | ShipClass::Battleship => SizeRestriction::BattleshipOnly,
            ShipClass::Freighter | ShipClass::Industrial | ShipClass::CapitalIndustrial => {
                SizeRestriction::FreighterOnly
            }
            ShipClass::Capital => SizeRestriction::Prohibited,
        }
    }

    /// Whether a hull of this class fits through a hole of the given type.
    pub fn fits_through(&self, wormhole_type: &str) -> bool {
        match self.restriction() {
            SizeRestriction::Unrestricted => true,
            SizeRestriction::BattleshipOnly => battleship_passable(wormhole_type),
            SizeRestriction::FreighterOnly => freighter_passable(wormhole_type),
            SizeRestriction::Prohibited => false,
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShipClass::Frigate => "frigate",
            ShipClass::Destroyer => "destroyer",
            ShipClass::Cruiser => "cruiser",
            ShipClass::Battlecruiser => "battlecruiser",
            ShipClass::Battleship => "battleship",
            ShipClass::Freighter => "freighter",
            ShipClass::Industrial => "industrial",
            ShipClass::CapitalIndustrial => "capital industrial",
            ShipClass::Capital => "capital",
        };
        f.write_str(name)
    }
}

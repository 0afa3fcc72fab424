//! Tiles and Tile Identity
//!
//! A tile keeps its identifier from spawn until it is absorbed by a merge
//! or the game restarts. Identity is never derived from coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::EngineError;
use crate::core::rng::RandomSource;
use crate::game::board::Position;

// =============================================================================
// TILE ID
// =============================================================================

/// Unique tile identifier (UUID as bytes).
///
/// Ordered so tiles sort deterministically by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub [u8; 16]);

impl TileId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Generate a random (version 4) identifier from the given source.
    pub fn generate<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        Self(*uuid::Builder::from_random_bytes(bytes).as_uuid().as_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_bytes(self.0))
    }
}

// =============================================================================
// TILE
// =============================================================================

/// Smallest value a tile can carry.
pub const MIN_TILE_VALUE: u32 = 2;

/// Check that a value is a legal tile value (power of two, at least 2).
#[inline]
pub fn is_valid_tile_value(value: u32) -> bool {
    value >= MIN_TILE_VALUE && value.is_power_of_two()
}

/// A numbered tile resting on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Stable identifier
    pub id: TileId,
    /// Power of two, at least 2
    pub value: u32,
    /// Cell currently holding the tile
    pub position: Position,
}

impl Tile {
    /// Create a tile.
    pub fn new(id: TileId, value: u32, position: Position) -> Self {
        Self {
            id,
            value,
            position,
        }
    }

    /// Create a tile, rejecting values that are not powers of two of at least 2.
    pub fn checked(id: TileId, value: u32, position: Position) -> Result<Self, EngineError> {
        if !is_valid_tile_value(value) {
            return Err(EngineError::InvalidTileValue(value));
        }
        Ok(Self::new(id, value, position))
    }
}

// =============================================================================
// MOVEMENT RECORDS
// =============================================================================

/// What happened to a tile during a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileFate {
    /// Changed cell, value unchanged
    Slid,
    /// Survived a merge and now carries `value`
    Merged {
        /// Value after the merge
        value: u32,
    },
    /// Absorbed into `into`; the tile no longer exists
    Absorbed {
        /// Surviving tile
        into: TileId,
    },
}

/// One tile's change during a move.
///
/// Produced fresh for every move and handed to the caller; the game state
/// keeps no copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMovement {
    /// Tile identifier
    pub id: TileId,
    /// Value before the move
    pub value: u32,
    /// Cell before the move
    pub from: Position,
    /// Cell after the move (the survivor's cell for absorbed tiles)
    pub to: Position,
    /// Outcome for this tile
    pub fate: TileFate,
}

impl TileMovement {
    /// Whether this tile was merged away.
    #[inline]
    pub fn is_absorbed(&self) -> bool {
        matches!(self.fate, TileFate::Absorbed { .. })
    }

    /// Animation state for this tile while the move plays out.
    pub fn in_transit(&self) -> TileState {
        TileState::InTransit {
            id: self.id,
            value: self.value,
            from: self.from,
            to: self.to,
        }
    }
}

/// Presentation state of a tile.
///
/// A resting tile has no destination and a moving tile has no single
/// position, so the two cases are separate variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TileState {
    /// Tile sitting in a cell
    AtRest {
        /// Tile identifier
        id: TileId,
        /// Current value
        value: u32,
        /// Cell holding the tile
        position: Position,
    },
    /// Tile sliding between cells
    InTransit {
        /// Tile identifier
        id: TileId,
        /// Value carried while moving
        value: u32,
        /// Start cell
        from: Position,
        /// End cell
        to: Position,
    },
}

impl TileState {
    /// Identifier of the tile.
    pub fn id(&self) -> TileId {
        match self {
            TileState::AtRest { id, .. } | TileState::InTransit { id, .. } => *id,
        }
    }

    /// Whether the tile is moving.
    pub fn is_moving(&self) -> bool {
        matches!(self, TileState::InTransit { .. })
    }
}

impl From<Tile> for TileState {
    fn from(tile: Tile) -> Self {
        TileState::AtRest {
            id: tile.id,
            value: tile.value,
            position: tile.position,
        }
    }
}

//! Engine Errors
//!
//! Every fault the engine can report. A move that changes nothing is not
//! an error; it shows up as `moved == false` on the move report.

use crate::game::board::Position;
use crate::game::tile::TileId;

/// Broad class of an [`EngineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed something the engine cannot accept.
    InvalidArgument,
    /// An engine invariant does not hold.
    InvalidState,
}

/// Engine errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Direction text or index not recognized.
    #[error("Unknown direction: {0}")]
    UnknownDirection(String),

    /// Grid must be at least 2x2.
    #[error("Invalid grid size {0}: must be at least 2")]
    InvalidGridSize(usize),

    /// Win threshold must be a power of two greater than the smallest tile.
    #[error("Invalid win threshold {0}: must be a power of two of at least 4")]
    InvalidWinThreshold(u32),

    /// Spawn table is empty, has zero total weight, or lists a bad value.
    #[error("Invalid spawn table: {0}")]
    InvalidSpawnTable(String),

    /// Environment configuration could not be parsed.
    #[error("Invalid config value for {key}: {value:?}")]
    InvalidConfig {
        /// Environment variable name.
        key: &'static str,
        /// Raw value found.
        value: String,
    },

    /// Board cell count does not match its declared or configured size.
    #[error("Board shape mismatch: expected {expected} cells, got {actual}")]
    BoardSizeMismatch {
        /// Cell count implied by the grid size.
        expected: usize,
        /// Cells actually stored.
        actual: usize,
    },

    /// Position lies outside the grid.
    #[error("Position {position} is outside a {size}x{size} grid")]
    OutOfBounds {
        /// Offending position.
        position: Position,
        /// Grid size.
        size: usize,
    },

    /// Cell already holds a tile.
    #[error("Cell {0} is already occupied")]
    CellOccupied(Position),

    /// Spawn requested with no empty cell.
    #[error("Board is full: no empty cell to spawn into")]
    BoardFull,

    /// Two tiles share an identifier.
    #[error("Duplicate tile id {0}")]
    DuplicateTileId(TileId),

    /// A tile's recorded position disagrees with the cell holding it.
    #[error("Tile {id} records position {recorded} but sits at {cell}")]
    PositionMismatch {
        /// Tile identifier.
        id: TileId,
        /// Position stored on the tile.
        recorded: Position,
        /// Cell that holds the tile.
        cell: Position,
    },

    /// Tile value is not a power of two of at least 2.
    #[error("Invalid tile value {0}: must be a power of two of at least 2")]
    InvalidTileValue(u32),
}

impl EngineError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::UnknownDirection(_)
            | EngineError::InvalidGridSize(_)
            | EngineError::InvalidWinThreshold(_)
            | EngineError::InvalidSpawnTable(_)
            | EngineError::InvalidConfig { .. }
            | EngineError::BoardSizeMismatch { .. }
            | EngineError::OutOfBounds { .. } => ErrorKind::InvalidArgument,
            EngineError::CellOccupied(_)
            | EngineError::BoardFull
            | EngineError::DuplicateTileId(_)
            | EngineError::PositionMismatch { .. }
            | EngineError::InvalidTileValue(_) => ErrorKind::InvalidState,
        }
    }
}

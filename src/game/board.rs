//! Board, Positions and Directions
//!
//! The board is an N×N grid stored row-major. Each cell holds at most one
//! tile, and a tile's recorded position always equals its cell.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::EngineError;
use crate::game::tile::{is_valid_tile_value, Tile, TileId};

/// Smallest playable grid.
pub const MIN_GRID_SIZE: usize = 2;

// =============================================================================
// POSITION
// =============================================================================

/// Cell coordinates, 0-indexed. `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
}

impl Position {
    /// Create a position.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// Direction of travel for a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Direction {
    /// Toward y = 0
    Up = 0,
    /// Toward y = N-1
    Down = 1,
    /// Toward x = 0
    Left = 2,
    /// Toward x = N-1
    Right = 3,
}

impl Direction {
    /// All directions, in index order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Get direction from index (0-3).
    pub fn from_index(index: u8) -> Result<Direction, EngineError> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| EngineError::UnknownDirection(index.to_string()))
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Cell at step `index` along line `lane`, counted from the front of travel.
    ///
    /// For left/right a lane is a row; for up/down it is a column. Index 0
    /// is the cell tiles slide toward.
    #[inline]
    pub fn line_position(self, size: usize, lane: usize, index: usize) -> Position {
        match self {
            Direction::Left => Position::new(index, lane),
            Direction::Right => Position::new(size - 1 - index, lane),
            Direction::Up => Position::new(lane, index),
            Direction::Down => Position::new(lane, size - 1 - index),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(EngineError::UnknownDirection(s.to_string())),
        }
    }
}

// =============================================================================
// BOARD
// =============================================================================

/// Square grid of optional tiles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Tile>>,
}

impl Board {
    /// Create an empty board.
    pub fn new(size: usize) -> Result<Self, EngineError> {
        if size < MIN_GRID_SIZE {
            return Err(EngineError::InvalidGridSize(size));
        }
        let cell_count = size.checked_mul(size).ok_or(EngineError::InvalidGridSize(size))?;
        Ok(Self {
            size,
            cells: vec![None; cell_count],
        })
    }

    /// Build a board from tiles, checking every invariant.
    pub fn from_tiles(size: usize, tiles: impl IntoIterator<Item = Tile>) -> Result<Self, EngineError> {
        let mut board = Self::new(size)?;
        for tile in tiles {
            board.place(tile)?;
        }
        Ok(board)
    }

    /// Grid size N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, position: Position) -> Option<usize> {
        if position.x < self.size && position.y < self.size {
            Some(position.y * self.size + position.x)
        } else {
            None
        }
    }

    fn checked_index(&self, position: Position) -> Result<usize, EngineError> {
        self.index(position).ok_or(EngineError::OutOfBounds {
            position,
            size: self.size,
        })
    }

    /// Tile at a position, if any. Out-of-range positions are empty.
    #[inline]
    pub fn get(&self, position: Position) -> Option<&Tile> {
        self.index(position).and_then(|i| self.cells[i].as_ref())
    }

    /// Check whether a cell is empty.
    pub fn is_empty_at(&self, position: Position) -> bool {
        self.get(position).is_none()
    }

    /// Place a tile at its recorded position.
    pub fn place(&mut self, tile: Tile) -> Result<(), EngineError> {
        let index = self.checked_index(tile.position)?;
        if !is_valid_tile_value(tile.value) {
            return Err(EngineError::InvalidTileValue(tile.value));
        }
        if self.cells[index].is_some() {
            return Err(EngineError::CellOccupied(tile.position));
        }
        if self.contains_id(tile.id) {
            return Err(EngineError::DuplicateTileId(tile.id));
        }
        self.cells[index] = Some(tile);
        Ok(())
    }

    /// Write a tile into its cell without the occupancy and id checks.
    ///
    /// Only for the engine, which rebuilds a fresh board from tiles of an
    /// already valid one.
    pub(crate) fn put(&mut self, tile: Tile) {
        let index = tile.position.y * self.size + tile.position.x;
        debug_assert!(self.cells[index].is_none(), "cell {} written twice", tile.position);
        self.cells[index] = Some(tile);
    }

    /// Remove and return the tile at a position.
    pub fn remove(&mut self, position: Position) -> Result<Option<Tile>, EngineError> {
        let index = self.checked_index(position)?;
        Ok(self.cells[index].take())
    }

    /// Remove every tile.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    /// Iterate tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.cells.iter().flatten()
    }

    /// Look up a tile by identifier.
    pub fn find(&self, id: TileId) -> Option<&Tile> {
        self.tiles().find(|t| t.id == id)
    }

    /// Check whether any tile carries this identifier.
    pub fn contains_id(&self, id: TileId) -> bool {
        self.find(id).is_some()
    }

    /// Number of tiles on the board.
    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Empty cells in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| Position::new(i % self.size, i / self.size))
            .collect()
    }

    /// Check whether at least one cell is empty.
    pub fn has_empty_cell(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    /// Sum of all tile values.
    pub fn value_sum(&self) -> u64 {
        self.tiles().map(|t| t.value as u64).sum()
    }

    /// Highest tile value, 0 on an empty board.
    pub fn max_value(&self) -> u32 {
        self.tiles().map(|t| t.value).max().unwrap_or(0)
    }

    /// Rows of optional tiles, top row first.
    pub fn rows(&self) -> Vec<Vec<Option<Tile>>> {
        self.cells.chunks(self.size).map(<[_]>::to_vec).collect()
    }

    /// Check every board invariant.
    ///
    /// Boards built through [`Board::place`] always pass; a board that
    /// arrived through deserialization might not.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.size < MIN_GRID_SIZE {
            return Err(EngineError::InvalidGridSize(self.size));
        }
        let expected_cells = self
            .size
            .checked_mul(self.size)
            .ok_or(EngineError::InvalidGridSize(self.size))?;
        if self.cells.len() != expected_cells {
            return Err(EngineError::BoardSizeMismatch {
                expected: expected_cells,
                actual: self.cells.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for (i, cell) in self.cells.iter().enumerate() {
            let Some(tile) = cell else { continue };
            let cell_pos = Position::new(i % self.size, i / self.size);
            if tile.position != cell_pos {
                return Err(EngineError::PositionMismatch {
                    id: tile.id,
                    recorded: tile.position,
                    cell: cell_pos,
                });
            }
            if !is_valid_tile_value(tile.value) {
                return Err(EngineError::InvalidTileValue(tile.value));
            }
            if !seen.insert(tile.id) {
                return Err(EngineError::DuplicateTileId(tile.id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(n: u8, value: u32, x: usize, y: usize) -> Tile {
        Tile::new(TileId::new([n; 16]), value, Position::new(x, y))
    }

    #[test]
    fn test_board_rejects_tiny_grid() {
        assert_eq!(Board::new(0), Err(EngineError::InvalidGridSize(0)));
        assert_eq!(Board::new(1), Err(EngineError::InvalidGridSize(1)));
        assert!(Board::new(2).is_ok());
    }

    #[test]
    fn test_place_and_get() {
        let mut board = Board::new(4).unwrap();
        board.place(tile(1, 2, 3, 1)).unwrap();

        assert_eq!(board.get(Position::new(3, 1)).map(|t| t.value), Some(2));
        assert!(board.is_empty_at(Position::new(1, 3)));
        assert_eq!(board.tile_count(), 1);
        assert_eq!(board.empty_positions().len(), 15);
        assert!(board.contains_id(TileId::new([1; 16])));
    }

    #[test]
    fn test_place_rejects_bad_tiles() {
        let mut board = Board::new(4).unwrap();
        board.place(tile(1, 2, 0, 0)).unwrap();

        assert_eq!(
            board.place(tile(2, 2, 0, 0)),
            Err(EngineError::CellOccupied(Position::new(0, 0)))
        );
        assert_eq!(
            board.place(tile(1, 4, 1, 0)),
            Err(EngineError::DuplicateTileId(TileId::new([1; 16])))
        );
        assert_eq!(
            board.place(tile(3, 4, 4, 0)),
            Err(EngineError::OutOfBounds {
                position: Position::new(4, 0),
                size: 4
            })
        );
        assert_eq!(board.place(tile(4, 5, 2, 2)), Err(EngineError::InvalidTileValue(5)));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut board = Board::from_tiles(3, [tile(1, 2, 0, 0), tile(2, 4, 2, 2)]).unwrap();

        let removed = board.remove(Position::new(0, 0)).unwrap();
        assert_eq!(removed.map(|t| t.value), Some(2));
        assert_eq!(board.remove(Position::new(0, 0)).unwrap(), None);

        board.clear();
        assert_eq!(board.tile_count(), 0);
        assert_eq!(board.max_value(), 0);
    }

    #[test]
    fn test_empty_positions_row_major() {
        let board = Board::from_tiles(2, [tile(1, 2, 0, 0), tile(2, 2, 1, 1)]).unwrap();
        assert_eq!(
            board.empty_positions(),
            vec![Position::new(1, 0), Position::new(0, 1)]
        );
        assert!(board.has_empty_cell());
    }

    #[test]
    fn test_value_sum_and_max() {
        let board = Board::from_tiles(4, [tile(1, 2, 0, 0), tile(2, 8, 1, 0), tile(3, 4, 0, 3)]).unwrap();
        assert_eq!(board.value_sum(), 14);
        assert_eq!(board.max_value(), 8);
    }

    #[test]
    fn test_rows_layout() {
        let board = Board::from_tiles(2, [tile(1, 2, 1, 0)]).unwrap();
        let rows = board.rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[0][0].is_none());
        assert_eq!(rows[0][1].map(|t| t.value), Some(2));
        assert!(rows[1].iter().all(Option::is_none));
    }

    #[test]
    fn test_validate_catches_malformed_boards() {
        let good = Board::from_tiles(2, [tile(1, 2, 0, 0), tile(2, 2, 1, 0)]).unwrap();
        assert_eq!(good.validate(), Ok(()));

        let mut duplicate = good.clone();
        duplicate.cells[3] = Some(tile(1, 2, 1, 1));
        assert_eq!(
            duplicate.validate(),
            Err(EngineError::DuplicateTileId(TileId::new([1; 16])))
        );

        let mut misplaced = good.clone();
        misplaced.cells[2] = Some(tile(3, 2, 1, 1));
        assert!(matches!(
            misplaced.validate(),
            Err(EngineError::PositionMismatch { .. })
        ));

        let mut wrong_shape = good;
        wrong_shape.cells.truncate(3);
        assert!(matches!(
            wrong_shape.validate(),
            Err(EngineError::BoardSizeMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_oversized_grid_is_an_error() {
        let huge = 1usize << (usize::BITS / 2);
        assert_eq!(Board::new(huge), Err(EngineError::InvalidGridSize(huge)));

        let json = format!(r#"{{"size":{huge},"cells":[]}}"#);
        let board: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board.validate(), Err(EngineError::InvalidGridSize(huge)));

        let short: Board = serde_json::from_str(r#"{"size":1000,"cells":[]}"#).unwrap();
        assert_eq!(
            short.validate(),
            Err(EngineError::BoardSizeMismatch {
                expected: 1_000_000,
                actual: 0
            })
        );
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("up".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!(" Left ".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!("RIGHT".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!(
            "north".parse::<Direction>(),
            Err(EngineError::UnknownDirection("north".to_string()))
        );

        assert_eq!(Direction::from_index(1), Ok(Direction::Down));
        assert_eq!(
            Direction::from_index(4),
            Err(EngineError::UnknownDirection("4".to_string()))
        );
        for dir in Direction::ALL {
            assert_eq!(Direction::from_index(dir as u8), Ok(dir));
            assert_eq!(dir.to_string().parse::<Direction>(), Ok(dir));
        }
    }

    #[test]
    fn test_line_positions() {
        // Front of travel is index 0
        assert_eq!(Direction::Left.line_position(4, 1, 0), Position::new(0, 1));
        assert_eq!(Direction::Right.line_position(4, 1, 0), Position::new(3, 1));
        assert_eq!(Direction::Up.line_position(4, 2, 3), Position::new(2, 3));
        assert_eq!(Direction::Down.line_position(4, 2, 3), Position::new(2, 0));
    }
}

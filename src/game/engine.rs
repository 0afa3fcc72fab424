//! Grid Engine
//!
//! Applies a direction to a whole board by cutting it into lines in the
//! direction of travel, reducing each line, and writing the results into a
//! fresh board. The input board is never touched, so a caller never sees a
//! half-shifted grid.

use serde::{Deserialize, Serialize};
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::error::EngineError;
use crate::game::board::{Board, Direction, Position};
use crate::game::line::{reduce_line, LineTile};
use crate::game::tile::{Tile, TileMovement};

/// Result of shifting a board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftResult {
    /// Board after slide and merge, before any spawn
    pub board: Board,
    /// Sum of values created by merges
    pub score_delta: u32,
    /// Per-tile changes in board coordinates
    pub movements: Vec<TileMovement>,
    /// Whether any line changed
    pub any_changed: bool,
}

/// Shift every tile on the board in `direction`.
///
/// Fails on a malformed board (wrong shape, duplicate ids, misplaced tiles
/// or bad values).
pub fn shift(board: &Board, direction: Direction) -> Result<ShiftResult, EngineError> {
    board.validate()?;

    let size = board.size();
    let mut next = Board::new(size)?;
    let mut movements = Vec::new();
    let mut score_delta: u32 = 0;
    let mut any_changed = false;

    let mut line = Vec::with_capacity(size);
    for lane in 0..size {
        line.clear();
        line.extend((0..size).map(|index| {
            board
                .get(direction.line_position(size, lane, index))
                .map(|t| LineTile::new(t.id, t.value))
        }));

        let reduction = reduce_line(&line);

        #[cfg(feature = "debug-tracing")]
        trace!(
            %direction,
            lane,
            changed = reduction.changed,
            score_delta = reduction.score_delta,
            "reduced line"
        );

        for (index, cell) in reduction.cells.iter().enumerate() {
            if let Some(t) = cell {
                let position = direction.line_position(size, lane, index);
                next.put(Tile::new(t.id, t.value, position));
            }
        }

        movements.extend(reduction.steps.iter().map(|step| TileMovement {
            id: step.id,
            value: step.value,
            from: direction.line_position(size, lane, step.from),
            to: direction.line_position(size, lane, step.to),
            fate: step.fate,
        }));

        score_delta = score_delta.saturating_add(reduction.score_delta);
        any_changed |= reduction.changed;
    }

    Ok(ShiftResult {
        board: next,
        score_delta,
        movements,
        any_changed,
    })
}

/// Check whether shifting in `direction` would change the board.
pub fn can_shift(board: &Board, direction: Direction) -> Result<bool, EngineError> {
    board.validate()?;

    let size = board.size();
    for lane in 0..size {
        let mut previous: Option<u32> = None;
        let mut seen_gap = false;
        for index in 0..size {
            match board.get(direction.line_position(size, lane, index)) {
                None => seen_gap = true,
                Some(tile) => {
                    // A tile behind a gap can slide; equal neighbours can merge
                    if seen_gap || previous == Some(tile.value) {
                        return Ok(true);
                    }
                    previous = Some(tile.value);
                }
            }
        }
    }
    Ok(false)
}

/// Directions that would change the board.
pub fn available_directions(board: &Board) -> Result<Vec<Direction>, EngineError> {
    let mut available = Vec::with_capacity(Direction::ALL.len());
    for direction in Direction::ALL {
        if can_shift(board, direction)? {
            available.push(direction);
        }
    }
    Ok(available)
}

/// Check whether the board is stuck: full and no direction changes it.
pub fn is_stuck(board: &Board) -> Result<bool, EngineError> {
    if board.has_empty_cell() {
        return Ok(false);
    }
    Ok(available_directions(board)?.is_empty())
}

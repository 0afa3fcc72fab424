//! Line Reduction
//!
//! Slide and merge for a single row or column. The line is already ordered
//! in the direction of travel, so index 0 is always the front.
//!
//! Rules:
//! - Tiles compact toward the front and keep their relative order.
//! - Two adjacent tiles of equal value merge; the front tile doubles and
//!   keeps its id, the rear tile is absorbed.
//! - A tile merges at most once per move. Scanning resumes after a merged
//!   pair, so `2,2,2` becomes `4,2`.

use serde::{Deserialize, Serialize};

use crate::game::tile::{TileFate, TileId};

/// A tile as seen by the reducer: identity and value, no coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTile {
    /// Tile identifier
    pub id: TileId,
    /// Tile value
    pub value: u32,
}

impl LineTile {
    /// Create a line tile.
    pub fn new(id: TileId, value: u32) -> Self {
        Self { id, value }
    }
}

/// One tile's change within a line, in line indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineStep {
    /// Tile identifier
    pub id: TileId,
    /// Value before the reduction
    pub value: u32,
    /// Index before the reduction
    pub from: usize,
    /// Index after the reduction
    pub to: usize,
    /// Outcome for this tile
    pub fate: TileFate,
}

/// Result of reducing one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineReduction {
    /// New cells, same length as the input
    pub cells: Vec<Option<LineTile>>,
    /// Sum of values created by merges
    pub score_delta: u32,
    /// Tiles that moved, merged, or were absorbed
    pub steps: Vec<LineStep>,
    /// Whether any tile changed index or value
    pub changed: bool,
}

impl LineReduction {
    /// Number of merges performed.
    pub fn merge_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.fate, TileFate::Absorbed { .. }))
            .count()
    }
}

/// Slide and merge one line toward index 0.
pub fn reduce_line(line: &[Option<LineTile>]) -> LineReduction {
    let packed: Vec<(usize, LineTile)> = line
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| cell.map(|t| (i, t)))
        .collect();

    let mut cells = vec![None; line.len()];
    let mut steps = Vec::new();
    let mut score_delta: u32 = 0;

    let mut dest = 0;
    let mut i = 0;
    while i < packed.len() {
        let (from, front) = packed[i];

        match packed.get(i + 1) {
            Some(&(rear_from, rear)) if rear.value == front.value => {
                let merged = LineTile::new(front.id, front.value.saturating_mul(2));
                score_delta = score_delta.saturating_add(merged.value);
                cells[dest] = Some(merged);

                steps.push(LineStep {
                    id: front.id,
                    value: front.value,
                    from,
                    to: dest,
                    fate: TileFate::Merged { value: merged.value },
                });
                steps.push(LineStep {
                    id: rear.id,
                    value: rear.value,
                    from: rear_from,
                    to: dest,
                    fate: TileFate::Absorbed { into: front.id },
                });

                // Both tiles are spent for this move
                i += 2;
            }
            _ => {
                cells[dest] = Some(front);
                if from != dest {
                    steps.push(LineStep {
                        id: front.id,
                        value: front.value,
                        from,
                        to: dest,
                        fate: TileFate::Slid,
                    });
                }
                i += 1;
            }
        }

        dest += 1;
    }

    LineReduction {
        changed: !steps.is_empty(),
        cells,
        score_delta,
        steps,
    }
}

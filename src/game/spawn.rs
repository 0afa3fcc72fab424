//! Tile Spawning
//!
//! Picks an empty cell uniformly at random and draws a value from a
//! weighted table (by default 2 at 90%, 4 at 10%).

use serde::{Deserialize, Serialize};

use crate::core::error::EngineError;
use crate::core::rng::{choose, RandomSource};
use crate::game::board::Board;
use crate::game::tile::{is_valid_tile_value, Tile, TileId};

/// One entry of the spawn value table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnWeight {
    /// Tile value
    pub value: u32,
    /// Relative weight
    pub weight: u32,
}

impl SpawnWeight {
    /// Create a table entry.
    pub const fn new(value: u32, weight: u32) -> Self {
        Self { value, weight }
    }
}

/// Configuration for tile spawning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Weighted value table
    pub weights: Vec<SpawnWeight>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self::with_four_percent(10)
    }
}

impl SpawnConfig {
    /// Twos and fours, with `percent` chance of a four.
    pub fn with_four_percent(percent: u32) -> Self {
        Self {
            weights: vec![
                SpawnWeight::new(2, 100u32.saturating_sub(percent)),
                SpawnWeight::new(4, percent.min(100)),
            ],
        }
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.weights.iter().map(|w| w.weight as u64).sum()
    }

    /// Check the table is usable.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.weights.is_empty() {
            return Err(EngineError::InvalidSpawnTable("no entries".into()));
        }
        if let Some(bad) = self.weights.iter().find(|w| !is_valid_tile_value(w.value)) {
            return Err(EngineError::InvalidSpawnTable(format!(
                "value {} is not a power of two of at least 2",
                bad.value
            )));
        }
        let total = self.total_weight();
        if total == 0 {
            return Err(EngineError::InvalidSpawnTable("total weight is zero".into()));
        }
        if total > u32::MAX as u64 {
            return Err(EngineError::InvalidSpawnTable(format!(
                "total weight {} overflows",
                total
            )));
        }
        Ok(())
    }
}

/// Draw a tile value from the weighted table.
pub fn random_tile_value<R: RandomSource + ?Sized>(config: &SpawnConfig, rng: &mut R) -> Result<u32, EngineError> {
    config.validate()?;

    let mut roll = rng.next_int(config.total_weight() as u32);
    for entry in &config.weights {
        if roll < entry.weight {
            return Ok(entry.value);
        }
        roll -= entry.weight;
    }
    // validate() guarantees the roll lands inside the table
    Err(EngineError::InvalidSpawnTable("roll outside table".into()))
}

/// Create a new tile on a random empty cell.
///
/// The tile is returned, not placed; the caller decides when to put it on
/// the board. Fails with [`EngineError::BoardFull`] when no cell is free.
pub fn spawn_tile<R: RandomSource + ?Sized>(
    board: &Board,
    config: &SpawnConfig,
    rng: &mut R,
) -> Result<Tile, EngineError> {
    let empty = board.empty_positions();
    let position = *choose(rng, &empty).ok_or(EngineError::BoardFull)?;
    let value = random_tile_value(config, rng)?;

    // Random ids colliding is astronomically unlikely, but ids must be unique
    let mut id = TileId::generate(rng);
    while board.contains_id(id) {
        id = TileId::generate(rng);
    }

    Ok(Tile::new(id, value, position))
}

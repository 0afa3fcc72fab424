//! Deterministic Replay
//!
//! Rebuilds a session from its seed and the directions played. Two replays
//! of the same input end in the same state hash.

use crate::core::error::EngineError;
use crate::game::board::Direction;
use crate::game::state::{GameConfig, GameState, MoveReport};

/// Replay a game from recorded directions.
///
/// Stops early once the game reaches a terminal status. Returns the final
/// state and one report per direction actually processed.
pub fn replay_moves(
    config: GameConfig,
    rng_seed: u64,
    directions: &[Direction],
) -> Result<(GameState, Vec<MoveReport>), EngineError> {
    let mut state = GameState::new(config, rng_seed)?;
    let mut reports = Vec::with_capacity(directions.len());

    for &direction in directions {
        let report = state.apply_move(direction)?;
        let finished = report.status.is_terminal();
        reports.push(report);

        if finished {
            break;
        }
    }

    Ok((state, reports))
}

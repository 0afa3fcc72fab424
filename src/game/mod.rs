//! Game Logic Module
//!
//! All rule logic. Deterministic given a seed.
//!
//! ## Module Structure
//!
//! - `tile`: Tile identity, movement records, animation states
//! - `board`: Grid storage, positions, directions
//! - `line`: Slide and merge for one line
//! - `engine`: Whole-board shifts built on `line`
//! - `spawn`: Random tile placement
//! - `state`: Game session, scoring, terminal status
//! - `replay`: Rebuild a session from seed and directions

pub mod board;
pub mod engine;
pub mod line;
pub mod replay;
pub mod spawn;
pub mod state;
pub mod tile;

// Re-export key types
pub use board::{Board, Direction, Position};
pub use engine::{can_shift, shift, ShiftResult};
pub use line::{reduce_line, LineReduction, LineTile};
pub use replay::replay_moves;
pub use spawn::{spawn_tile, SpawnConfig, SpawnWeight};
pub use state::{GameConfig, GameSnapshot, GameState, GameStatus, MoveReport};
pub use tile::{Tile, TileFate, TileId, TileMovement, TileState};

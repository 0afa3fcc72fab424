//! # Slide Merge
//!
//! Rule engine for sliding-tile merge puzzles in the style of 2048.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SLIDE MERGE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Seeded Xorshift128+ and RandomSource      │
//! │  ├── hash.rs     - State hashing for replay checks           │
//! │  └── error.rs    - EngineError                               │
//! │                                                              │
//! │  game/           - Rules                                     │
//! │  ├── tile.rs     - Tile ids, movement records                │
//! │  ├── board.rs    - N×N grid, positions, directions           │
//! │  ├── line.rs     - Slide and merge for one line              │
//! │  ├── engine.rs   - Whole-board shift                         │
//! │  ├── spawn.rs    - Random tile placement                     │
//! │  ├── state.rs    - Session: score, best, status              │
//! │  └── replay.rs   - Rebuild a session from its inputs         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! Given the same seed and the same directions, a session produces the
//! same tiles, ids, scores and state hash. All randomness flows through
//! [`crate::core::rng::RandomSource`]; nothing reads a global generator.
//!
//! ## Example
//!
//! ```
//! use slide_merge::{Direction, GameConfig, GameState};
//!
//! let mut game = GameState::new(GameConfig::default(), 7).unwrap();
//! let report = game.apply_move(Direction::Left).unwrap();
//! if report.moved {
//!     assert!(report.spawned.is_some());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::error::{EngineError, ErrorKind};
pub use crate::core::rng::{DeterministicRng, RandomSource};
pub use game::board::{Board, Direction, Position};
pub use game::state::{GameConfig, GameSnapshot, GameState, GameStatus, MoveReport};
pub use game::tile::{Tile, TileFate, TileId, TileMovement, TileState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default grid size N
pub const DEFAULT_GRID_SIZE: usize = 4;

/// Default winning tile value
pub const DEFAULT_WIN_THRESHOLD: u32 = 2048;

//! Game State
//!
//! Owns the authoritative board, score and status, and sequences each move:
//! shift, score, spawn, then terminal check.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::error::EngineError;
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::game::board::{Board, Direction, MIN_GRID_SIZE};
use crate::game::engine::{available_directions, is_stuck, shift};
use crate::game::spawn::{spawn_tile, SpawnConfig};
use crate::game::tile::{Tile, TileMovement, TileState, MIN_TILE_VALUE};
use crate::{DEFAULT_GRID_SIZE, DEFAULT_WIN_THRESHOLD};

/// Tiles placed by a new game.
const INITIAL_TILES: usize = 2;

// =============================================================================
// CONFIG
// =============================================================================

/// Configuration for a game session. Fixed once the session exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Grid size N
    pub grid_size: usize,
    /// Tile value that wins the game
    pub win_threshold: u32,
    /// Spawn value table
    pub spawn: SpawnConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            win_threshold: DEFAULT_WIN_THRESHOLD,
            spawn: SpawnConfig::default(),
        }
    }
}

impl GameConfig {
    /// Create config from environment variables.
    ///
    /// - `SLIDE_MERGE_GRID_SIZE`
    /// - `SLIDE_MERGE_WIN_THRESHOLD`
    /// - `SLIDE_MERGE_FOUR_PERCENT`
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, EngineError> {
        let mut config = Self::default();
        if let Some(size) = env_value::<usize>("SLIDE_MERGE_GRID_SIZE")? {
            config.grid_size = size;
        }
        if let Some(threshold) = env_value::<u32>("SLIDE_MERGE_WIN_THRESHOLD")? {
            config.win_threshold = threshold;
        }
        if let Some(percent) = env_value::<u32>("SLIDE_MERGE_FOUR_PERCENT")? {
            if percent > 100 {
                warn!(percent, "SLIDE_MERGE_FOUR_PERCENT above 100");
                return Err(EngineError::InvalidConfig {
                    key: "SLIDE_MERGE_FOUR_PERCENT",
                    value: percent.to_string(),
                });
            }
            config.spawn = SpawnConfig::with_four_percent(percent);
        }
        config.validate()?;
        Ok(config)
    }

    /// Check every option.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(EngineError::InvalidGridSize(self.grid_size));
        }
        if !self.win_threshold.is_power_of_two() || self.win_threshold <= MIN_TILE_VALUE {
            return Err(EngineError::InvalidWinThreshold(self.win_threshold));
        }
        self.spawn.validate()
    }
}

fn env_value<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, EngineError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            warn!(key, value = %raw, "rejected config value");
            EngineError::InvalidConfig { key, value: raw }
        }),
        Err(_) => Ok(None),
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Terminal status of a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Moves are accepted
    #[default]
    Playing,
    /// A tile reached the win threshold
    Won,
    /// Board full and no move changes it
    Lost,
}

impl GameStatus {
    /// Whether the game is over.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

// =============================================================================
// MOVE REPORT
// =============================================================================

/// Everything a caller needs to animate one move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    /// Requested direction
    pub direction: Direction,
    /// Whether the board changed
    pub moved: bool,
    /// Score gained by this move
    pub score_delta: u32,
    /// Per-tile changes
    pub movements: Vec<TileMovement>,
    /// Tile spawned after the move, if any
    pub spawned: Option<Tile>,
    /// Status after the move
    pub status: GameStatus,
}

impl MoveReport {
    fn unmoved(direction: Direction, status: GameStatus) -> Self {
        Self {
            direction,
            moved: false,
            score_delta: 0,
            movements: Vec::new(),
            spawned: None,
            status,
        }
    }

    /// Animation states for one frame.
    ///
    /// Every tile that moved or was absorbed is in transit; every other
    /// tile on `board` (including the spawned one) is at rest.
    pub fn tile_states(&self, board: &Board) -> Vec<TileState> {
        let mut states: Vec<TileState> = self.movements.iter().map(TileMovement::in_transit).collect();
        states.extend(
            board
                .tiles()
                .filter(|t| !self.movements.iter().any(|m| m.id == t.id))
                .map(|t| TileState::from(*t)),
        );
        states
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Read-only view of a game for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Grid size N
    pub size: usize,
    /// Rows of optional tiles, top row first
    pub cells: Vec<Vec<Option<Tile>>>,
    /// Current score
    pub score: u32,
    /// Best score this process has seen
    pub best_score: u32,
    /// Current status
    pub status: GameStatus,
    /// Effective moves in this game
    pub moves: u32,
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete state of one game session.
#[derive(Clone, Debug)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    score: u32,
    best_score: u32,
    status: GameStatus,
    rng_seed: u64,
    rng: DeterministicRng,
    moves: u32,
}

impl GameState {
    /// Start a session with a fresh game.
    pub fn new(config: GameConfig, rng_seed: u64) -> Result<Self, EngineError> {
        config.validate()?;
        let board = Board::new(config.grid_size)?;
        let mut state = Self {
            config,
            board,
            score: 0,
            best_score: 0,
            status: GameStatus::Playing,
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            moves: 0,
        };
        state.new_game()?;
        Ok(state)
    }

    /// Start a session from an existing board.
    ///
    /// Status is evaluated immediately: a board holding a winning tile
    /// starts out won, a full board with no move starts out lost.
    pub fn from_board(config: GameConfig, board: Board, rng_seed: u64) -> Result<Self, EngineError> {
        config.validate()?;
        board.validate()?;
        if board.size() != config.grid_size {
            return Err(EngineError::BoardSizeMismatch {
                expected: config.grid_size.saturating_mul(config.grid_size),
                actual: board.size() * board.size(),
            });
        }
        let mut state = Self {
            config,
            board,
            score: 0,
            best_score: 0,
            status: GameStatus::Playing,
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            moves: 0,
        };
        state.status = state.evaluate_status()?;
        Ok(state)
    }

    /// Reset score and board and place the opening tiles. Best score is kept.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.board.clear();
        self.score = 0;
        self.moves = 0;
        self.status = GameStatus::Playing;

        for _ in 0..INITIAL_TILES {
            let tile = spawn_tile(&self.board, &self.config.spawn, &mut self.rng)?;
            self.board.place(tile)?;
        }

        info!(
            grid_size = self.config.grid_size,
            best_score = self.best_score,
            "new game"
        );
        Ok(())
    }

    /// Apply one move.
    ///
    /// A move that changes nothing is not an error: the report comes back
    /// with `moved == false` and nothing is spawned. Once the game is won
    /// or lost, moves are ignored.
    pub fn apply_move(&mut self, direction: Direction) -> Result<MoveReport, EngineError> {
        if self.status.is_terminal() {
            return Ok(MoveReport::unmoved(direction, self.status));
        }

        let result = shift(&self.board, direction)?;

        if !result.any_changed {
            debug!(%direction, "move changed nothing");
            return Ok(MoveReport::unmoved(direction, self.status));
        }

        let mut board = result.board;
        let spawned = spawn_tile(&board, &self.config.spawn, &mut self.rng)?;
        board.place(spawned)?;

        self.board = board;
        self.score = self.score.saturating_add(result.score_delta);
        self.best_score = self.best_score.max(self.score);
        self.moves += 1;
        self.update_status()?;

        debug!(
            %direction,
            score_delta = result.score_delta,
            score = self.score,
            spawned_value = spawned.value,
            "applied move"
        );

        Ok(MoveReport {
            direction,
            moved: true,
            score_delta: result.score_delta,
            movements: result.movements,
            spawned: Some(spawned),
            status: self.status,
        })
    }

    fn evaluate_status(&self) -> Result<GameStatus, EngineError> {
        if self.board.max_value() >= self.config.win_threshold {
            return Ok(GameStatus::Won);
        }
        if is_stuck(&self.board)? {
            return Ok(GameStatus::Lost);
        }
        Ok(GameStatus::Playing)
    }

    fn update_status(&mut self) -> Result<(), EngineError> {
        let status = self.evaluate_status()?;
        if status != self.status {
            info!(?status, score = self.score, moves = self.moves, "game over");
        }
        self.status = status;
        Ok(())
    }

    /// Feed in a best score loaded from outside. Never lowers the best.
    pub fn restore_best_score(&mut self, best_score: u32) {
        self.best_score = self.best_score.max(best_score);
    }

    /// Directions that would change the board right now.
    pub fn available_moves(&self) -> Result<Vec<Direction>, EngineError> {
        if self.status.is_terminal() {
            return Ok(Vec::new());
        }
        available_directions(&self.board)
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Best score seen by this process.
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Session configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed the session started from.
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Effective moves in this game.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Read-only view for rendering.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            size: self.board.size(),
            cells: self.board.rows(),
            score: self.score,
            best_score: self.best_score,
            status: self.status,
            moves: self.moves,
        }
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.board.size(), self.rng_seed, |hasher| {
            hasher.update_u32(self.moves);
            hasher.update_u32(self.score);
            hasher.update_u32(self.best_score);
            hasher.update_u8(self.status as u8);

            // Row-major, so the order is fixed
            for tile in self.board.tiles() {
                hasher.update_id(tile.id.as_bytes());
                hasher.update_u32(tile.value);
                hasher.update_usize(tile.position.x);
                hasher.update_usize(tile.position.y);
            }

            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
        })
    }
}

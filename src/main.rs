//! Slide Merge demo
//!
//! Plays a seeded game with a fixed direction pattern, logs progress, and
//! checks determinism by replaying the same inputs.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use slide_merge::{
    game::replay::replay_moves,
    Direction, GameConfig, GameState, TileFate, VERSION,
};

/// Upper bound on moves for the demo game.
const DEMO_MOVES: usize = 2000;

/// Seed used when `SLIDE_MERGE_SEED` is unset.
const DEFAULT_SEED: u64 = 12345;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;

    let config = GameConfig::from_env().context("Invalid configuration")?;
    let rng_seed = parse_seed(std::env::var("SLIDE_MERGE_SEED").ok().as_deref())?;

    info!("Slide Merge v{}", VERSION);
    info!(
        "Grid: {0}x{0}, win at {1}, seed {2}",
        config.grid_size, config.win_threshold, rng_seed
    );

    demo_game(config, rng_seed)
}

/// Seed from `SLIDE_MERGE_SEED`. Unset falls back to the default; garbage is an error.
fn parse_seed(raw: Option<&str>) -> anyhow::Result<u64> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Invalid SLIDE_MERGE_SEED: {raw}")),
        None => Ok(DEFAULT_SEED),
    }
}

/// Direction pattern for the demo: corner strategy with a fallback.
fn demo_direction(step: usize, available: &[Direction]) -> Option<Direction> {
    let preferred = [Direction::Left, Direction::Down, Direction::Right, Direction::Down];
    let first = preferred[step % preferred.len()];
    if available.contains(&first) {
        return Some(first);
    }
    [Direction::Left, Direction::Down, Direction::Right, Direction::Up]
        .into_iter()
        .find(|d| available.contains(d))
}

fn demo_game(config: GameConfig, rng_seed: u64) -> anyhow::Result<()> {
    info!("=== Starting Demo Game ===");

    let mut state = GameState::new(config.clone(), rng_seed)?;
    let mut played = Vec::new();
    let mut merges = 0usize;

    for step in 0..DEMO_MOVES {
        let available = state.available_moves()?;
        let Some(direction) = demo_direction(step, &available) else {
            break;
        };

        let report = state.apply_move(direction)?;
        played.push(direction);
        merges += report
            .movements
            .iter()
            .filter(|m| matches!(m.fate, TileFate::Merged { .. }))
            .count();

        if step % 100 == 0 {
            info!(
                "Move {}: score {}, max tile {}, {} tiles",
                step,
                state.score(),
                state.board().max_value(),
                state.board().tile_count()
            );
        }

        if report.status.is_terminal() {
            break;
        }
    }

    info!("=== Game Results ===");
    info!("Status: {:?}", state.status());
    info!("Score: {} (best {})", state.score(), state.best_score());
    info!("Moves: {}, merges: {}", state.moves(), merges);
    info!("Max tile: {}", state.board().max_value());

    let hash = state.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    let snapshot = serde_json::to_string(&state.snapshot()).context("Failed to serialize snapshot")?;
    info!("Snapshot: {}", snapshot);

    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay_moves(config, rng_seed, &played)?;
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
        Ok(())
    } else {
        anyhow::bail!("DETERMINISM FAILURE: Hashes differ!")
    }
}

//! Core deterministic primitives.
//!
//! Randomness, hashing and the error taxonomy shared by the game modules.

pub mod error;
pub mod hash;
pub mod rng;

// Re-export core types
pub use error::{EngineError, ErrorKind};
pub use hash::{compute_state_hash, StateHash, StateHasher};
pub use rng::{DeterministicRng, RandomSource};

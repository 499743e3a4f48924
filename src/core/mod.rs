//! Core deterministic primitives.
//!
//! Randomness, time and delayed actions. Nothing here knows about the game;
//! the game and lives layers build on these.

pub mod clock;
pub mod hash;
pub mod rng;
pub mod timer;

// Re-export core types
pub use clock::{Clock, EpochMillis, ManualClock, SystemClock, SECOND_MS};
pub use hash::{compute_state_hash, StateHash, StateHasher};
pub use rng::DeterministicRng;
pub use timer::{TimerId, TimerQueue};

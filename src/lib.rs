//! # Catch The Mine
//!
//! Client core for Catch The Mine, a 30-second tap-to-score arcade game with
//! a daily lives allowance, on-chain lives purchases and reward claims, and
//! a signed-score leaderboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CATCH THE MINE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  ├── clock.rs    - Wall clock / manual clock                 │
//! │  ├── timer.rs    - Cancellable timer queue                   │
//! │  └── hash.rs     - Session state hashing                     │
//! │                                                              │
//! │  lives/          - Lives entitlement                         │
//! │  ├── record.rs   - Persisted record + validation             │
//! │  ├── storage.rs  - Key/value backends                        │
//! │  └── store.rs    - Daily reset, heal-on-corruption           │
//! │                                                              │
//! │  game/           - Match engine (deterministic)              │
//! │  ├── state.rs    - Session, entities, phases                 │
//! │  ├── tick.rs     - Frame loop                                │
//! │  ├── spawn.rs    - Spawn cadences                            │
//! │  ├── hit.rs      - Collision and scoring                     │
//! │  ├── events.rs   - Game events                               │
//! │  └── submit.rs   - Signed score submission                   │
//! │                                                              │
//! │  network/        - External collaborators                    │
//! │  ├── api.rs      - Leaderboard HTTP client                   │
//! │  ├── protocol.rs - Wire types                                │
//! │  ├── wallet.rs   - Addresses, message signing                │
//! │  └── chain.rs    - Game hub contract                         │
//! │                                                              │
//! │  app/            - Session orchestration                     │
//! │  ├── orchestrator.rs - Play gate, lives, purchases           │
//! │  ├── countdown.rs    - Reset countdown                       │
//! │  ├── claim.rs        - Reward claim                          │
//! │  ├── share.rs        - Social share                          │
//! │  ├── notification.rs - Player messages                       │
//! │  └── config.rs       - Environment configuration             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! The `game/` engine takes the current time as an argument and draws all
//! randomness from a seeded Xorshift128+, so a match replays identically
//! from its seed and the times of its frames and hits. Tests drive it with
//! a [`ManualClock`](core::clock::ManualClock).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod app;
pub mod core;
pub mod game;
pub mod lives;
pub mod network;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use app::{AppConfig, SessionOrchestrator};
pub use core::clock::{Clock, EpochMillis, ManualClock, SystemClock};
pub use core::rng::DeterministicRng;
pub use game::state::{GameSession, MatchPhase};
pub use lives::store::{LivesStore, LivesUpdate};
pub use lives::record::LivesRecord;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Frame rate the engine is tuned for (Hz)
pub const FRAME_RATE: u32 = 60;

/// Match duration in seconds
pub const MATCH_DURATION_SECS: u32 = 30;

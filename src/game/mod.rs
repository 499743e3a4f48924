//! Game Logic Module
//!
//! The match engine. Deterministic given a seed and the frame/hit times.
//!
//! ## Module Structure
//!
//! - `state`: session state, entities, phases
//! - `tick`: per-frame loop (clock, timers, cadences)
//! - `spawn`: cadence configuration and entity spawning
//! - `hit`: collision resolution and scoring
//! - `events`: game events for logging and presentation
//! - `submit`: end-of-match score submission

pub mod events;
pub mod hit;
pub mod spawn;
pub mod state;
pub mod submit;
pub mod tick;

// Re-export key types
pub use events::{GameEvent, GameEventData};
pub use hit::HitOutcome;
pub use spawn::SpawnConfig;
pub use state::{EntityId, EntityKind, FieldPosition, GameError, GameSession, MatchPhase, SpawnedEntity, Variant};
pub use submit::{ResultScreen, SubmissionState, SubmitContext, SubmitError};
pub use tick::{GameConfig, TickResult};

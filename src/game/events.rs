//! Game Events
//!
//! Events generated during a match, drained by the orchestrator each frame
//! for logging and for driving the presentation layer.

use serde::{Serialize, Deserialize};

use crate::core::clock::EpochMillis;
use crate::game::state::{EntityId, EntityKind, FieldPosition, Variant};

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Match entered the playing phase
    MatchStarted {
        seed: u64,
        duration_secs: u32,
    },

    /// An entity appeared on the field
    EntitySpawned {
        entity_id: EntityId,
        kind: EntityKind,
        variant: Variant,
        position: FieldPosition,
    },

    /// Player caught a collectible
    CollectibleCaught {
        entity_id: EntityId,
        new_score: u32,
        chain_spawns: u8,
    },

    /// Player hit a hazard
    HazardHit {
        entity_id: EntityId,
        old_score: u32,
        new_score: u32,
    },

    /// Hazard timed out untouched
    HazardExpired {
        entity_id: EntityId,
    },

    /// One second of match time elapsed
    ClockTicked {
        time_remaining: u32,
    },

    /// Match reached the result phase
    MatchEnded {
        final_score: u32,
    },
}

/// A game event with its timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// When the event occurred
    pub at: EpochMillis,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(at: EpochMillis, data: GameEventData) -> Self {
        Self { at, data }
    }

    /// Create match started event.
    pub fn match_started(at: EpochMillis, seed: u64, duration_secs: u32) -> Self {
        Self::new(at, GameEventData::MatchStarted { seed, duration_secs })
    }

    /// Create entity spawned event.
    pub fn entity_spawned(
        at: EpochMillis,
        entity_id: EntityId,
        kind: EntityKind,
        variant: Variant,
        position: FieldPosition,
    ) -> Self {
        Self::new(
            at,
            GameEventData::EntitySpawned {
                entity_id,
                kind,
                variant,
                position,
            },
        )
    }

    /// Create collectible caught event.
    pub fn collectible_caught(at: EpochMillis, entity_id: EntityId, new_score: u32, chain_spawns: u8) -> Self {
        Self::new(
            at,
            GameEventData::CollectibleCaught {
                entity_id,
                new_score,
                chain_spawns,
            },
        )
    }

    /// Create hazard hit event.
    pub fn hazard_hit(at: EpochMillis, entity_id: EntityId, old_score: u32, new_score: u32) -> Self {
        Self::new(
            at,
            GameEventData::HazardHit {
                entity_id,
                old_score,
                new_score,
            },
        )
    }

    /// Create hazard expired event.
    pub fn hazard_expired(at: EpochMillis, entity_id: EntityId) -> Self {
        Self::new(at, GameEventData::HazardExpired { entity_id })
    }

    /// Create clock ticked event.
    pub fn clock_ticked(at: EpochMillis, time_remaining: u32) -> Self {
        Self::new(at, GameEventData::ClockTicked { time_remaining })
    }

    /// Create match ended event.
    pub fn match_ended(at: EpochMillis, final_score: u32) -> Self {
        Self::new(at, GameEventData::MatchEnded { final_score })
    }

    /// Does this event change the score?
    pub fn is_scoring(&self) -> bool {
        matches!(
            self.data,
            GameEventData::CollectibleCaught { .. } | GameEventData::HazardHit { .. }
        )
    }
}

//! Game State Definitions
//!
//! All state types for one match of Catch The Mine.
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::clock::EpochMillis;
use crate::core::hash::{StateHash, StateHasher, compute_state_hash};
use crate::core::rng::DeterministicRng;
use crate::core::timer::{TimerId, TimerQueue};
use crate::game::events::GameEvent;
use crate::game::tick::GameConfig;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from driving a game session.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GameError {
    /// `start` while a match is running.
    #[error("match already in progress")]
    AlreadyPlaying,

    /// Gameplay action outside the playing phase.
    #[error("no match in progress")]
    NotPlaying,
}

// =============================================================================
// ENTITIES
// =============================================================================

/// Unique entity identifier.
///
/// Ids increase in spawn order, so ordering by id is ordering by age.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// What an entity does when hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityKind {
    /// Rewards the player
    Collectible = 0,
    /// Penalizes the player
    Hazard = 1,
}

/// Cosmetic sprite variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Variant {
    /// Blue gem
    Blue = 0,
    /// Silver nugget
    Silver = 1,
    /// Gold nugget
    Gold = 2,
    /// Emerald
    Emerald = 3,
    /// The mine
    Dynamite = 4,
}

/// Variants a collectible may take.
pub const COLLECTIBLE_VARIANTS: [Variant; 4] = [
    Variant::Blue,
    Variant::Silver,
    Variant::Gold,
    Variant::Emerald,
];

/// Position on the play field in hundredths of a percent of its size.
///
/// `(0, 0)` is the top-left corner, `(10_000, 10_000)` the bottom-right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldPosition {
    /// Horizontal offset
    pub x: u16,
    /// Vertical offset
    pub y: u16,
}

impl FieldPosition {
    /// Full field extent on each axis.
    pub const FULL: u16 = 10_000;

    /// Create a position.
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Position from whole percentages.
    pub fn from_percent(x: f32, y: f32) -> Self {
        let scale = |p: f32| (p.clamp(0.0, 100.0) * 100.0).round() as u16;
        Self::new(scale(x), scale(y))
    }

    /// Is `point` inside the square of side `extent` anchored here?
    #[inline]
    pub fn covers(&self, point: FieldPosition, extent: u16) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x - self.x < extent
            && point.y - self.y < extent
    }
}

/// An entity currently on the field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedEntity {
    /// Unique id
    pub id: EntityId,

    /// Collectible or hazard
    pub kind: EntityKind,

    /// Sprite
    pub variant: Variant,

    /// Top-left corner on the field
    pub position: FieldPosition,

    /// Rotation in tenths of a degree
    pub rotation: u16,

    /// When it appeared
    pub spawned_at: EpochMillis,

    /// Pending timeout (hazards only)
    pub expiry: Option<TimerId>,
}

impl SpawnedEntity {
    /// Add entity to state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u64(self.id.0);
        hasher.update_u8(self.kind as u8);
        hasher.update_u8(self.variant as u8);
        hasher.update_u16(self.position.x);
        hasher.update_u16(self.position.y);
        hasher.update_u16(self.rotation);
        hasher.update_i64(self.spawned_at);
    }
}

// =============================================================================
// SCHEDULING
// =============================================================================

/// Delayed work owned by a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerAction {
    /// Spawn one collectible (initial supply and chain spawns).
    SpawnCollectible,
    /// Remove a hazard that was not hit in time.
    ExpireHazard(EntityId),
}

/// Frame-driven spawn cadence for one entity kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnCadence {
    /// Time of the last cadence spawn
    pub last_spawn_at: EpochMillis,
    /// Gap required before the next one
    pub interval_ms: u32,
}

impl SpawnCadence {
    /// Cadence whose first spawn is `interval_ms` after `now`.
    pub fn starting_at(now: EpochMillis, interval_ms: u32) -> Self {
        Self {
            last_spawn_at: now,
            interval_ms,
        }
    }

    /// Has more than one interval passed since the last spawn?
    #[inline]
    pub fn is_due(&self, now: EpochMillis) -> bool {
        now - self.last_spawn_at > self.interval_ms as EpochMillis
    }
}

// =============================================================================
// MATCH STATE
// =============================================================================

/// Match phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for the player to press start
    #[default]
    Ready,
    /// Match in progress
    Playing,
    /// Match over, score frozen
    Result,
}

/// Complete state of one game session.
#[derive(Clone, Debug)]
pub struct GameSession {
    /// Current phase
    pub phase: MatchPhase,

    /// Current score, never negative
    pub score: u32,

    /// Whole seconds left in the match
    pub time_remaining: u32,

    /// Entities on the field (BTreeMap for determinism!)
    pub entities: BTreeMap<EntityId, SpawnedEntity>,

    /// Next entity id. Not reset between matches.
    pub next_entity_id: u64,

    /// RNG seed of the current match
    pub rng_seed: u64,

    /// Deterministic RNG
    pub rng: DeterministicRng,

    /// When the current match started
    pub started_at: EpochMillis,

    /// Time of the last whole-second clock decrement
    pub last_second_at: EpochMillis,

    /// Collectible cadence
    pub collectible_cadence: SpawnCadence,

    /// Hazard cadence
    pub hazard_cadence: SpawnCadence,

    /// Delayed spawns and hazard timeouts
    pub timers: TimerQueue<TimerAction>,

    /// Events generated since the last drain
    pub pending_events: Vec<GameEvent>,

    /// Collectibles caught this match
    pub collectibles_caught: u32,

    /// Hazards hit this match
    pub hazards_hit: u32,
}

impl GameSession {
    /// Create a session waiting in the ready phase.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: MatchPhase::Ready,
            score: 0,
            time_remaining: config.match_duration_secs,
            entities: BTreeMap::new(),
            next_entity_id: 0,
            rng_seed: 0,
            rng: DeterministicRng::default(),
            started_at: 0,
            last_second_at: 0,
            collectible_cadence: SpawnCadence::starting_at(0, config.spawn.initial_interval_ms),
            hazard_cadence: SpawnCadence::starting_at(0, config.spawn.initial_interval_ms),
            timers: TimerQueue::new(),
            pending_events: Vec::new(),
            collectibles_caught: 0,
            hazards_hit: 0,
        }
    }

    /// Start a match at `now`.
    ///
    /// Allowed from `Ready` and from `Result`; starting from `Result` fully
    /// resets the previous match. Schedules the initial collectible supply.
    pub fn start(&mut self, now: EpochMillis, seed: u64, config: &GameConfig) -> Result<(), GameError> {
        if self.phase == MatchPhase::Playing {
            return Err(GameError::AlreadyPlaying);
        }

        self.phase = MatchPhase::Playing;
        self.score = 0;
        self.time_remaining = config.match_duration_secs;
        self.entities.clear();
        self.rng_seed = seed;
        self.rng = DeterministicRng::new(seed);
        self.started_at = now;
        self.last_second_at = now;
        self.collectible_cadence = SpawnCadence::starting_at(now, config.spawn.initial_interval_ms);
        self.hazard_cadence = SpawnCadence::starting_at(now, config.spawn.initial_interval_ms);
        self.timers.clear();
        self.pending_events.clear();
        self.collectibles_caught = 0;
        self.hazards_hit = 0;

        for i in 0..config.initial_spawn_count {
            let due = now + (i as EpochMillis) * config.initial_spawn_spacing_ms as EpochMillis;
            self.timers.schedule(due, TimerAction::SpawnCollectible);
        }

        self.push_event(GameEvent::match_started(now, seed, config.match_duration_secs));
        Ok(())
    }

    /// Is a match in progress?
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == MatchPhase::Playing
    }

    /// Has the match ended?
    #[inline]
    pub fn is_ended(&self) -> bool {
        self.phase == MatchPhase::Result
    }

    /// Place a new entity on the field.
    pub fn spawn_entity(
        &mut self,
        kind: EntityKind,
        variant: Variant,
        position: FieldPosition,
        rotation: u16,
        now: EpochMillis,
    ) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;

        self.entities.insert(
            id,
            SpawnedEntity {
                id,
                kind,
                variant,
                position,
                rotation,
                spawned_at: now,
                expiry: None,
            },
        );
        self.push_event(GameEvent::entity_spawned(now, id, kind, variant, position));
        id
    }

    /// Remove an entity, cancelling its timeout. Removing twice is a no-op.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<SpawnedEntity> {
        let entity = self.entities.remove(&id)?;
        if let Some(timer) = entity.expiry {
            self.timers.cancel(timer);
        }
        Some(entity)
    }

    /// Get an entity by id.
    pub fn get_entity(&self, id: EntityId) -> Option<&SpawnedEntity> {
        self.entities.get(&id)
    }

    /// Number of entities of `kind` on the field.
    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind == kind).count()
    }

    /// Milliseconds since the match started.
    pub fn elapsed_ms(&self, now: EpochMillis) -> EpochMillis {
        (now - self.started_at).max(0)
    }

    /// Queue an event for the next drain.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Drain queued events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Compute hash of current state for replay comparison.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.rng_seed, self.last_second_at - self.started_at, |hasher| {
            hasher.update_u8(self.phase as u8);
            hasher.update_u32(self.score);
            hasher.update_u32(self.time_remaining);

            let rng_state = self.rng.state();
            hasher.update_u64(rng_state[0]);
            hasher.update_u64(rng_state[1]);

            hasher.update_u32(self.entities.len() as u32);
            for entity in self.entities.values() {
                entity.hash_into(hasher);
            }
        })
    }
}

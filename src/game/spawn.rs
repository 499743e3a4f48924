//! Entity Spawning
//!
//! Two independent cadences, one per entity kind. Each interval is sampled
//! again after every spawn of its kind, and both tighten once the match
//! clock drops below the late-game threshold.

use tracing::debug;

use crate::core::clock::EpochMillis;
use crate::core::rng::DeterministicRng;
use crate::game::state::{
    EntityId, EntityKind, FieldPosition, GameSession, TimerAction, Variant,
    COLLECTIBLE_VARIANTS,
};

/// A spawn interval: `base_ms` plus a uniform draw from `[0, jitter_ms)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnBand {
    /// Fixed part of the interval
    pub base_ms: u32,
    /// Width of the random part
    pub jitter_ms: u32,
}

impl SpawnBand {
    /// Band with a fixed interval.
    pub const fn fixed(base_ms: u32) -> Self {
        Self { base_ms, jitter_ms: 0 }
    }

    /// Band with a random component.
    pub const fn jittered(base_ms: u32, jitter_ms: u32) -> Self {
        Self { base_ms, jitter_ms }
    }

    /// Draw an interval.
    pub fn sample(&self, rng: &mut DeterministicRng) -> u32 {
        self.base_ms + rng.next_int(self.jitter_ms)
    }
}

/// Configuration for entity spawning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnConfig {
    /// First interval of both cadences after the match starts
    pub initial_interval_ms: u32,
    /// Late-game bands apply once fewer than this many seconds remain
    pub late_game_threshold_secs: u32,
    /// Collectible interval, early game
    pub collectible: SpawnBand,
    /// Collectible interval, late game
    pub collectible_late: SpawnBand,
    /// Hazard interval, early game
    pub hazard: SpawnBand,
    /// Hazard interval, late game
    pub hazard_late: SpawnBand,
    /// Spawn positions are drawn from `[0, max_position)` on each axis
    pub max_position: u16,
    /// Collectible rotation is drawn from `[0, max_rotation)` tenths of a degree
    pub max_rotation: u16,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 800,
            late_game_threshold_secs: 15,
            collectible: SpawnBand::fixed(1100),
            collectible_late: SpawnBand::fixed(450),
            hazard: SpawnBand::jittered(1200, 800),
            hazard_late: SpawnBand::jittered(450, 800),
            max_position: 9_000, // 90% keeps sprites inside the field
            max_rotation: 150,
        }
    }
}

impl SpawnConfig {
    /// Interval band for `kind` given the seconds left.
    pub fn band_for(&self, kind: EntityKind, time_remaining: u32) -> SpawnBand {
        let late = time_remaining < self.late_game_threshold_secs;
        match (kind, late) {
            (EntityKind::Collectible, false) => self.collectible,
            (EntityKind::Collectible, true) => self.collectible_late,
            (EntityKind::Hazard, false) => self.hazard,
            (EntityKind::Hazard, true) => self.hazard_late,
        }
    }
}

/// Random position inside the spawn area.
pub fn random_position(rng: &mut DeterministicRng, config: &SpawnConfig) -> FieldPosition {
    let max = config.max_position as u32;
    let x = rng.next_int(max) as u16;
    let y = rng.next_int(max) as u16;
    FieldPosition::new(x, y)
}

/// Spawn one collectible with a random variant, position and tilt.
pub fn spawn_collectible(session: &mut GameSession, now: EpochMillis, config: &SpawnConfig) -> EntityId {
    let variant = session
        .rng
        .choose(&COLLECTIBLE_VARIANTS)
        .copied()
        .unwrap_or(Variant::Blue);
    let position = random_position(&mut session.rng, config);
    let rotation = session.rng.next_int(config.max_rotation as u32) as u16;

    let id = session.spawn_entity(EntityKind::Collectible, variant, position, rotation, now);
    debug!("Spawned collectible {:?} ({:?}) at {:?}", id, variant, position);
    id
}

/// Spawn one hazard and arm its timeout.
pub fn spawn_hazard(
    session: &mut GameSession,
    now: EpochMillis,
    config: &SpawnConfig,
    lifetime_ms: u32,
) -> EntityId {
    let position = random_position(&mut session.rng, config);
    let id = session.spawn_entity(EntityKind::Hazard, Variant::Dynamite, position, 0, now);

    let timer = session
        .timers
        .schedule(now + lifetime_ms as EpochMillis, TimerAction::ExpireHazard(id));
    if let Some(entity) = session.entities.get_mut(&id) {
        entity.expiry = Some(timer);
    }

    debug!("Spawned hazard {:?} at {:?}", id, position);
    id
}

/// Run both cadences for this frame.
///
/// At most one entity per kind is spawned per call. After a spawn the
/// cadence restarts from `now` with a freshly sampled interval.
pub fn run_cadences(
    session: &mut GameSession,
    now: EpochMillis,
    config: &SpawnConfig,
    hazard_lifetime_ms: u32,
) {
    if session.collectible_cadence.is_due(now) {
        spawn_collectible(session, now, config);
        let band = config.band_for(EntityKind::Collectible, session.time_remaining);
        session.collectible_cadence.last_spawn_at = now;
        session.collectible_cadence.interval_ms = band.sample(&mut session.rng);
    }

    if session.hazard_cadence.is_due(now) {
        spawn_hazard(session, now, config, hazard_lifetime_ms);
        let band = config.band_for(EntityKind::Hazard, session.time_remaining);
        session.hazard_cadence.last_spawn_at = now;
        session.hazard_cadence.interval_ms = band.sample(&mut session.rng);
    }
}

//! Hit Resolution
//!
//! The player taps an entity; the entity is removed and the score changes.
//! Hits are resolved by entity id, so the outcome does not depend on where
//! the sprite happens to be drawn.

use tracing::debug;

use crate::core::clock::EpochMillis;
use crate::game::events::GameEvent;
use crate::game::state::{EntityId, EntityKind, FieldPosition, GameError, GameSession, TimerAction};
use crate::game::tick::{catch_up, GameConfig};

/// What a hit did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// Collectible caught
    Caught {
        /// Score after the catch
        score: u32,
        /// Follow-up spawns scheduled (1 or 2)
        chain_spawns: u8,
    },
    /// Hazard hit
    Exploded {
        /// Score after the penalty
        score: u32,
    },
    /// The entity was already gone (timed out or hit twice)
    Missed,
}

/// Resolve a hit on `entity_id`.
///
/// - Collectible: `+reward`, then a follow-up collectible after
///   `chain_spawn_delay_ms` and, with `bonus_chain_chance` percent, a second
///   one after `bonus_chain_delay_ms`.
/// - Hazard: `-penalty`, floored at zero; its timeout is cancelled.
///
/// The session is first caught up to `now`, so a hazard past its lifetime
/// is already gone and a hit after the final second finds the match over.
/// Fails only when no match is running.
pub fn hit(
    session: &mut GameSession,
    entity_id: EntityId,
    now: EpochMillis,
    config: &GameConfig,
) -> Result<HitOutcome, GameError> {
    if !catch_up(session, now, config) {
        return Err(GameError::NotPlaying);
    }

    let entity = match session.remove_entity(entity_id) {
        Some(entity) => entity,
        None => return Ok(HitOutcome::Missed),
    };

    match entity.kind {
        EntityKind::Collectible => {
            session.score = session.score.saturating_add(config.collectible_reward);
            session.collectibles_caught += 1;

            session.timers.schedule(
                now + config.chain_spawn_delay_ms as EpochMillis,
                TimerAction::SpawnCollectible,
            );
            let mut chain_spawns = 1;
            if session.rng.next_chance(config.bonus_chain_chance) {
                session.timers.schedule(
                    now + config.bonus_chain_delay_ms as EpochMillis,
                    TimerAction::SpawnCollectible,
                );
                chain_spawns += 1;
            }

            debug!("Caught {:?}: score {} (+{} chain)", entity_id, session.score, chain_spawns);
            session.push_event(GameEvent::collectible_caught(now, entity_id, session.score, chain_spawns));
            Ok(HitOutcome::Caught {
                score: session.score,
                chain_spawns,
            })
        }
        EntityKind::Hazard => {
            let old_score = session.score;
            session.score = old_score.saturating_sub(config.hazard_penalty);
            session.hazards_hit += 1;

            debug!("Hit hazard {:?}: score {} -> {}", entity_id, old_score, session.score);
            session.push_event(GameEvent::hazard_hit(now, entity_id, old_score, session.score));
            Ok(HitOutcome::Exploded { score: session.score })
        }
    }
}

/// Topmost entity under `point`, if any.
///
/// Later spawns are drawn on top, so the highest id wins.
pub fn entity_at(session: &GameSession, point: FieldPosition, config: &GameConfig) -> Option<EntityId> {
    session
        .entities
        .values()
        .rev()
        .find(|e| e.position.covers(point, config.hit_extent))
        .map(|e| e.id)
}

/// Resolve a tap at `point`. A tap on empty field is a miss.
pub fn hit_at(
    session: &mut GameSession,
    point: FieldPosition,
    now: EpochMillis,
    config: &GameConfig,
) -> Result<HitOutcome, GameError> {
    if !catch_up(session, now, config) {
        return Err(GameError::NotPlaying);
    }
    match entity_at(session, point, config) {
        Some(id) => hit(session, id, now, config),
        None => Ok(HitOutcome::Missed),
    }
}

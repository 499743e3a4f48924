//! Frame Tick
//!
//! The match loop. Called once per rendered frame with the current time;
//! everything that happens without player input happens here.

use tracing::{debug, info};

use crate::core::clock::{EpochMillis, SECOND_MS};
use crate::MATCH_DURATION_SECS;
use crate::game::events::GameEvent;
use crate::game::spawn::{run_cadences, spawn_collectible, SpawnConfig};
use crate::game::state::{GameSession, MatchPhase, TimerAction};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated since the previous tick
    pub events: Vec<GameEvent>,
    /// Whether the match is over
    pub match_ended: bool,
}

/// Configuration for a match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Match length in seconds
    pub match_duration_secs: u32,
    /// Spawn cadences
    pub spawn: SpawnConfig,
    /// Hazards vanish after this long untouched
    pub hazard_lifetime_ms: u32,
    /// Points for a collectible
    pub collectible_reward: u32,
    /// Points lost to a hazard (score floors at 0)
    pub hazard_penalty: u32,
    /// Delay of the guaranteed chain spawn after a catch
    pub chain_spawn_delay_ms: u32,
    /// Delay of the bonus chain spawn
    pub bonus_chain_delay_ms: u32,
    /// Chance of the bonus chain spawn, in percent
    pub bonus_chain_chance: u32,
    /// Collectibles spawned right after start
    pub initial_spawn_count: u32,
    /// Gap between the initial spawns
    pub initial_spawn_spacing_ms: u32,
    /// Side of an entity's square hit box, in field units
    pub hit_extent: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            match_duration_secs: MATCH_DURATION_SECS,
            spawn: SpawnConfig::default(),
            hazard_lifetime_ms: 3000,
            collectible_reward: 1,
            hazard_penalty: 3,
            chain_spawn_delay_ms: 100,
            bonus_chain_delay_ms: 250,
            bonus_chain_chance: 60,
            initial_spawn_count: 3,
            initial_spawn_spacing_ms: 200,
            hit_extent: 1_000, // 10% of the field
        }
    }
}

/// Run one frame.
///
/// Order within a frame:
/// 1. Match clock: one decrement per whole second elapsed, however many
///    seconds the frame spans. Reaching zero ends the match at once and
///    nothing else runs.
/// 2. Due timers (delayed collectible spawns, hazard timeouts), oldest first.
/// 3. Spawn cadences, at most one entity per kind.
///
/// Frames in `Ready` do nothing; frames in `Result` only report the end.
pub fn tick(session: &mut GameSession, now: EpochMillis, config: &GameConfig) -> TickResult {
    let mut result = TickResult::default();

    match session.phase {
        MatchPhase::Ready => {
            return result;
        }
        MatchPhase::Result => {
            result.match_ended = true;
            result.events = session.take_events();
            return result;
        }
        MatchPhase::Playing => {}
    }

    // 1-2. Match clock, then timers
    if !catch_up(session, now, config) {
        result.match_ended = true;
        result.events = session.take_events();
        return result;
    }

    // 3. Cadences
    run_cadences(session, now, &config.spawn, config.hazard_lifetime_ms);

    result.events = session.take_events();
    result
}

/// Bring the match clock and due timers up to `now`. Cadences do not run.
///
/// Anything that acts on the session at a given time (a frame or a hit)
/// catches up first, so expired hazards are gone and a match past its end
/// is over. Returns false if the match is not in progress afterwards.
pub fn catch_up(session: &mut GameSession, now: EpochMillis, config: &GameConfig) -> bool {
    if !session.is_playing() {
        return false;
    }

    advance_clock(session, now);
    if session.is_ended() {
        return false;
    }

    run_timers(session, now, config);
    true
}

/// Decrement the clock once per elapsed second.
fn advance_clock(session: &mut GameSession, now: EpochMillis) {
    while now - session.last_second_at >= SECOND_MS {
        session.last_second_at += SECOND_MS;
        session.time_remaining = session.time_remaining.saturating_sub(1);
        let at = session.last_second_at;
        session.push_event(GameEvent::clock_ticked(at, session.time_remaining));

        if session.time_remaining == 0 {
            end_match(session, at);
            return;
        }
    }
}

/// Fire every timer due at or before `now`.
fn run_timers(session: &mut GameSession, now: EpochMillis, config: &GameConfig) {
    while let Some((_, due, action)) = session.timers.pop_due(now) {
        match action {
            TimerAction::SpawnCollectible => {
                spawn_collectible(session, due, &config.spawn);
            }
            TimerAction::ExpireHazard(id) => {
                // Already gone if the player hit it first
                if session.remove_entity(id).is_some() {
                    debug!("Hazard {:?} expired", id);
                    session.push_event(GameEvent::hazard_expired(due, id));
                }
            }
        }
    }
}

/// Move to `Result`, freezing the score and clearing the field.
fn end_match(session: &mut GameSession, at: EpochMillis) {
    session.phase = MatchPhase::Result;
    session.time_remaining = 0;
    session.timers.clear();
    session.entities.clear();
    session.push_event(GameEvent::match_ended(at, session.score));

    info!(
        "Match over: score {} ({} caught, {} hazards hit)",
        session.score, session.collectibles_caught, session.hazards_hit
    );
}

/// End a running match early (player left the game view).
///
/// Returns false if no match was running.
pub fn force_end(session: &mut GameSession, now: EpochMillis) -> bool {
    if !session.is_playing() {
        return false;
    }
    end_match(session, now);
    true
}

//! Catch The Mine
//!
//! Headless demo: plays one scripted match against the file-backed lives
//! store, checks that the engine replays it identically, then shows the
//! leaderboard from the configured API.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use catch_the_mine::{
    AppConfig, Clock, EpochMillis, GameSession, ManualClock, SessionOrchestrator, SystemClock,
    FRAME_RATE, MATCH_DURATION_SECS, VERSION,
    app::countdown::format_countdown,
    game::{
        events::GameEventData,
        hit::hit,
        state::{EntityId, EntityKind},
        tick::tick,
    },
    lives::storage::FileStorage,
    network::{
        fetch_leaderboard_or_empty, protocol::ranked, HttpLeaderboardClient, LeaderboardApi,
        LeaderboardEntry,
    },
};

/// Frames between scripted catches.
const CATCH_EVERY_FRAMES: u32 = 30;

/// Frames between scripted hazard hits.
const HAZARD_EVERY_FRAMES: u32 = 190;

/// Leaderboard rows shown after the match.
const LEADERBOARD_ROWS: usize = 10;

/// Frame times and the hits made right after each frame.
type Script = Vec<(EpochMillis, Vec<EntityId>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;

    info!("Catch The Mine v{}", VERSION);
    info!("Frame Rate: {} Hz", FRAME_RATE);
    info!("Match Duration: {} seconds", MATCH_DURATION_SECS);

    let config = AppConfig::from_env().context("Invalid configuration")?;
    info!("Lives storage: {}", config.storage_dir.display());
    info!("Leaderboard API: {}", config.api_url);
    info!("Game hub: {}", config.chain.hub_address);

    demo_match(&config)?;

    info!("=== Leaderboard ===");
    let client = HttpLeaderboardClient::new(config.api_url.as_str());
    for line in leaderboard_lines(&client).await {
        info!("{}", line);
    }
    Ok(())
}

/// Top of the leaderboard as display lines. An unreachable API shows an empty board.
async fn leaderboard_lines(api: &dyn LeaderboardApi) -> Vec<String> {
    let entries: Vec<LeaderboardEntry> = fetch_leaderboard_or_empty(api).await;
    if entries.is_empty() {
        return vec!["No leaderboard entries".to_string()];
    }
    ranked(&entries)
        .take(LEADERBOARD_ROWS)
        .map(|(rank, entry)| format!("#{} {} - {}", rank, entry.username, entry.score))
        .collect()
}

/// Play one scripted match and verify it replays.
fn demo_match(config: &AppConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Match ===");

    let clock = ManualClock::new(SystemClock.now_ms());
    let storage = FileStorage::new(&config.storage_dir);
    let mut orch = SessionOrchestrator::new(
        config.chain.clone(),
        Default::default(),
        storage,
        Arc::new(clock.clone()),
    );

    let before = orch.lives_record();
    info!(
        "Lives for {}: {} (resets in {})",
        orch.player_key(),
        before.lives,
        format_countdown(before.time_until_reset(clock.now_ms()))
    );

    if let Err(e) = orch.request_play() {
        for notification in orch.take_notifications() {
            warn!("{}", notification.message);
        }
        info!("No match played: {}", e);
        return Ok(());
    }

    let (seed, started_at) = orch
        .game()
        .map(|g| (g.rng_seed, g.started_at))
        .context("match did not start")?;
    info!("RNG Seed: {}", seed);

    let mut script: Script = Vec::new();
    let mut frame: u32 = 0;
    let mut total_events = 0;

    loop {
        frame += 1;
        // 60 Hz without drift: frame n lands at n * 1000 / 60 ms
        let target = started_at + (frame as EpochMillis * 1000) / FRAME_RATE as EpochMillis;
        clock.set(target);

        let result = orch.frame();
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                GameEventData::EntitySpawned { entity_id, kind, variant, position } => {
                    info!("Spawned {:?} {:?} ({:?}) at {:?}", kind, entity_id, variant, position);
                }
                GameEventData::CollectibleCaught { entity_id, new_score, chain_spawns } => {
                    info!("Caught {:?}: score {} ({} chain spawns)", entity_id, new_score, chain_spawns);
                }
                GameEventData::HazardHit { entity_id, old_score, new_score } => {
                    info!("Boom {:?}: score {} -> {}", entity_id, old_score, new_score);
                }
                GameEventData::ClockTicked { time_remaining } if time_remaining % 10 == 0 => {
                    info!("{}s left, score {}", time_remaining, orch.game().map_or(0, |g| g.score));
                }
                GameEventData::MatchEnded { final_score } => {
                    info!("Match ended! Final score: {}", final_score);
                }
                _ => {}
            }
        }

        if result.match_ended {
            script.push((target, Vec::new()));
            break;
        }

        let hits = scripted_hits(&mut orch, frame);
        script.push((target, hits));
    }

    // Print final results
    info!("=== Match Results ===");
    let game = orch.game().context("match vanished")?;
    let hash = game.compute_hash();
    info!("Caught: {}, hazards hit: {}", game.collectibles_caught, game.hazards_hit);
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Total events: {}", total_events);

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let replay_hash = replay(seed, started_at, &script).compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }

    let after = orch.on_match_end()?;
    info!("Lives for {}: {} -> {}", orch.player_key(), before.lives, after.lives);
    Ok(())
}

/// Catch the oldest collectible every so often, and hit the oldest hazard
/// less often.
fn scripted_hits<S: catch_the_mine::lives::storage::KeyValueStorage>(
    orch: &mut SessionOrchestrator<S>,
    frame: u32,
) -> Vec<EntityId> {
    let mut targets = Vec::new();
    let Some(game) = orch.game() else {
        return targets;
    };

    let oldest = |kind: EntityKind| game.entities.values().find(|e| e.kind == kind).map(|e| e.id);
    if frame % CATCH_EVERY_FRAMES == 0 {
        targets.extend(oldest(EntityKind::Collectible));
    }
    if frame % HAZARD_EVERY_FRAMES == 0 {
        targets.extend(oldest(EntityKind::Hazard));
    }

    for id in &targets {
        if let Err(e) = orch.hit(*id) {
            warn!("Scripted hit on {:?} failed: {}", id, e);
        }
    }
    targets
}

/// Re-run a match from its seed and recorded frames.
fn replay(seed: u64, started_at: EpochMillis, script: &Script) -> GameSession {
    let config = Default::default();
    let mut session = GameSession::new(&config);
    if session.start(started_at, seed, &config).is_err() {
        return session;
    }

    for (at, hits) in script {
        tick(&mut session, *at, &config);
        for id in hits {
            let _ = hit(&mut session, *id, *at, &config);
        }
    }
    session
}

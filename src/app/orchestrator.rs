//! Session Orchestrator
//!
//! Ties the lives store to the game engine:
//! - a match starts only while the player has lives left
//! - dismissing the result screen costs exactly one life
//! - a confirmed lives purchase credits lives once per transaction
//! - a once-per-second countdown shows when the lives window resets

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::app::claim::{ClaimError, ClaimFlow};
use crate::app::countdown::ResetCountdown;
use crate::app::notification::{
    purchase_succeeded, Notification, Notifications, OUT_OF_LIVES, PURCHASE_FAILED,
};
use crate::app::share::{score_post, share_or_notify, SocialShare};
use crate::core::clock::Clock;
use crate::core::rng::derive_session_seed;
use crate::game::hit::{hit, hit_at, HitOutcome};
use crate::game::state::{EntityId, FieldPosition, GameError, GameSession, MatchPhase};
use crate::game::submit::{ResultScreen, SubmitContext, SubmitError};
use crate::game::tick::{force_end, tick, GameConfig, TickResult};
use crate::lives::record::LivesRecord;
use crate::lives::storage::KeyValueStorage;
use crate::lives::store::{storage_key, LivesStore, LivesUpdate};
use crate::network::chain::{ChainClientConfig, ChainError, GameHubContract, TxHash, TxOutcome};
use crate::network::wallet::{Address, WalletConnection};

/// Errors from the play flow.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlayError {
    /// No lives left in the current window.
    #[error("out of lives")]
    OutOfLives,

    /// No game is open.
    #[error("no game in progress")]
    NoGame,

    /// The match has not reached its result yet.
    #[error("match is not over")]
    MatchNotOver,

    /// Engine refused the action.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Score submission refused.
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// Application state around one player.
pub struct SessionOrchestrator<S> {
    chain: ChainClientConfig,
    game_config: GameConfig,
    lives: LivesStore<S>,
    clock: Arc<dyn Clock>,
    wallet: WalletConnection,
    /// Open game, if any
    game: Option<GameSession>,
    /// Lives key charged when the open game is dismissed
    match_key: Option<String>,
    result_screen: Option<ResultScreen>,
    /// Purchase transactions already applied (credited or refused)
    processed_txs: BTreeSet<TxHash>,
    notifications: Notifications,
    countdown: ResetCountdown,
    claim: ClaimFlow,
}

impl<S: KeyValueStorage> SessionOrchestrator<S> {
    /// Create an orchestrator for a guest player.
    pub fn new(chain: ChainClientConfig, game_config: GameConfig, storage: S, clock: Arc<dyn Clock>) -> Self {
        let mut lives = LivesStore::new(storage, clock.clone());
        let now = clock.now_ms();
        let record = lives.read(&storage_key(None));
        let claim = ClaimFlow::new(chain.reward_decimals);

        Self {
            chain,
            game_config,
            lives,
            clock,
            wallet: WalletConnection::new(),
            game: None,
            match_key: None,
            result_screen: None,
            processed_txs: BTreeSet::new(),
            notifications: Notifications::new(),
            countdown: ResetCountdown::start(record.reset_timestamp, now),
            claim,
        }
    }

    // =========================================================================
    // IDENTITY & LIVES
    // =========================================================================

    /// Connect a wallet. Lives switch to that wallet's record.
    pub fn connect(&mut self, address: Address) -> LivesRecord {
        info!("Wallet connected: {}", address.short());
        self.wallet.connect(address);
        self.refresh_lives()
    }

    /// Disconnect the wallet. Lives switch back to the guest record.
    pub fn disconnect(&mut self) -> LivesRecord {
        if let Some(address) = self.wallet.disconnect() {
            info!("Wallet disconnected: {}", address.short());
        }
        self.refresh_lives()
    }

    /// Connected wallet.
    pub fn address(&self) -> Option<&Address> {
        self.wallet.address()
    }

    /// Storage key of the current identity.
    pub fn player_key(&self) -> String {
        storage_key(self.wallet.address())
    }

    /// Current lives record, healed if stale.
    pub fn lives_record(&mut self) -> LivesRecord {
        self.refresh_lives()
    }

    /// Current lives.
    pub fn lives(&mut self) -> u32 {
        self.refresh_lives().lives
    }

    /// The lives store.
    pub fn lives_store(&self) -> &LivesStore<S> {
        &self.lives
    }

    fn refresh_lives(&mut self) -> LivesRecord {
        let key = self.player_key();
        let record = self.lives.read(&key);
        if record.reset_timestamp != self.countdown.reset_timestamp() {
            self.countdown.retarget(record.reset_timestamp, self.clock.now_ms());
        }
        record
    }

    // =========================================================================
    // PLAY
    // =========================================================================

    /// Start a match if the player has a life to spend.
    ///
    /// With no lives left this queues an error notification and changes
    /// nothing.
    pub fn request_play(&mut self) -> Result<(), PlayError> {
        if self.game.is_some() {
            return Err(PlayError::Game(GameError::AlreadyPlaying));
        }

        let record = self.refresh_lives();
        if record.lives == 0 {
            debug!("Play refused for {}: no lives", self.player_key());
            self.notifications.push(Notification::error(OUT_OF_LIVES));
            return Err(PlayError::OutOfLives);
        }

        let key = self.player_key();
        let now = self.clock.now_ms();
        let seed = derive_session_seed(&key, now);

        let mut session = GameSession::new(&self.game_config);
        session.start(now, seed, &self.game_config)?;
        info!("Match started for {} ({} lives, seed {})", key, record.lives, seed);

        self.game = Some(session);
        self.match_key = Some(key);
        Ok(())
    }

    /// Advance the open game to the current time.
    pub fn frame(&mut self) -> TickResult {
        let now = self.clock.now_ms();
        let Some(game) = self.game.as_mut() else {
            return TickResult::default();
        };

        let result = tick(game, now, &self.game_config);
        if result.match_ended {
            self.open_result_screen();
        }
        result
    }

    /// Hit an entity by id.
    ///
    /// A hit landing after the final second ends the match instead, and the
    /// result screen opens.
    pub fn hit(&mut self, entity_id: EntityId) -> Result<HitOutcome, PlayError> {
        let now = self.clock.now_ms();
        let game = self.game.as_mut().ok_or(PlayError::NoGame)?;
        let outcome = hit(game, entity_id, now, &self.game_config);
        self.open_result_screen();
        Ok(outcome?)
    }

    /// Tap the field at `point`.
    pub fn tap(&mut self, point: FieldPosition) -> Result<HitOutcome, PlayError> {
        let now = self.clock.now_ms();
        let game = self.game.as_mut().ok_or(PlayError::NoGame)?;
        let outcome = hit_at(game, point, now, &self.game_config);
        self.open_result_screen();
        Ok(outcome?)
    }

    fn open_result_screen(&mut self) {
        if self.result_screen.is_some() {
            return;
        }
        if let Some(game) = self.game.as_ref().filter(|g| g.is_ended()) {
            self.result_screen = Some(ResultScreen::new(game.score));
        }
    }

    /// The open game.
    pub fn game(&self) -> Option<&GameSession> {
        self.game.as_ref()
    }

    /// Phase of the open game.
    pub fn phase(&self) -> Option<MatchPhase> {
        self.game.as_ref().map(|g| g.phase)
    }

    /// Result screen of a finished match.
    pub fn result_screen(&self) -> Option<&ResultScreen> {
        self.result_screen.as_ref()
    }

    /// Result screen of a finished match, mutably.
    pub fn result_screen_mut(&mut self) -> Option<&mut ResultScreen> {
        self.result_screen.as_mut()
    }

    /// Submit the finished match's score in the background.
    pub fn submit_score(&mut self, ctx: SubmitContext) -> Result<(), PlayError> {
        let address = self.wallet.address().cloned();
        let screen = self.result_screen.as_mut().ok_or(PlayError::MatchNotOver)?;
        screen.begin_submission(address, ctx)?;
        Ok(())
    }

    /// Offer to share an accepted score.
    pub async fn share_score(&mut self, share: &dyn SocialShare) -> bool {
        let Some(final_score) = self
            .result_screen
            .as_ref()
            .and_then(|s| s.accepted())
            .map(|r| r.final_score)
        else {
            return false;
        };
        share_or_notify(share, &score_post(final_score), &mut self.notifications).await
    }

    /// Dismiss the result screen, spending one life.
    ///
    /// The life is taken from the identity that started the match. A
    /// submission still in flight finishes in the background.
    pub fn on_match_end(&mut self) -> Result<LivesRecord, PlayError> {
        match self.phase() {
            None => return Err(PlayError::NoGame),
            Some(MatchPhase::Result) => {}
            Some(_) => return Err(PlayError::MatchNotOver),
        }

        let key = self.match_key.take().unwrap_or_else(|| self.player_key());
        let record = self.lives.adjust(&key, LivesUpdate::debit_one());
        info!("Match closed for {}: {} lives left", key, record.lives);

        if let Some(screen) = self.result_screen.take() {
            screen.dismiss();
        }
        self.game = None;
        self.refresh_lives();
        Ok(record)
    }

    /// Leave a running match early. Costs a life like a finished one.
    pub fn abandon_match(&mut self) -> Result<LivesRecord, PlayError> {
        let now = self.clock.now_ms();
        let game = self.game.as_mut().ok_or(PlayError::NoGame)?;
        force_end(game, now);
        self.open_result_screen();
        self.on_match_end()
    }

    // =========================================================================
    // PURCHASES
    // =========================================================================

    /// Buy lives: send `buyLives()` at the configured price and apply the
    /// confirmed outcome.
    pub async fn purchase_lives(&mut self, hub: &dyn GameHubContract) -> Result<TxOutcome, ChainError> {
        let tx = match hub.buy_lives(self.chain.lives_price_wei).await {
            Ok(tx) => tx,
            Err(e) => {
                warn!("Lives purchase not sent: {}", e);
                self.notifications.push(Notification::error(PURCHASE_FAILED));
                return Err(e);
            }
        };
        debug!("Lives purchase sent: {}", tx);

        match hub.wait_for_receipt(&tx).await {
            Ok(outcome) => {
                self.on_purchase_outcome(&tx, outcome.succeeded());
                Ok(outcome)
            }
            Err(e) => {
                // Left unprocessed so a later confirmation can still credit
                warn!("No receipt for lives purchase {}: {}", tx, e);
                self.notifications.push(Notification::error(PURCHASE_FAILED));
                Err(e)
            }
        }
    }

    /// Apply a purchase outcome once per transaction.
    ///
    /// Success credits lives to the current identity; failure queues an
    /// error notification. Returns false for an already-processed
    /// transaction.
    pub fn on_purchase_outcome(&mut self, tx: &TxHash, succeeded: bool) -> bool {
        if !self.processed_txs.insert(tx.clone()) {
            debug!("Ignoring repeated purchase outcome for {}", tx);
            return false;
        }

        if succeeded {
            let credit = self.chain.lives_per_purchase;
            let key = self.player_key();
            let record = self.lives.adjust(&key, LivesUpdate::credit(credit));
            info!("Purchase {} confirmed: {} lives", tx, record.lives);
            self.notifications.push(Notification::success(purchase_succeeded(credit)));
        } else {
            warn!("Purchase {} failed", tx);
            self.notifications.push(Notification::error(PURCHASE_FAILED));
        }
        true
    }

    // =========================================================================
    // REWARDS
    // =========================================================================

    /// Read the connected wallet's claimable reward.
    pub async fn check_claim(&mut self, hub: &dyn GameHubContract) -> Result<u128, ClaimError> {
        self.claim.check_eligibility(hub, self.wallet.address()).await
    }

    /// Claim the connected wallet's reward.
    pub async fn claim_reward(
        &mut self,
        hub: &dyn GameHubContract,
        share: &dyn SocialShare,
    ) -> Result<TxHash, ClaimError> {
        self.claim
            .claim(hub, share, self.wallet.address(), &mut self.notifications)
            .await
    }

    /// Claim panel state.
    pub fn claim_flow(&self) -> &ClaimFlow {
        &self.claim
    }

    // =========================================================================
    // DISPLAY
    // =========================================================================

    /// Drive the reset countdown. Returns the new display when it changed.
    pub fn countdown_tick(&mut self) -> Option<String> {
        let now = self.clock.now_ms();
        self.countdown.tick(now).map(str::to_string)
    }

    /// The reset countdown.
    pub fn countdown(&self) -> &ResetCountdown {
        &self.countdown
    }

    /// Chain configuration.
    pub fn chain_config(&self) -> &ChainClientConfig {
        &self.chain
    }

    /// Game configuration.
    pub fn game_config(&self) -> &GameConfig {
        &self.game_config
    }

    /// Queued notifications.
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Take queued notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::countdown::READY;
    use crate::app::notification::CLAIM_FAILED;
    use crate::core::clock::{EpochMillis, ManualClock};
    use crate::game::state::EntityKind;
    use crate::game::submit::SubmissionState;
    use crate::lives::record::RESET_WINDOW_MS;
    use crate::lives::storage::MemoryStorage;
    use crate::network::chain::DEFAULT_HUB_ADDRESS;
    use crate::testing::{FakeHub, FakeLeaderboard, FakeShare, FakeSigner, PLAYER};

    const NOW: EpochMillis = 1_700_000_000_000;

    fn orchestrator() -> (SessionOrchestrator<MemoryStorage>, ManualClock) {
        orchestrator_with(MemoryStorage::new())
    }

    fn orchestrator_with(storage: MemoryStorage) -> (SessionOrchestrator<MemoryStorage>, ManualClock) {
        let clock = ManualClock::new(NOW);
        let chain = ChainClientConfig::for_hub(Address::parse(DEFAULT_HUB_ADDRESS).unwrap());
        let orch = SessionOrchestrator::new(chain, GameConfig::default(), storage, Arc::new(clock.clone()));
        (orch, clock)
    }

    fn player() -> Address {
        Address::parse(PLAYER).unwrap()
    }

    /// Run the open match to its end at 60 fps.
    fn play_out(orch: &mut SessionOrchestrator<MemoryStorage>, clock: &ManualClock) {
        for _ in 0..(31 * 60) {
            clock.advance(17);
            if orch.frame().match_ended {
                break;
            }
        }
        assert_eq!(orch.phase(), Some(MatchPhase::Result));
    }

    fn tx(n: u8) -> TxHash {
        TxHash::from_bytes([n; 32])
    }

    #[test]
    fn test_fresh_key_defaults() {
        let (mut orch, _) = orchestrator();
        assert_eq!(
            orch.lives_record(),
            LivesRecord { lives: 2, reset_timestamp: NOW + 86_400_000 }
        );
        assert_eq!(orch.countdown().display(), "24:00:00");
    }

    #[test]
    fn test_two_matches_then_out_of_lives() {
        let (mut orch, clock) = orchestrator();

        for expected in [1, 0] {
            orch.request_play().unwrap();
            assert_eq!(orch.phase(), Some(MatchPhase::Playing));
            play_out(&mut orch, &clock);
            assert_eq!(orch.on_match_end().unwrap().lives, expected);
            assert!(orch.game().is_none());
        }

        assert_eq!(orch.request_play(), Err(PlayError::OutOfLives));
        assert!(orch.game().is_none());
        assert_eq!(orch.take_notifications(), vec![Notification::error(OUT_OF_LIVES)]);
    }

    #[test]
    fn test_match_end_requires_result() {
        let (mut orch, _) = orchestrator();
        assert_eq!(orch.on_match_end(), Err(PlayError::NoGame));

        orch.request_play().unwrap();
        assert_eq!(orch.on_match_end(), Err(PlayError::MatchNotOver));
        assert_eq!(orch.lives(), 2);
    }

    #[test]
    fn test_debit_ignores_score() {
        let (mut orch, clock) = orchestrator();
        orch.request_play().unwrap();

        // Catch whatever the initial supply spawned
        clock.advance(450);
        orch.frame();
        let ids: Vec<_> = orch
            .game()
            .unwrap()
            .entities
            .values()
            .filter(|e| e.kind == EntityKind::Collectible)
            .map(|e| e.id)
            .collect();
        for id in ids {
            orch.hit(id).unwrap();
        }
        assert!(orch.game().unwrap().score > 0);

        play_out(&mut orch, &clock);
        assert_eq!(orch.on_match_end().unwrap().lives, 1);
    }

    #[test]
    fn test_late_hit_ends_match() {
        let (mut orch, clock) = orchestrator();
        orch.request_play().unwrap();

        clock.advance(450);
        orch.frame();
        let id = *orch.game().unwrap().entities.keys().next().unwrap();

        // The player stalls past the final second before tapping
        clock.advance(30_000);
        assert_eq!(orch.hit(id), Err(PlayError::Game(GameError::NotPlaying)));
        assert_eq!(orch.phase(), Some(MatchPhase::Result));
        assert_eq!(orch.game().unwrap().score, 0);
        assert_eq!(orch.result_screen().map(|s| s.final_score()), Some(0));
        assert_eq!(orch.on_match_end().unwrap().lives, 1);
    }

    #[test]
    fn test_abandon_costs_a_life() {
        let (mut orch, _) = orchestrator();
        orch.request_play().unwrap();
        assert_eq!(orch.abandon_match().unwrap().lives, 1);
        assert!(orch.game().is_none());
    }

    #[test]
    fn test_purchase_outcome_idempotent() {
        let (mut orch, _) = orchestrator();

        assert!(orch.on_purchase_outcome(&tx(1), true));
        assert!(!orch.on_purchase_outcome(&tx(1), true));
        assert_eq!(orch.lives(), 7);
        assert_eq!(
            orch.take_notifications(),
            vec![Notification::success("Purchase successful! You've received 5 extra lives.")]
        );

        // A different transaction still credits
        assert!(orch.on_purchase_outcome(&tx(2), true));
        assert_eq!(orch.lives(), 12);
    }

    #[test]
    fn test_failed_purchase_notifies_without_credit() {
        let (mut orch, _) = orchestrator();
        assert!(orch.on_purchase_outcome(&tx(3), false));
        assert_eq!(orch.lives(), 2);
        assert_eq!(orch.take_notifications(), vec![Notification::error(PURCHASE_FAILED)]);

        // Repeated failure is ignored too
        assert!(!orch.on_purchase_outcome(&tx(3), true));
        assert_eq!(orch.lives(), 2);
    }

    #[test]
    fn test_identity_switch_changes_record() {
        let (mut orch, _) = orchestrator();
        orch.on_purchase_outcome(&tx(1), true);
        assert_eq!(orch.lives(), 7);

        assert_eq!(orch.connect(player()).lives, 2);
        assert_eq!(orch.player_key(), format!("lives_game_{}", PLAYER));

        assert_eq!(orch.disconnect().lives, 7);
        assert_eq!(orch.player_key(), "lives_game_guest");
    }

    #[test]
    fn test_debit_goes_to_identity_that_played() {
        let (mut orch, clock) = orchestrator();
        orch.request_play().unwrap();
        orch.connect(player());
        play_out(&mut orch, &clock);
        orch.on_match_end().unwrap();

        assert_eq!(orch.lives(), 2);
        orch.disconnect();
        assert_eq!(orch.lives(), 1);
    }

    #[test]
    fn test_daily_reset_restores_lives() {
        let (mut orch, clock) = orchestrator();
        orch.request_play().unwrap();
        orch.abandon_match().unwrap();
        orch.request_play().unwrap();
        orch.abandon_match().unwrap();
        assert_eq!(orch.lives(), 0);

        clock.advance(RESET_WINDOW_MS);
        assert_eq!(orch.lives(), 2);
        orch.request_play().unwrap();
    }

    #[test]
    fn test_countdown_stops_at_ready() {
        let (mut orch, clock) = orchestrator();
        clock.advance(1_000);
        assert_eq!(orch.countdown_tick().as_deref(), Some("23:59:59"));
        assert_eq!(orch.countdown_tick(), None);

        clock.advance(RESET_WINDOW_MS);
        assert_eq!(orch.countdown_tick().as_deref(), Some(READY));
        clock.advance(1_000);
        assert_eq!(orch.countdown_tick(), None);

        // Reading lives starts a new window and the countdown with it
        orch.lives();
        assert!(orch.countdown().is_running());
    }

    #[test]
    fn test_persistence_failure_keeps_playing() {
        let (mut orch, clock) = orchestrator_with(MemoryStorage::read_only());
        orch.request_play().unwrap();
        play_out(&mut orch, &clock);
        assert_eq!(orch.on_match_end().unwrap().lives, 1);
        assert_eq!(orch.lives(), 1);
    }

    #[tokio::test]
    async fn test_purchase_flow() {
        let (mut orch, _) = orchestrator();
        let hub = FakeHub::new();

        assert_eq!(orch.purchase_lives(&hub).await, Ok(TxOutcome::Succeeded));
        assert_eq!(hub.purchases(), vec![180_000_000_000_000]);
        assert_eq!(orch.lives(), 7);
    }

    #[tokio::test]
    async fn test_rejected_purchase() {
        let (mut orch, _) = orchestrator();
        let hub = FakeHub::new();
        hub.reject_transactions();

        assert!(matches!(orch.purchase_lives(&hub).await, Err(ChainError::Rejected(_))));
        assert_eq!(orch.lives(), 2);
        assert_eq!(orch.take_notifications(), vec![Notification::error(PURCHASE_FAILED)]);
    }

    #[tokio::test]
    async fn test_missing_receipt_can_still_credit() {
        let (mut orch, _) = orchestrator();
        let hub = FakeHub::new();
        hub.fail_receipts();

        assert!(matches!(orch.purchase_lives(&hub).await, Err(ChainError::Rpc(_))));
        assert_eq!(orch.lives(), 2);
        assert_eq!(orch.take_notifications(), vec![Notification::error(PURCHASE_FAILED)]);

        // The confirmation arrives later through the outcome callback
        assert!(orch.on_purchase_outcome(&tx(1), true));
        assert_eq!(orch.lives(), 7);
    }

    #[tokio::test]
    async fn test_reverted_purchase() {
        let (mut orch, _) = orchestrator();
        let hub = FakeHub::new();
        hub.set_outcome(TxOutcome::Failed);

        assert_eq!(orch.purchase_lives(&hub).await, Ok(TxOutcome::Failed));
        assert_eq!(orch.lives(), 2);
        assert_eq!(orch.take_notifications(), vec![Notification::error(PURCHASE_FAILED)]);
    }

    #[tokio::test]
    async fn test_submit_and_share_score() {
        let (mut orch, clock) = orchestrator();
        orch.connect(player());
        orch.request_play().unwrap();

        clock.advance(450);
        orch.frame();
        let first = *orch.game().unwrap().entities.keys().next().unwrap();
        orch.hit(first).unwrap();
        play_out(&mut orch, &clock);

        let api = FakeLeaderboard::accepting();
        let ctx = SubmitContext {
            clock: Arc::new(clock.clone()),
            signer: Arc::new(FakeSigner::approving()),
            api: api.clone(),
        };
        orch.submit_score(ctx).unwrap();
        let state = orch.result_screen_mut().unwrap().settle().await.clone();
        assert!(matches!(state, SubmissionState::Accepted(_)));
        assert_eq!(api.submissions()[0].score, 1);

        let share = FakeShare::working();
        assert!(orch.share_score(&share).await);
        assert!(share.posts()[0].text.contains("1 points"));

        assert_eq!(orch.on_match_end().unwrap().lives, 1);
    }

    #[tokio::test]
    async fn test_guest_cannot_submit() {
        let (mut orch, clock) = orchestrator();
        orch.request_play().unwrap();
        play_out(&mut orch, &clock);
        let ctx = SubmitContext {
            clock: Arc::new(clock.clone()),
            signer: Arc::new(FakeSigner::approving()),
            api: FakeLeaderboard::accepting(),
        };
        assert_eq!(
            orch.submit_score(ctx),
            Err(PlayError::Submit(SubmitError::MissingIdentity))
        );
    }

    #[tokio::test]
    async fn test_claim_through_orchestrator() {
        let (mut orch, _) = orchestrator();
        let hub = FakeHub::new();
        hub.set_claimable(2_000_000);
        hub.set_outcome(TxOutcome::Failed);
        let share = FakeShare::working();

        assert_eq!(orch.check_claim(&hub).await, Err(ClaimError::NotConnected));

        orch.connect(player());
        assert_eq!(orch.check_claim(&hub).await, Ok(2_000_000));
        assert_eq!(orch.claim_flow().display_amount().as_deref(), Some("2 USDC"));

        assert!(orch.claim_reward(&hub, &share).await.is_err());
        assert_eq!(orch.take_notifications(), vec![Notification::error(CLAIM_FAILED)]);
    }
}

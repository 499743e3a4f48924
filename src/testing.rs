//! In-memory fakes of the external collaborators, for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::app::share::{ShareError, SharePost, SocialShare};
use crate::network::api::{ApiError, LeaderboardApi};
use crate::network::chain::{ChainError, GameHubContract, TxHash, TxOutcome};
use crate::network::protocol::{LeaderboardEntry, SubmissionResult, SubmitScoreRequest};
use crate::network::wallet::{Address, MessageSigner, WalletError};

/// A player wallet used across tests.
pub const PLAYER: &str = "0x1111111111111111111111111111111111111111";

/// Signer that approves or rejects every request.
pub struct FakeSigner {
    approve: bool,
    requests: AtomicUsize,
}

impl FakeSigner {
    pub fn approving() -> Self {
        Self { approve: true, requests: AtomicUsize::new(0) }
    }

    pub fn rejecting() -> Self {
        Self { approve: false, requests: AtomicUsize::new(0) }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageSigner for FakeSigner {
    async fn sign_message(&self, message: &str) -> Result<String, WalletError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.approve {
            Ok(format!("signed:{message}"))
        } else {
            Err(WalletError::SignatureRejected("User rejected the request.".to_string()))
        }
    }
}

/// Leaderboard backend that records submissions.
pub struct FakeLeaderboard {
    failure: Option<ApiError>,
    submissions: Mutex<Vec<SubmitScoreRequest>>,
    board: Vec<LeaderboardEntry>,
}

impl FakeLeaderboard {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            failure: None,
            submissions: Mutex::new(Vec::new()),
            board: Vec::new(),
        })
    }

    pub fn failing(error: ApiError) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(error),
            submissions: Mutex::new(Vec::new()),
            board: Vec::new(),
        })
    }

    pub fn with_board(board: Vec<LeaderboardEntry>) -> Arc<Self> {
        Arc::new(Self {
            failure: None,
            submissions: Mutex::new(Vec::new()),
            board,
        })
    }

    pub fn submissions(&self) -> Vec<SubmitScoreRequest> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl LeaderboardApi for FakeLeaderboard {
    async fn submit_score(&self, request: &SubmitScoreRequest) -> Result<SubmissionResult, ApiError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.submissions.lock().unwrap().push(request.clone());
        Ok(SubmissionResult {
            message: "Score submitted!".to_string(),
            final_score: request.score,
        })
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.board.clone()),
        }
    }
}

#[derive(Default)]
struct HubState {
    claimable: u128,
    clear_on_claim: bool,
    outcome: Option<TxOutcome>,
    reject: bool,
    receipt_error: bool,
    purchases: Vec<u128>,
    claims: usize,
    sent: u8,
}

/// Game hub contract with scripted outcomes.
#[derive(Default)]
pub struct FakeHub {
    state: Mutex<HubState>,
}

impl FakeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_claimable(&self, amount: u128) {
        self.state.lock().unwrap().claimable = amount;
    }

    pub fn clear_claimable_on_claim(&self) {
        self.state.lock().unwrap().clear_on_claim = true;
    }

    pub fn set_outcome(&self, outcome: TxOutcome) {
        self.state.lock().unwrap().outcome = Some(outcome);
    }

    pub fn reject_transactions(&self) {
        self.state.lock().unwrap().reject = true;
    }

    pub fn fail_receipts(&self) {
        self.state.lock().unwrap().receipt_error = true;
    }

    pub fn purchases(&self) -> Vec<u128> {
        self.state.lock().unwrap().purchases.clone()
    }

    pub fn claims(&self) -> usize {
        self.state.lock().unwrap().claims
    }

    fn send(state: &mut HubState) -> Result<TxHash, ChainError> {
        if state.reject {
            return Err(ChainError::Rejected("User rejected the request.".to_string()));
        }
        state.sent += 1;
        Ok(TxHash::from_bytes([state.sent; 32]))
    }
}

#[async_trait]
impl GameHubContract for FakeHub {
    async fn buy_lives(&self, value_wei: u128) -> Result<TxHash, ChainError> {
        let mut state = self.state.lock().unwrap();
        let tx = Self::send(&mut state)?;
        state.purchases.push(value_wei);
        Ok(tx)
    }

    async fn claim_reward(&self) -> Result<TxHash, ChainError> {
        let mut state = self.state.lock().unwrap();
        let tx = Self::send(&mut state)?;
        state.claims += 1;
        if state.clear_on_claim {
            state.claimable = 0;
        }
        Ok(tx)
    }

    async fn claimable_tokens(&self, _account: &Address) -> Result<u128, ChainError> {
        Ok(self.state.lock().unwrap().claimable)
    }

    async fn wait_for_receipt(&self, _tx: &TxHash) -> Result<TxOutcome, ChainError> {
        let state = self.state.lock().unwrap();
        if state.receipt_error {
            return Err(ChainError::Rpc("receipt timeout".to_string()));
        }
        Ok(state.outcome.unwrap_or(TxOutcome::Succeeded))
    }
}

/// Social client that records posts.
pub struct FakeShare {
    working: bool,
    posts: Mutex<Vec<SharePost>>,
}

impl FakeShare {
    pub fn working() -> Self {
        Self { working: true, posts: Mutex::new(Vec::new()) }
    }

    pub fn broken() -> Self {
        Self { working: false, posts: Mutex::new(Vec::new()) }
    }

    pub fn posts(&self) -> Vec<SharePost> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SocialShare for FakeShare {
    async fn compose(&self, post: &SharePost) -> Result<(), ShareError> {
        if !self.working {
            return Err(ShareError::Unavailable("not inside the social client".to_string()));
        }
        self.posts.lock().unwrap().push(post.clone());
        Ok(())
    }
}

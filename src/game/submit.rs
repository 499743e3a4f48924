//! Score Submission
//!
//! After a match the player may submit the final score once: the wallet
//! signs a message embedding the score, a single-use nonce and a timestamp,
//! and the signed payload is posted to the leaderboard API. Nothing is
//! retried automatically.

use std::sync::Arc;

use futures_util::FutureExt;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::clock::{Clock, EpochMillis};
use crate::network::api::{ApiError, LeaderboardApi};
use crate::network::protocol::{SubmissionResult, SubmitScoreRequest};
use crate::network::wallet::{Address, MessageSigner, WalletError};

/// Shown when there is nothing worth submitting.
pub const NOTHING_TO_SUBMIT: &str = "You must have a score greater than 0 to submit.";

/// Shown when no wallet is connected.
pub const CONNECT_TO_SUBMIT: &str = "Connect your wallet to submit a score.";

/// Shown for failures without a server-provided message.
pub const SUBMIT_FAILED: &str = "Failed to submit score.";

/// Shown when the result screen already made its attempt.
pub const ALREADY_SUBMITTED: &str = "This score has already been submitted.";

/// Submission errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// No wallet connected.
    #[error("no wallet connected")]
    MissingIdentity,

    /// Score is zero.
    #[error("score must be greater than 0")]
    NothingToSubmit,

    /// The wallet refused to sign.
    #[error("signature rejected: {0}")]
    SignatureRejected(#[from] WalletError),

    /// The leaderboard API failed.
    #[error("leaderboard api error: {0}")]
    Api(#[from] ApiError),

    /// This result screen already submitted.
    #[error("submission already attempted")]
    AlreadyAttempted,
}

impl SubmitError {
    /// Text to show the player.
    ///
    /// Server messages pass through verbatim; everything else maps to a
    /// fixed message.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::MissingIdentity => CONNECT_TO_SUBMIT.to_string(),
            SubmitError::NothingToSubmit => NOTHING_TO_SUBMIT.to_string(),
            SubmitError::Api(ApiError::Server { message, .. }) => message.clone(),
            SubmitError::SignatureRejected(_) | SubmitError::Api(_) => SUBMIT_FAILED.to_string(),
            SubmitError::AlreadyAttempted => ALREADY_SUBMITTED.to_string(),
        }
    }

    /// Did this fail before anything left the process?
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SubmitError::MissingIdentity | SubmitError::NothingToSubmit | SubmitError::AlreadyAttempted
        )
    }
}

/// The plaintext the wallet signs.
pub fn submission_message(score: u32, nonce: &str, timestamp: EpochMillis) -> String {
    format!("I scored {score} in Catch The Mine! Nonce: {nonce}, Timestamp: {timestamp}")
}

/// Fresh single-use nonce.
pub fn generate_nonce() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Check that a score may be submitted. Makes no network calls.
pub fn validate_submission(address: Option<&Address>, score: u32) -> Result<&Address, SubmitError> {
    let address = address.ok_or(SubmitError::MissingIdentity)?;
    if score == 0 {
        return Err(SubmitError::NothingToSubmit);
    }
    Ok(address)
}

/// Sign and submit `score` for `address`.
pub async fn submit_score(
    address: Option<&Address>,
    score: u32,
    clock: &dyn Clock,
    signer: &dyn MessageSigner,
    api: &dyn LeaderboardApi,
) -> Result<SubmissionResult, SubmitError> {
    let address = validate_submission(address, score)?;

    let timestamp = clock.now_ms();
    let nonce = generate_nonce();
    let message = submission_message(score, &nonce, timestamp);

    debug!("Requesting signature from {}", address.short());
    let signature = signer.sign_message(&message).await.map_err(|e| {
        warn!("Signature request failed: {}", e);
        SubmitError::SignatureRejected(e)
    })?;

    let request = SubmitScoreRequest {
        address: address.to_string(),
        score,
        message,
        signature,
        timestamp,
        nonce,
    };

    let result = api.submit_score(&request).await.map_err(|e| {
        warn!("Score submission failed: {}", e);
        SubmitError::Api(e)
    })?;

    info!("Score {} accepted as {}: {}", score, result.final_score, result.message);
    Ok(result)
}

// =============================================================================
// RESULT SCREEN
// =============================================================================

/// Collaborators a submission needs.
#[derive(Clone)]
pub struct SubmitContext {
    /// Timestamp source
    pub clock: Arc<dyn Clock>,
    /// Wallet signer
    pub signer: Arc<dyn MessageSigner>,
    /// Score backend
    pub api: Arc<dyn LeaderboardApi>,
}

/// Where the result screen's submission stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// Nothing sent yet
    #[default]
    Idle,
    /// Waiting on the wallet or the API
    Pending,
    /// Server accepted the score
    Accepted(SubmissionResult),
    /// Failed with a player-facing message
    Failed(String),
}

type SubmitTask = JoinHandle<Result<SubmissionResult, SubmitError>>;

/// The post-match screen and its single submission attempt.
pub struct ResultScreen {
    final_score: u32,
    state: SubmissionState,
    attempted: bool,
    task: Option<SubmitTask>,
}

impl ResultScreen {
    /// Screen for a finished match.
    pub fn new(final_score: u32) -> Self {
        Self {
            final_score,
            state: SubmissionState::Idle,
            attempted: false,
            task: None,
        }
    }

    /// The frozen match score.
    pub fn final_score(&self) -> u32 {
        self.final_score
    }

    /// Current submission state.
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Accepted result, if any.
    pub fn accepted(&self) -> Option<&SubmissionResult> {
        match &self.state {
            SubmissionState::Accepted(result) => Some(result),
            _ => None,
        }
    }

    /// Is a submission in flight?
    pub fn is_pending(&self) -> bool {
        self.task.is_some()
    }

    /// Start the submission in the background. Must run inside a tokio runtime.
    ///
    /// Validation failures are reported immediately and do not use up the
    /// attempt. Once the request has been handed to the wallet, further
    /// calls fail with [`SubmitError::AlreadyAttempted`].
    pub fn begin_submission(&mut self, address: Option<Address>, ctx: SubmitContext) -> Result<(), SubmitError> {
        if self.attempted {
            return Err(SubmitError::AlreadyAttempted);
        }
        if let Err(e) = validate_submission(address.as_ref(), self.final_score) {
            self.state = SubmissionState::Failed(e.user_message());
            return Err(e);
        }

        self.attempted = true;
        self.state = SubmissionState::Pending;

        let score = self.final_score;
        self.task = Some(tokio::spawn(async move {
            let result = submit_score(
                address.as_ref(),
                score,
                ctx.clock.as_ref(),
                ctx.signer.as_ref(),
                ctx.api.as_ref(),
            )
            .await;
            debug!("Submission of {} settled: {}", score, result.is_ok());
            result
        }));
        Ok(())
    }

    /// Pick up the outcome if the submission has settled. Never blocks.
    pub fn poll(&mut self) -> &SubmissionState {
        if let Some(mut task) = self.task.take() {
            match (&mut task).now_or_never() {
                Some(joined) => self.settle_with(joined),
                None => self.task = Some(task),
            }
        }
        &self.state
    }

    /// Wait for the submission to settle.
    pub async fn settle(&mut self) -> &SubmissionState {
        if let Some(task) = self.task.take() {
            let joined = task.await;
            self.settle_with(joined);
        }
        &self.state
    }

    /// Leave the screen. An in-flight submission keeps running in the
    /// background and its outcome is dropped.
    pub fn dismiss(self) {
        if self.task.is_some() {
            debug!("Result screen dismissed with submission in flight");
        }
    }

    fn settle_with(&mut self, joined: Result<Result<SubmissionResult, SubmitError>, tokio::task::JoinError>) {
        self.state = match joined {
            Ok(Ok(result)) => SubmissionState::Accepted(result),
            Ok(Err(e)) => SubmissionState::Failed(e.user_message()),
            Err(e) => {
                warn!("Submission task failed: {}", e);
                SubmissionState::Failed(SUBMIT_FAILED.to_string())
            }
        };
    }
}

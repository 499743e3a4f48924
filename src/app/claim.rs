//! Reward Claim
//!
//! Weekly leaderboard rewards accrue on the game hub contract. The player
//! checks what is claimable, claims it, and on success is offered a share
//! before the amount is read again.

use thiserror::Error;
use tracing::{info, warn};

use crate::app::notification::{Notification, Notifications, CLAIM_FAILED, CLAIM_SUCCEEDED};
use crate::app::share::{claim_post, share_or_notify, SocialShare};
use crate::network::chain::{format_token_amount, ChainError, GameHubContract, TxHash};
use crate::network::wallet::Address;

/// Ticker of the reward token.
pub const REWARD_SYMBOL: &str = "USDC";

/// Claim errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClaimError {
    /// No wallet connected.
    #[error("wallet not connected")]
    NotConnected,

    /// Nothing claimable.
    #[error("nothing to claim")]
    NothingToClaim,

    /// Contract call failed or was rejected.
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    /// The claim transaction reverted.
    #[error("claim transaction {0} reverted")]
    Reverted(TxHash),
}

/// Claim panel state.
#[derive(Clone, Debug)]
pub struct ClaimFlow {
    decimals: u32,
    claimable: Option<u128>,
    last_claimed: Option<u128>,
}

impl ClaimFlow {
    /// Flow for a reward token with `decimals`.
    pub fn new(decimals: u32) -> Self {
        Self {
            decimals,
            claimable: None,
            last_claimed: None,
        }
    }

    /// Read the claimable amount for `account`.
    pub async fn check_eligibility(
        &mut self,
        hub: &dyn GameHubContract,
        account: Option<&Address>,
    ) -> Result<u128, ClaimError> {
        let account = account.ok_or(ClaimError::NotConnected)?;
        let amount = hub.claimable_tokens(account).await?;
        self.claimable = Some(amount);
        Ok(amount)
    }

    /// Last amount read, in base units.
    pub fn claimable(&self) -> Option<u128> {
        self.claimable
    }

    /// Amount taken by the last successful claim.
    pub fn last_claimed(&self) -> Option<u128> {
        self.last_claimed
    }

    /// Last amount read, e.g. `"12.5 USDC"`.
    pub fn display_amount(&self) -> Option<String> {
        self.claimable
            .map(|amount| format!("{} {}", format_token_amount(amount, self.decimals), REWARD_SYMBOL))
    }

    /// Is there something to claim?
    pub fn can_claim(&self) -> bool {
        self.claimable.is_some_and(|amount| amount > 0)
    }

    /// Claim the reward.
    ///
    /// On confirmation: success notification, share offer, then a fresh
    /// read of the claimable amount. On failure: error notification.
    pub async fn claim(
        &mut self,
        hub: &dyn GameHubContract,
        share: &dyn SocialShare,
        account: Option<&Address>,
        notifications: &mut Notifications,
    ) -> Result<TxHash, ClaimError> {
        if account.is_none() {
            return Err(ClaimError::NotConnected);
        }
        let amount = match self.claimable {
            Some(amount) if amount > 0 => amount,
            _ => return Err(ClaimError::NothingToClaim),
        };

        let tx = match self.send_claim(hub).await {
            Ok(tx) => tx,
            Err(e) => {
                warn!("Claim failed: {}", e);
                notifications.push(Notification::error(CLAIM_FAILED));
                return Err(e);
            }
        };

        self.last_claimed = Some(amount);
        let amount_text = format_token_amount(amount, self.decimals);
        info!("Claimed {} {} in {}", amount_text, REWARD_SYMBOL, tx);

        notifications.push(Notification::success(CLAIM_SUCCEEDED));
        share_or_notify(share, &claim_post(&amount_text), notifications).await;

        if let Err(e) = self.check_eligibility(hub, account).await {
            warn!("Could not refresh claimable amount: {}", e);
        }
        Ok(tx)
    }

    async fn send_claim(&self, hub: &dyn GameHubContract) -> Result<TxHash, ClaimError> {
        let tx = hub.claim_reward().await?;
        if hub.wait_for_receipt(&tx).await?.succeeded() {
            Ok(tx)
        } else {
            Err(ClaimError::Reverted(tx))
        }
    }
}

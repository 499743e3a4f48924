//! Game Hub Contract Collaborator
//!
//! The on-chain reward contract exposes `buyLives()` (payable),
//! `claimableTokens(address)` and `claimReward()`. Transaction semantics are
//! opaque here: a write yields a transaction hash, and waiting on it yields
//! success or failure.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::wallet::Address;

/// Default game hub contract.
pub const DEFAULT_HUB_ADDRESS: &str = "0x24f544cf8ef819cdb1063c2ca9dc5464afadec05";

/// Base mainnet.
pub const DEFAULT_CHAIN_ID: u64 = 8453;

/// 0.00018 ETH.
pub const DEFAULT_LIVES_PRICE_WEI: u128 = 180_000_000_000_000;

/// Lives credited per successful purchase.
pub const LIVES_PER_PURCHASE: u32 = 5;

/// Reward token decimals (USDC).
pub const REWARD_DECIMALS: u32 = 6;

/// Chain-side configuration handed to the orchestrator at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainClientConfig {
    /// Game hub contract address.
    pub hub_address: Address,
    /// Chain the hub is deployed on.
    pub chain_id: u64,
    /// Value sent with `buyLives()`.
    pub lives_price_wei: u128,
    /// Lives credited once a purchase confirms.
    pub lives_per_purchase: u32,
    /// Decimals of the reward token.
    pub reward_decimals: u32,
}

impl ChainClientConfig {
    /// Config for a given hub, other fields at their defaults.
    pub fn for_hub(hub_address: Address) -> Self {
        Self {
            hub_address,
            chain_id: DEFAULT_CHAIN_ID,
            lives_price_wei: DEFAULT_LIVES_PRICE_WEI,
            lives_per_purchase: LIVES_PER_PURCHASE,
            reward_decimals: REWARD_DECIMALS,
        }
    }
}

/// Transaction hash: `0x` + 64 hex digits, lowercase.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash(String);

impl TxHash {
    /// Parse a transaction hash.
    pub fn parse(s: &str) -> Result<Self, ChainError> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| ChainError::InvalidTxHash(s.to_string()))?;
        let bytes = hex::decode(digits).map_err(|_| ChainError::InvalidTxHash(s.to_string()))?;
        if bytes.len() != 32 {
            return Err(ChainError::InvalidTxHash(s.to_string()));
        }
        Ok(Self(format!("0x{}", hex::encode(bytes))))
    }

    /// Build from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// Hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TxHash {
    type Error = ChainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TxHash> for String {
    fn from(value: TxHash) -> Self {
        value.0
    }
}

/// Final status of a mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxOutcome {
    /// Included and succeeded.
    Succeeded,
    /// Reverted or dropped.
    Failed,
}

impl TxOutcome {
    /// Did it succeed?
    pub fn succeeded(self) -> bool {
        matches!(self, TxOutcome::Succeeded)
    }
}

/// Chain errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    /// The user rejected the transaction in their wallet.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// RPC / provider failure.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// Malformed transaction hash.
    #[error("invalid transaction hash: {0}")]
    InvalidTxHash(String),
}

/// Calls against the game hub contract.
#[async_trait]
pub trait GameHubContract: Send + Sync {
    /// Send `buyLives()` with `value_wei` attached.
    async fn buy_lives(&self, value_wei: u128) -> Result<TxHash, ChainError>;

    /// Send `claimReward()`.
    async fn claim_reward(&self) -> Result<TxHash, ChainError>;

    /// Read `claimableTokens(account)`.
    async fn claimable_tokens(&self, account: &Address) -> Result<u128, ChainError>;

    /// Wait until `tx` is mined.
    async fn wait_for_receipt(&self, tx: &TxHash) -> Result<TxOutcome, ChainError>;
}

/// Render a base-unit token amount with `decimals`, trimming trailing zeros.
///
/// `format_token_amount(1_500_000, 6)` is `"1.5"`.
pub fn format_token_amount(amount: u128, decimals: u32) -> String {
    let scale = 10u128.pow(decimals);
    let whole = amount / scale;
    let fraction = amount % scale;

    if fraction == 0 {
        return whole.to_string();
    }

    let digits = format!("{:0width$}", fraction, width = decimals as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

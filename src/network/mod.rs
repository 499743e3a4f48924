//! External Collaborators
//!
//! Wallet, on-chain contract and leaderboard backend. This layer is
//! **non-deterministic**; game rules live in `game/`.

pub mod api;
pub mod chain;
pub mod protocol;
pub mod wallet;

pub use api::{ApiError, HttpLeaderboardClient, LeaderboardApi, fetch_leaderboard_or_empty};
pub use chain::{ChainClientConfig, ChainError, GameHubContract, TxHash, TxOutcome};
pub use protocol::{LeaderboardEntry, SubmissionResult, SubmitScoreRequest};
pub use wallet::{Address, MessageSigner, WalletConnection, WalletError};

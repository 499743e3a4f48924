//! Leaderboard API Wire Format
//!
//! JSON bodies exchanged with the score backend.

use serde::{Serialize, Deserialize};

// =============================================================================
// REQUESTS
// =============================================================================

/// Body of `POST /submit-score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitScoreRequest {
    /// Submitting wallet address.
    pub address: String,
    /// Final match score.
    pub score: u32,
    /// The exact message that was signed.
    pub message: String,
    /// Wallet signature over `message`.
    pub signature: String,
    /// Epoch milliseconds embedded in `message`.
    pub timestamp: i64,
    /// Single-use nonce embedded in `message`.
    pub nonce: String,
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Success body of `POST /submit-score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    /// Server-assigned message, shown verbatim.
    pub message: String,
    /// Score the server accepted.
    #[serde(rename = "finalScore")]
    pub final_score: u32,
}

/// Error body of any non-2xx response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable cause, when the server gives one.
    #[serde(default)]
    pub message: Option<String>,
}

/// One row of `GET /leaderboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Display name.
    pub username: String,
    /// Accumulated score.
    pub score: u64,
    /// Profile picture URL.
    #[serde(default)]
    pub pfp: Option<String>,
}

impl LeaderboardEntry {
    /// Fallback avatar glyph when there is no `pfp`: the second character of
    /// the username (names are usually `@handle`), or `?`.
    pub fn avatar_initial(&self) -> char {
        self.username.chars().nth(1).unwrap_or('?')
    }
}

/// Pair each entry with its 1-based rank, preserving server order.
pub fn ranked(entries: &[LeaderboardEntry]) -> impl Iterator<Item = (usize, &LeaderboardEntry)> {
    entries.iter().enumerate().map(|(i, entry)| (i + 1, entry))
}

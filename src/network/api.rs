//! Leaderboard HTTP Client
//!
//! `POST /submit-score` and `GET /leaderboard` against the score backend.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

use crate::network::protocol::{
    ApiErrorBody, LeaderboardEntry, SubmissionResult, SubmitScoreRequest,
};

/// Shown when an error response carries no message.
pub const UNKNOWN_API_ERROR: &str = "An unknown error occurred.";

/// API errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Non-2xx response. `message` is the server's text or a generic fallback.
    #[error("{message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message to surface to the player.
        message: String,
    },

    /// Connection / transport failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// Response body was not the expected JSON.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a server error from a raw error body.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string());
        ApiError::Server { status, message }
    }
}

/// The score backend.
#[async_trait]
pub trait LeaderboardApi: Send + Sync {
    /// Submit a signed score.
    async fn submit_score(&self, request: &SubmitScoreRequest) -> Result<SubmissionResult, ApiError>;

    /// Fetch the leaderboard, best first.
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError>;
}

/// reqwest-backed [`LeaderboardApi`].
#[derive(Clone, Debug)]
pub struct HttpLeaderboardClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLeaderboardClient {
    /// Client for the API at `base_url` (trailing slash optional).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Client reusing an existing reqwest client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Full URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl LeaderboardApi for HttpLeaderboardClient {
    async fn submit_score(&self, request: &SubmitScoreRequest) -> Result<SubmissionResult, ApiError> {
        let url = self.endpoint("submit-score");
        debug!("POST {} (score {})", url, request.score);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Score submission request error: {:?}", e);
                ApiError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            error!("Score submission HTTP error: {}", status);
            return Err(ApiError::from_error_body(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let url = self.endpoint("leaderboard");
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_error_body(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Fetch the leaderboard, logging and returning an empty board on failure.
pub async fn fetch_leaderboard_or_empty(api: &dyn LeaderboardApi) -> Vec<LeaderboardEntry> {
    match api.leaderboard().await {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to fetch leaderboard: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DownApi;

    #[async_trait]
    impl LeaderboardApi for DownApi {
        async fn submit_score(&self, _: &SubmitScoreRequest) -> Result<SubmissionResult, ApiError> {
            Err(ApiError::Transport("connection refused".into()))
        }

        async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
            Err(ApiError::Transport("connection refused".into()))
        }
    }

    #[test]
    fn test_error_body_message_verbatim() {
        let err = ApiError::from_error_body(400, r#"{"message":"Invalid signature."}"#);
        assert_eq!(err.to_string(), "Invalid signature.");
        assert!(matches!(err, ApiError::Server { status: 400, .. }));
    }

    #[test]
    fn test_error_body_fallback() {
        for body in ["", "not json", "{}", r#"{"message":""}"#] {
            let err = ApiError::from_error_body(500, body);
            assert_eq!(err.to_string(), UNKNOWN_API_ERROR);
        }
    }

    #[test]
    fn test_endpoint_joining() {
        let client = HttpLeaderboardClient::new("https://api.example.com/");
        assert_eq!(client.endpoint("/submit-score"), "https://api.example.com/submit-score");
        assert_eq!(client.endpoint("leaderboard"), "https://api.example.com/leaderboard");
    }

    #[tokio::test]
    async fn test_leaderboard_failure_is_empty() {
        assert!(fetch_leaderboard_or_empty(&DownApi).await.is_empty());
    }

    #[tokio::test]
    async fn test_leaderboard_keeps_server_order() {
        let board = vec![
            LeaderboardEntry { username: "@top".into(), score: 90, pfp: None },
            LeaderboardEntry { username: "@next".into(), score: 40, pfp: None },
        ];
        let api = crate::testing::FakeLeaderboard::with_board(board.clone());

        assert_eq!(fetch_leaderboard_or_empty(api.as_ref()).await, board);
    }
}

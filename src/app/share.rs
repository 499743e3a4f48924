//! Social Share
//!
//! Composes a post about a score or a claim and hands it to the social
//! client. Sharing is optional: a failure becomes a notification.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::app::notification::{Notification, Notifications, SHARE_FAILED};

/// Link attached to every post.
pub const GAME_URL: &str = "https://www.catchthemine.xyz/";

/// Share errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShareError {
    /// The social client is missing or refused to open.
    #[error("share composer unavailable: {0}")]
    Unavailable(String),
}

/// A post to compose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePost {
    /// Body text
    pub text: String,
    /// Attached links
    pub embeds: Vec<String>,
}

/// Post announcing an accepted score.
pub fn score_post(final_score: u32) -> SharePost {
    SharePost {
        text: format!(
            "I just earned {final_score} points in Catch The Mine!\n\n\
             My points are stacking up for the next drop. Play now to win USDC every week."
        ),
        embeds: vec![GAME_URL.to_string()],
    }
}

/// Post announcing a claimed reward.
pub fn claim_post(amount: &str) -> SharePost {
    SharePost {
        text: format!(
            "I just claimed {amount} USDC from this week's Catch The Mine leaderboard!\n\n\
             Play now to win weekly USDC prizes."
        ),
        embeds: vec![GAME_URL.to_string()],
    }
}

/// Opens the social client's post composer.
#[async_trait]
pub trait SocialShare: Send + Sync {
    /// Open the composer prefilled with `post`.
    async fn compose(&self, post: &SharePost) -> Result<(), ShareError>;
}

/// Compose `post`, turning a failure into an error notification.
///
/// Returns whether the composer opened.
pub async fn share_or_notify(
    share: &dyn SocialShare,
    post: &SharePost,
    notifications: &mut Notifications,
) -> bool {
    match share.compose(post).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Share composer error: {}", e);
            notifications.push(Notification::error(SHARE_FAILED));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeShare;

    #[test]
    fn test_score_post_mentions_score() {
        let post = score_post(42);
        assert!(post.text.starts_with("I just earned 42 points"));
        assert_eq!(post.embeds, vec![GAME_URL.to_string()]);
    }

    #[test]
    fn test_claim_post_mentions_amount() {
        assert!(claim_post("12.5").text.contains("12.5 USDC"));
    }

    #[tokio::test]
    async fn test_share_success() {
        let share = FakeShare::working();
        let mut notifications = Notifications::new();

        assert!(share_or_notify(&share, &score_post(3), &mut notifications).await);
        assert!(notifications.is_empty());
        assert_eq!(share.posts().len(), 1);
    }

    #[tokio::test]
    async fn test_share_failure_notifies() {
        let share = FakeShare::broken();
        let mut notifications = Notifications::new();

        assert!(!share_or_notify(&share, &score_post(3), &mut notifications).await);
        assert_eq!(notifications.latest(), Some(&Notification::error(SHARE_FAILED)));
    }
}

//! Player Notifications
//!
//! Short success / error messages surfaced by the orchestrator, queued
//! until the presentation layer drains them.

use std::collections::VecDeque;
use serde::{Serialize, Deserialize};

/// Shown when a match is requested with no lives left.
pub const OUT_OF_LIVES: &str = "You are out of lives! Wait for the daily reset.";

/// Shown when a lives purchase fails or is rejected.
pub const PURCHASE_FAILED: &str = "Purchase failed. The transaction was rejected or reverted.";

/// Shown when a reward claim fails.
pub const CLAIM_FAILED: &str = "Claim failed. Please try again.";

/// Shown when a reward claim confirms.
pub const CLAIM_SUCCEEDED: &str = "Claim successful! Opening the share composer...";

/// Shown when the share composer cannot be opened.
pub const SHARE_FAILED: &str = "Could not open the share composer.";

/// Success copy for a confirmed purchase of `lives` lives.
pub fn purchase_succeeded(lives: u32) -> String {
    format!("Purchase successful! You've received {lives} extra lives.")
}

/// Tone of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Something worked
    Success,
    /// Something failed or was refused
    Error,
}

/// A message for the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Text to display
    pub message: String,
    /// Tone
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

impl Notification {
    /// Success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    /// Error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }

    /// Is this an error?
    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

/// FIFO of undisplayed notifications.
#[derive(Clone, Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notification.
    pub fn push(&mut self, notification: Notification) {
        self.queue.push_back(notification);
    }

    /// Most recent notification.
    pub fn latest(&self) -> Option<&Notification> {
        self.queue.back()
    }

    /// Take everything queued, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    /// Number queued.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Nothing queued?
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

//! Session Orchestration
//!
//! Everything between the player and the engine. Non-deterministic: reads
//! the wall clock and talks to external collaborators.
//!
//! ## Module Structure
//!
//! - `config`: startup configuration from the environment
//! - `orchestrator`: play gate, life debit, purchases
//! - `countdown`: reset countdown display
//! - `notification`: player-facing messages
//! - `claim`: weekly reward claim
//! - `share`: social post composition

pub mod claim;
pub mod config;
pub mod countdown;
pub mod notification;
pub mod orchestrator;
pub mod share;

pub use claim::{ClaimError, ClaimFlow};
pub use config::{AppConfig, ConfigError};
pub use countdown::{format_countdown, ResetCountdown};
pub use notification::{Notification, NotificationKind, Notifications};
pub use orchestrator::{PlayError, SessionOrchestrator};
pub use share::{ShareError, SharePost, SocialShare};

//! Reset Countdown
//!
//! `HH:MM:SS` until the lives window resets, refreshed once per second.
//! Once the reset time is reached the display reads "Ready!" and the
//! countdown stops; it only runs again when retargeted.

use crate::core::clock::{EpochMillis, SECOND_MS};

/// Display once the reset time has been reached.
pub const READY: &str = "Ready!";

const MINUTE_MS: EpochMillis = 60 * SECOND_MS;
const HOUR_MS: EpochMillis = 60 * MINUTE_MS;

/// Render the time left until a reset.
///
/// Hours are not wrapped at 24, so a full window reads `24:00:00`.
pub fn format_countdown(distance_ms: EpochMillis) -> String {
    if distance_ms <= 0 {
        return READY.to_string();
    }
    let hours = distance_ms / HOUR_MS;
    let minutes = (distance_ms % HOUR_MS) / MINUTE_MS;
    let seconds = (distance_ms % MINUTE_MS) / SECOND_MS;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// One-second countdown to a reset timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResetCountdown {
    reset_timestamp: EpochMillis,
    next_fire_at: Option<EpochMillis>,
    display: String,
}

impl ResetCountdown {
    /// Start counting down to `reset_timestamp`.
    pub fn start(reset_timestamp: EpochMillis, now: EpochMillis) -> Self {
        let mut countdown = Self {
            reset_timestamp,
            next_fire_at: None,
            display: String::new(),
        };
        countdown.retarget(reset_timestamp, now);
        countdown
    }

    /// Point at a new reset time and restart the interval.
    pub fn retarget(&mut self, reset_timestamp: EpochMillis, now: EpochMillis) {
        self.reset_timestamp = reset_timestamp;
        self.next_fire_at = Some(now + SECOND_MS);
        self.refresh(now);
    }

    /// Advance to `now`. Returns the new display if the interval fired.
    ///
    /// A late call fires once and reschedules from `now`.
    pub fn tick(&mut self, now: EpochMillis) -> Option<&str> {
        let due = self.next_fire_at?;
        if now < due {
            return None;
        }
        self.next_fire_at = Some(now + SECOND_MS);
        self.refresh(now);
        Some(self.display.as_str())
    }

    /// Stop the interval, keeping the last display.
    pub fn cancel(&mut self) {
        self.next_fire_at = None;
    }

    /// Is the interval still running?
    pub fn is_running(&self) -> bool {
        self.next_fire_at.is_some()
    }

    /// Current display.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Target reset time.
    pub fn reset_timestamp(&self) -> EpochMillis {
        self.reset_timestamp
    }

    fn refresh(&mut self, now: EpochMillis) {
        let distance = self.reset_timestamp - now;
        self.display = format_countdown(distance);
        if distance <= 0 {
            self.next_fire_at = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(format_countdown(86_400_000), "24:00:00");
        assert_eq!(format_countdown(3_661_000), "01:01:01");
        assert_eq!(format_countdown(59_999), "00:00:59");
        assert_eq!(format_countdown(999), "00:00:00");
        assert_eq!(format_countdown(0), READY);
        assert_eq!(format_countdown(-5), READY);
    }

    #[test]
    fn test_fires_once_per_second() {
        let mut countdown = ResetCountdown::start(10_000, 0);
        assert_eq!(countdown.display(), "00:00:10");

        assert_eq!(countdown.tick(500), None);
        assert_eq!(countdown.tick(1_000), Some("00:00:09"));
        assert_eq!(countdown.tick(1_999), None);
        assert_eq!(countdown.tick(2_000), Some("00:00:08"));
    }

    #[test]
    fn test_stops_at_ready() {
        let mut countdown = ResetCountdown::start(2_000, 0);
        countdown.tick(1_000);
        assert_eq!(countdown.tick(2_000), Some(READY));
        assert!(!countdown.is_running());

        // Stays stopped
        assert_eq!(countdown.tick(3_000), None);
        assert_eq!(countdown.display(), READY);
    }

    #[test]
    fn test_retarget_restarts() {
        let mut countdown = ResetCountdown::start(0, 0);
        assert!(!countdown.is_running());

        countdown.retarget(86_400_000, 0);
        assert!(countdown.is_running());
        assert_eq!(countdown.display(), "24:00:00");
    }

    #[test]
    fn test_cancel() {
        let mut countdown = ResetCountdown::start(10_000, 0);
        countdown.cancel();
        assert_eq!(countdown.tick(5_000), None);
        assert_eq!(countdown.display(), "00:00:10");
    }
}

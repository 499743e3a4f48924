//! Persisted Lives Record
//!
//! The stored shape is `{"lives": <int>, "resetTimestamp": <epoch-ms>}`.
//! Anything else is rejected at this boundary and replaced by a default.

use serde::{Serialize, Deserialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::clock::EpochMillis;

/// Lives granted by a fresh record.
pub const DEFAULT_LIVES: u32 = 2;

/// Length of an entitlement window (24 hours).
pub const RESET_WINDOW_MS: EpochMillis = 24 * 60 * 60 * 1000;

/// Entitlement policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LivesPolicy {
    /// Lives in a fresh record.
    pub default_lives: u32,
    /// How long a record stays fresh.
    pub reset_window_ms: EpochMillis,
}

impl Default for LivesPolicy {
    fn default() -> Self {
        Self {
            default_lives: DEFAULT_LIVES,
            reset_window_ms: RESET_WINDOW_MS,
        }
    }
}

/// Lives entitlement for one player key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivesRecord {
    /// Matches the player may still start.
    pub lives: u32,
    /// Instant at which this record goes stale.
    pub reset_timestamp: EpochMillis,
}

impl LivesRecord {
    /// Fresh record starting a new window at `now`.
    pub fn fresh(now: EpochMillis, policy: &LivesPolicy) -> Self {
        Self {
            lives: policy.default_lives,
            reset_timestamp: now.saturating_add(policy.reset_window_ms),
        }
    }

    /// Still inside its window?
    #[inline]
    pub fn is_fresh(&self, now: EpochMillis) -> bool {
        now < self.reset_timestamp
    }

    /// Same window, different lives count.
    pub fn with_lives(self, lives: u32) -> Self {
        Self { lives, ..self }
    }

    /// Milliseconds until the window resets (0 when already stale).
    pub fn time_until_reset(&self, now: EpochMillis) -> EpochMillis {
        (self.reset_timestamp - now).max(0)
    }

    /// JSON form for storage.
    pub fn to_json(&self) -> String {
        // Two integer fields; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Why a stored value was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// Not JSON at all.
    #[error("stored value is not JSON: {0}")]
    Malformed(String),

    /// JSON, but not an object.
    #[error("stored value is not an object")]
    NotAnObject,

    /// A required field is absent or has the wrong type.
    #[error("field `{0}` is missing or not a valid integer")]
    InvalidField(&'static str),
}

/// Parse and validate a stored record.
pub fn parse_record(raw: &str) -> Result<LivesRecord, RecordError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| RecordError::Malformed(e.to_string()))?;
    let object = value.as_object().ok_or(RecordError::NotAnObject)?;

    let lives = object
        .get("lives")
        .and_then(integral)
        .filter(|n| *n >= 0 && *n <= u32::MAX as i64)
        .ok_or(RecordError::InvalidField("lives"))?;

    let reset_timestamp = object
        .get("resetTimestamp")
        .and_then(integral)
        .ok_or(RecordError::InvalidField("resetTimestamp"))?;

    Ok(LivesRecord {
        lives: lives as u32,
        reset_timestamp,
    })
}

/// A JSON number holding an integral value (`3` or `3.0`).
fn integral(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_record() {
        let record = LivesRecord::fresh(1_000, &LivesPolicy::default());
        assert_eq!(record.lives, 2);
        assert_eq!(record.reset_timestamp, 1_000 + 86_400_000);
    }

    #[test]
    fn test_freshness_boundary() {
        let record = LivesRecord { lives: 1, reset_timestamp: 5_000 };
        assert!(record.is_fresh(4_999));
        assert!(!record.is_fresh(5_000));
        assert_eq!(record.time_until_reset(4_000), 1_000);
        assert_eq!(record.time_until_reset(6_000), 0);
    }

    #[test]
    fn test_json_shape() {
        let record = LivesRecord { lives: 7, reset_timestamp: 123 };
        assert_eq!(record.to_json(), r#"{"lives":7,"resetTimestamp":123}"#);
        assert_eq!(parse_record(&record.to_json()), Ok(record));
    }

    #[test]
    fn test_parse_accepts_integral_floats() {
        let record = parse_record(r#"{"lives":3.0,"resetTimestamp":1700000000000.0}"#).unwrap();
        assert_eq!(record.lives, 3);
        assert_eq!(record.reset_timestamp, 1_700_000_000_000);
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let record = parse_record(r#"{"lives":1,"resetTimestamp":9,"theme":"dark"}"#).unwrap();
        assert_eq!(record, LivesRecord { lives: 1, reset_timestamp: 9 });
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(matches!(parse_record("{"), Err(RecordError::Malformed(_))));
        assert_eq!(parse_record("null"), Err(RecordError::NotAnObject));
        assert_eq!(parse_record("[1,2]"), Err(RecordError::NotAnObject));
        assert_eq!(parse_record("5"), Err(RecordError::NotAnObject));
        assert_eq!(
            parse_record(r#"{"resetTimestamp":9}"#),
            Err(RecordError::InvalidField("lives"))
        );
        assert_eq!(
            parse_record(r#"{"lives":"2","resetTimestamp":9}"#),
            Err(RecordError::InvalidField("lives"))
        );
        assert_eq!(
            parse_record(r#"{"lives":-1,"resetTimestamp":9}"#),
            Err(RecordError::InvalidField("lives"))
        );
        assert_eq!(
            parse_record(r#"{"lives":1.5,"resetTimestamp":9}"#),
            Err(RecordError::InvalidField("lives"))
        );
        assert_eq!(
            parse_record(r#"{"lives":1,"resetTimestamp":null}"#),
            Err(RecordError::InvalidField("resetTimestamp"))
        );
    }
}

//! Session State Hashing
//!
//! SHA-256 digest of a game session, used to check that two sessions driven
//! by the same seed and inputs ended up in the same place.

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for session state.
///
/// Order of updates is significant.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for game session state.
    pub fn for_game_session() -> Self {
        Self::new(b"CATCH_THE_MINE_SESSION_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u16 value (little-endian).
    #[inline]
    pub fn update_u16(&mut self, value: u16) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i64 value (little-endian).
    #[inline]
    pub fn update_i64(&mut self, value: i64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute a session hash.
///
/// Seed and elapsed time go in first; `add_state` appends the rest.
pub fn compute_state_hash<F>(rng_seed: u64, elapsed_ms: i64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_game_session();

    hasher.update_u64(rng_seed);
    hasher.update_i64(elapsed_ms);

    add_state(&mut hasher);

    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_input_same_hash() {
        let a = compute_state_hash(7, 1_000, |h| h.update_u32(3));
        let b = compute_state_hash(7, 1_000, |h| h.update_u32(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_any_field_changes_hash() {
        let base = compute_state_hash(7, 1_000, |h| h.update_u32(3));
        assert_ne!(base, compute_state_hash(8, 1_000, |h| h.update_u32(3)));
        assert_ne!(base, compute_state_hash(7, 1_001, |h| h.update_u32(3)));
        assert_ne!(base, compute_state_hash(7, 1_000, |h| h.update_u32(4)));
    }

    #[test]
    fn test_domain_separation() {
        let mut a = StateHasher::new(b"A");
        let mut b = StateHasher::new(b"B");
        a.update_u8(1);
        b.update_u8(1);
        assert_ne!(a.finalize(), b.finalize());
    }
}

//! Lives Entitlement Store
//!
//! Tracks how many matches each player key may start before the daily
//! reset. Reads never fail: missing, corrupt or stale records are replaced
//! by a fresh default. Writes are best-effort: the in-memory copy always
//! advances, and a failed persistence write is only logged.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::clock::{Clock, EpochMillis};
use crate::lives::record::{parse_record, LivesPolicy, LivesRecord};
use crate::lives::storage::KeyValueStorage;
use crate::network::wallet::Address;

/// Prefix of every lives storage key.
pub const STORAGE_KEY_PREFIX: &str = "lives_game_";

/// Identity used when no wallet is connected.
pub const GUEST_IDENTITY: &str = "guest";

/// Storage key for an identity: `lives_game_<address>` or `lives_game_guest`.
pub fn storage_key(identity: Option<&Address>) -> String {
    match identity {
        Some(address) => format!("{STORAGE_KEY_PREFIX}{address}"),
        None => format!("{STORAGE_KEY_PREFIX}{GUEST_IDENTITY}"),
    }
}

/// A change to a lives count: an absolute value or a function of the
/// current count.
pub enum LivesUpdate {
    /// Replace the count.
    Set(u32),
    /// Compute the new count from the current one.
    Apply(Box<dyn FnOnce(u32) -> u32 + Send>),
}

impl LivesUpdate {
    /// Compute the new count from the current one.
    pub fn apply(f: impl FnOnce(u32) -> u32 + Send + 'static) -> Self {
        LivesUpdate::Apply(Box::new(f))
    }

    /// Take one life, never going below zero.
    pub fn debit_one() -> Self {
        Self::apply(|lives| lives.saturating_sub(1))
    }

    /// Add `amount` lives.
    pub fn credit(amount: u32) -> Self {
        Self::apply(move |lives| lives.saturating_add(amount))
    }

    fn resolve(self, current: u32) -> u32 {
        match self {
            LivesUpdate::Set(value) => value,
            LivesUpdate::Apply(f) => f(current),
        }
    }
}

impl From<u32> for LivesUpdate {
    fn from(value: u32) -> Self {
        LivesUpdate::Set(value)
    }
}

impl fmt::Debug for LivesUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LivesUpdate::Set(value) => f.debug_tuple("Set").field(value).finish(),
            LivesUpdate::Apply(_) => f.write_str("Apply(..)"),
        }
    }
}

/// Lives records for any number of player keys over one storage backend.
pub struct LivesStore<S> {
    storage: S,
    clock: Arc<dyn Clock>,
    policy: LivesPolicy,
    /// In-memory copy of every record touched this session
    records: BTreeMap<String, LivesRecord>,
}

impl<S: KeyValueStorage> LivesStore<S> {
    /// Store with the default policy.
    pub fn new(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self::with_policy(storage, clock, LivesPolicy::default())
    }

    /// Store with a custom policy.
    pub fn with_policy(storage: S, clock: Arc<dyn Clock>, policy: LivesPolicy) -> Self {
        Self {
            storage,
            clock,
            policy,
            records: BTreeMap::new(),
        }
    }

    /// Current record for `key`.
    ///
    /// Always returns a fresh record. A record that is missing, unreadable,
    /// malformed or past its reset time is replaced by a default one, which
    /// is then persisted.
    pub fn read(&mut self, key: &str) -> LivesRecord {
        let now = self.clock.now_ms();

        if let Some(record) = self.records.get(key) {
            if record.is_fresh(now) {
                return *record;
            }
        }

        let record = match self.load(key, now) {
            Some(record) => record,
            None => {
                let record = LivesRecord::fresh(now, &self.policy);
                debug!("New lives window for {}: {:?}", key, record);
                self.persist(key, &record);
                record
            }
        };

        self.records.insert(key.to_string(), record);
        record
    }

    /// Apply `update` to the lives count for `key`.
    ///
    /// The reset timestamp is kept. The in-memory record is updated even if
    /// the storage write fails.
    pub fn adjust(&mut self, key: &str, update: impl Into<LivesUpdate>) -> LivesRecord {
        let current = self.read(key);
        let record = current.with_lives(update.into().resolve(current.lives));

        debug!("Lives for {}: {} -> {}", key, current.lives, record.lives);
        self.records.insert(key.to_string(), record);
        self.persist(key, &record);
        record
    }

    /// Current lives for `key`.
    pub fn lives(&mut self, key: &str) -> u32 {
        self.read(key).lives
    }

    /// When the window for `key` resets.
    pub fn reset_timestamp(&mut self, key: &str) -> EpochMillis {
        self.read(key).reset_timestamp
    }

    /// Entitlement policy.
    pub fn policy(&self) -> &LivesPolicy {
        &self.policy
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Underlying storage, mutably.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Stored record if it is present, valid and fresh.
    fn load(&self, key: &str, now: EpochMillis) -> Option<LivesRecord> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Error reading lives for {}, using default: {}", key, e);
                return None;
            }
        };

        match parse_record(&raw) {
            Ok(record) if record.is_fresh(now) => Some(record),
            Ok(record) => {
                debug!("Lives window for {} expired at {}", key, record.reset_timestamp);
                None
            }
            Err(e) => {
                warn!("Discarding corrupt lives record for {}: {}", key, e);
                None
            }
        }
    }

    fn persist(&mut self, key: &str, record: &LivesRecord) {
        if let Err(e) = self.storage.set(key, &record.to_json()) {
            warn!("Error writing lives for {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::lives::record::RESET_WINDOW_MS;
    use crate::lives::storage::MemoryStorage;
    use proptest::prelude::*;

    const KEY: &str = "lives_game_guest";
    const NOW: EpochMillis = 1_700_000_000_000;

    fn store_with(storage: MemoryStorage) -> (LivesStore<MemoryStorage>, ManualClock) {
        let clock = ManualClock::new(NOW);
        (LivesStore::new(storage, Arc::new(clock.clone())), clock)
    }

    #[test]
    fn test_storage_key() {
        let addr = Address::parse("0x24f544cf8ef819cdb1063c2ca9dc5464afadec05").unwrap();
        assert_eq!(storage_key(None), "lives_game_guest");
        assert_eq!(
            storage_key(Some(&addr)),
            "lives_game_0x24f544cf8ef819cdb1063c2ca9dc5464afadec05"
        );
    }

    #[test]
    fn test_fresh_key_gets_default() {
        let (mut store, _) = store_with(MemoryStorage::new());
        let record = store.read(KEY);
        assert_eq!(record, LivesRecord { lives: 2, reset_timestamp: NOW + 86_400_000 });

        // The default is persisted so a reload keeps the same window
        let stored = parse_record(store.storage().raw(KEY).unwrap()).unwrap();
        assert_eq!(stored, record);
    }

    #[test]
    fn test_valid_record_is_kept() {
        let mut storage = MemoryStorage::new();
        storage.insert_raw(KEY, format!(r#"{{"lives":1,"resetTimestamp":{}}}"#, NOW + 5_000));
        let (mut store, _) = store_with(storage);

        assert_eq!(store.read(KEY), LivesRecord { lives: 1, reset_timestamp: NOW + 5_000 });
    }

    #[test]
    fn test_stale_record_resets_even_with_many_lives() {
        let mut storage = MemoryStorage::new();
        storage.insert_raw(KEY, format!(r#"{{"lives":10,"resetTimestamp":{}}}"#, NOW));
        let (mut store, _) = store_with(storage);

        assert_eq!(store.read(KEY), LivesRecord { lives: 2, reset_timestamp: NOW + RESET_WINDOW_MS });
    }

    #[test]
    fn test_cached_record_goes_stale() {
        let (mut store, clock) = store_with(MemoryStorage::new());
        store.adjust(KEY, 0);
        assert_eq!(store.lives(KEY), 0);

        clock.advance(RESET_WINDOW_MS);
        let record = store.read(KEY);
        assert_eq!(record.lives, 2);
        assert_eq!(record.reset_timestamp, NOW + 2 * RESET_WINDOW_MS);
    }

    #[test]
    fn test_adjust_keeps_reset_timestamp() {
        let (mut store, clock) = store_with(MemoryStorage::new());
        let before = store.read(KEY);

        clock.advance(60_000);
        let after = store.adjust(KEY, LivesUpdate::credit(5));

        assert_eq!(after.lives, 7);
        assert_eq!(after.reset_timestamp, before.reset_timestamp);
        assert_eq!(parse_record(store.storage().raw(KEY).unwrap()).unwrap(), after);
    }

    #[test]
    fn test_debit_floors_at_zero() {
        let (mut store, _) = store_with(MemoryStorage::new());
        store.adjust(KEY, LivesUpdate::Set(0));
        assert_eq!(store.adjust(KEY, LivesUpdate::debit_one()).lives, 0);
    }

    #[test]
    fn test_adjust_with_closure() {
        let (mut store, _) = store_with(MemoryStorage::new());
        let record = store.adjust(KEY, LivesUpdate::apply(|lives| lives * 3));
        assert_eq!(record.lives, 6);
    }

    #[test]
    fn test_write_failure_still_updates_memory() {
        let (mut store, _) = store_with(MemoryStorage::read_only());

        let record = store.adjust(KEY, LivesUpdate::debit_one());
        assert_eq!(record.lives, 1);
        assert_eq!(store.lives(KEY), 1);
        assert!(store.storage().raw(KEY).is_none());
    }

    #[test]
    fn test_keys_are_independent() {
        let (mut store, _) = store_with(MemoryStorage::new());
        store.adjust("lives_game_a", 9);
        assert_eq!(store.lives("lives_game_a"), 9);
        assert_eq!(store.lives("lives_game_b"), 2);
    }

    proptest! {
        #[test]
        fn prop_garbage_heals_to_default(raw in ".*") {
            let mut storage = MemoryStorage::new();
            storage.insert_raw(KEY, raw.clone());
            let (mut store, _) = store_with(storage);

            let record = store.read(KEY);
            match parse_record(&raw) {
                Ok(stored) if stored.is_fresh(NOW) => prop_assert_eq!(record, stored),
                _ => prop_assert_eq!(record, LivesRecord { lives: 2, reset_timestamp: NOW + RESET_WINDOW_MS }),
            }
        }

        #[test]
        fn prop_stale_always_resets(lives in 0u32..1_000, age in 0i64..10 * RESET_WINDOW_MS) {
            let mut storage = MemoryStorage::new();
            storage.insert_raw(KEY, LivesRecord { lives, reset_timestamp: NOW - age }.to_json());
            let (mut store, _) = store_with(storage);

            prop_assert_eq!(store.read(KEY), LivesRecord { lives: 2, reset_timestamp: NOW + RESET_WINDOW_MS });
        }

        #[test]
        fn prop_debits_never_underflow(start in 0u32..5, debits in 0usize..10) {
            let (mut store, _) = store_with(MemoryStorage::new());
            store.adjust(KEY, start);
            for _ in 0..debits {
                store.adjust(KEY, LivesUpdate::debit_one());
            }
            prop_assert_eq!(store.lives(KEY), start.saturating_sub(debits as u32));
        }
    }
}

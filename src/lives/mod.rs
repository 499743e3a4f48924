//! Lives Entitlement
//!
//! - `record`: persisted `{lives, resetTimestamp}` shape and validation
//! - `storage`: key/value backends (memory, files)
//! - `store`: read / adjust with daily reset and heal-on-corruption

pub mod record;
pub mod storage;
pub mod store;

pub use record::{LivesPolicy, LivesRecord, DEFAULT_LIVES, RESET_WINDOW_MS};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{storage_key, LivesStore, LivesUpdate};

//! Storage and persistence layer
//!
//! - Key-value store abstraction (in-memory and file system backends)
//! - Per-identity key naming
//! - Ledger load/save on top of the key-value store

mod file_system;
mod keys;
mod ledger_store;
mod memory;

pub use file_system::FileStore;
pub use keys::{balance_key, transactions_key};
pub use ledger_store::LedgerStore;
pub use memory::MemoryStore;

use crate::error::StorageError;

/// Byte-oriented key-value storage, the shape of browser local storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Overwrite the value at `key`
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Delete `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

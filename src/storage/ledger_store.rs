use std::sync::Arc;

use super::keys::{balance_key, transactions_key};
use super::KeyValueStore;
use crate::error::StorageError;
use crate::types::{Identity, Ledger, Transaction};

/// Persistence adapter mapping a ledger onto two key-value entries
///
/// `credits_<address>` holds the balance as a decimal string and
/// `transactions_<address>` the history as a JSON array, most recent first.
#[derive(Clone)]
pub struct LedgerStore {
    kv: Arc<dyn KeyValueStore>,
}

impl LedgerStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the saved ledger, or `None` if the identity was never persisted
    pub fn load(&self, identity: &Identity) -> Result<Option<Ledger>, StorageError> {
        let balance = self.load_balance(identity)?;
        let history = self.load_history(identity)?;

        if balance.is_none() && history.is_none() {
            return Ok(None);
        }

        Ok(Some(Ledger::from_parts(
            balance.unwrap_or(0),
            history.unwrap_or_default(),
        )))
    }

    /// Load only the balance entry
    pub fn load_balance(&self, identity: &Identity) -> Result<Option<u64>, StorageError> {
        let key = balance_key(identity);
        let Some(bytes) = self.kv.get(&key)? else {
            return Ok(None);
        };

        let text = std::str::from_utf8(&bytes)
            .map_err(|e| StorageError::corrupt(&key, e.to_string()))?;
        let balance = text
            .trim()
            .parse::<u64>()
            .map_err(|e| StorageError::corrupt(&key, format!("'{}': {}", text.trim(), e)))?;
        Ok(Some(balance))
    }

    fn load_history(&self, identity: &Identity) -> Result<Option<Vec<Transaction>>, StorageError> {
        let key = transactions_key(identity);
        let Some(bytes) = self.kv.get(&key)? else {
            return Ok(None);
        };

        let history = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::corrupt(&key, e.to_string()))?;
        Ok(Some(history))
    }

    /// Overwrite both entries for the identity
    ///
    /// If the history write fails the previous balance entry is put back,
    /// so a balance is never persisted without the transaction behind it.
    pub fn save(&self, identity: &Identity, ledger: &Ledger) -> Result<(), StorageError> {
        let credits_key = balance_key(identity);
        let history = serde_json::to_vec(ledger.history())?;
        let previous = self.kv.get(&credits_key)?;

        self.kv.set(&credits_key, ledger.balance().to_string().as_bytes())?;
        if let Err(e) = self.kv.set(&transactions_key(identity), &history) {
            let restored = match &previous {
                Some(bytes) => self.kv.set(&credits_key, bytes),
                None => self.kv.remove(&credits_key),
            };
            if let Err(rollback) = restored {
                log::error!(
                    "Failed to restore balance for {} after a history write error: {}",
                    identity,
                    rollback
                );
            }
            return Err(e);
        }

        log::debug!(
            "Persisted ledger for {}: balance={}, transactions={}",
            identity,
            ledger.balance(),
            ledger.history().len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    /// Memory store that refuses every write to history entries
    struct HistoryWritesFail(MemoryStore);

    impl KeyValueStore for HistoryWritesFail {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
            if key.starts_with("transactions_") {
                return Err(StorageError::Unavailable("disk full".into()));
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.0.remove(key)
        }
    }

    fn setup() -> (LedgerStore, MemoryStore, Identity) {
        let memory = MemoryStore::new();
        let store = LedgerStore::new(Arc::new(memory.clone()));
        (store, memory, Identity::parse("0xfeed").unwrap())
    }

    #[test]
    fn test_unknown_identity_loads_none() {
        let (store, _, id) = setup();
        assert_eq!(store.load(&id).unwrap(), None);
        assert_eq!(store.load_balance(&id).unwrap(), None);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (store, memory, id) = setup();
        let t0 = Utc.timestamp_opt(1_700_000_000, 123_000_000).unwrap();

        let mut ledger = Ledger::default();
        ledger
            .record_purchase(Transaction::purchase("tx_1", 3, t0, "0xaa"))
            .unwrap();
        ledger
            .record_consumption(Transaction::consumption("tx_2", t0, "/api/random"))
            .unwrap();

        store.save(&id, &ledger).unwrap();

        assert_eq!(memory.get_string("credits_0xfeed").as_deref(), Some("2"));
        assert_eq!(store.load(&id).unwrap(), Some(ledger));
    }

    #[test]
    fn test_reads_legacy_type_field() {
        let (store, memory, id) = setup();
        memory.set("credits_0xfeed", b"10").unwrap();
        memory
            .set(
                "transactions_0xfeed",
                br#"[{"id":"tx_1","type":"purchase","amount":10,"timestamp":"2024-05-01T12:00:00.000Z","txHash":"0xabc"}]"#,
            )
            .unwrap();

        let ledger = store.load(&id).unwrap().unwrap();
        assert_eq!(ledger.balance(), 10);
        assert_eq!(ledger.history()[0].tx_hash(), Some("0xabc"));
        assert_eq!(
            ledger.history()[0].timestamp(),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_balance_only_entry_loads_empty_history() {
        let (store, memory, id) = setup();
        memory.set("credits_0xfeed", b"7").unwrap();
        let ledger = store.load(&id).unwrap().unwrap();
        assert_eq!(ledger.balance(), 7);
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_corrupt_entries_are_reported() {
        let (store, memory, id) = setup();
        memory.set("credits_0xfeed", b"-4").unwrap();
        assert!(matches!(store.load(&id), Err(StorageError::Corrupt { .. })));

        memory.set("credits_0xfeed", b"4").unwrap();
        memory.set("transactions_0xfeed", b"{not json").unwrap();
        assert!(matches!(store.load(&id), Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn test_failed_history_write_restores_balance() {
        let memory = MemoryStore::new();
        let store = LedgerStore::new(Arc::new(HistoryWritesFail(memory.clone())));
        let id = Identity::parse("0xfeed").unwrap();
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        let mut ledger = Ledger::default();
        ledger
            .record_purchase(Transaction::purchase("tx_1", 5, t0, "0xaa"))
            .unwrap();

        // Never persisted before: the balance entry is removed again
        assert!(store.save(&id, &ledger).is_err());
        assert!(memory.is_empty());

        // Persisted before: the old balance is put back
        memory.set("credits_0xfeed", b"2").unwrap();
        assert!(store.save(&id, &ledger).is_err());
        assert_eq!(memory.get_string("credits_0xfeed").as_deref(), Some("2"));
    }
}

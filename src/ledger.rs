//! Ledger state container
//!
//! Holds the balance and history for the currently bound wallet and exposes
//! the two mutating operations (`purchase`, `consume`) plus `refresh`.
//!
//! Mutations are built on a copy of the ledger, persisted, and only then
//! swapped in, so callers never observe a partial update. At most one
//! mutation is in flight per ledger; the in-flight flag doubles as the
//! `is_loading` indicator shown by views.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::entropy::{EntropySource, ThreadEntropy};
use crate::error::CreditsError;
use crate::identity::{Binding, Transition, WalletStatus};
use crate::mock_api::MockApiEngine;
use crate::storage::{KeyValueStore, LedgerStore};
use crate::types::{
    ConsumeReceipt, Identity, Ledger, LedgerSnapshot, LedgerSummary, PurchaseReceipt, Transaction,
};

pub struct CreditsLedger {
    store: LedgerStore,
    engine: MockApiEngine,
    state: Mutex<LedgerState>,
    in_flight: AtomicBool,
    sequence: AtomicU64,
}

#[derive(Default)]
struct LedgerState {
    binding: Binding,
    ledger: Ledger,
}

/// Clears the in-flight flag when the operation finishes, on every path
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CreditsLedger {
    /// Ledger with the real clock and OS randomness
    pub fn new(kv: Arc<dyn KeyValueStore>, config: LedgerConfig) -> Self {
        Self::with_components(kv, Arc::new(SystemClock), Arc::new(ThreadEntropy), config)
    }

    /// Ledger with injected clock and entropy (for testing)
    pub fn with_components(
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        entropy: Arc<dyn EntropySource>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            store: LedgerStore::new(kv),
            engine: MockApiEngine::new(clock, entropy, config),
            state: Mutex::new(LedgerState::default()),
            in_flight: AtomicBool::new(false),
            sequence: AtomicU64::new(0),
        }
    }

    // The state is only ever replaced wholesale, so a poisoned lock still
    // guards a consistent value.
    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ============================================================================
    // Identity binding
    // ============================================================================

    pub fn apply_wallet_status(&self, status: &WalletStatus) -> Result<Transition, CreditsError> {
        self.bind(status.identity())
    }

    /// Scope the ledger to `next`, loading its saved state
    ///
    /// Disconnecting only clears memory; persisted entries stay so the same
    /// wallet gets its ledger back on reconnect. If loading fails the ledger
    /// is left disconnected.
    pub fn bind(&self, next: Option<Identity>) -> Result<Transition, CreditsError> {
        let mut state = self.state();
        let transition = state.binding.transition_to(next.as_ref());

        match &transition {
            Transition::Unchanged => {}
            Transition::Unbind(from) => {
                *state = LedgerState::default();
                log::info!("Wallet {} disconnected, ledger cleared", from);
            }
            Transition::Bind(to) | Transition::Swap { to, .. } => {
                *state = LedgerState::default();
                let ledger = match self.store.load(to)? {
                    Some(saved) => {
                        log::info!(
                            "Loaded ledger for {}: {} credits, {} transactions",
                            to,
                            saved.balance(),
                            saved.history().len()
                        );
                        saved
                    }
                    None => {
                        log::info!("No saved ledger for {}, starting at zero", to);
                        Ledger::default()
                    }
                };
                state.ledger = ledger;
                state.binding = Binding::Connected(to.clone());
            }
        }

        Ok(transition)
    }

    // ============================================================================
    // Reads
    // ============================================================================

    pub fn identity(&self) -> Option<Identity> {
        self.state().binding.identity().cloned()
    }

    pub fn balance(&self) -> u64 {
        self.state().ledger.balance()
    }

    /// Transactions, most recent first
    pub fn history(&self) -> Vec<Transaction> {
        self.state().ledger.history().iter().cloned().collect()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state();
        LedgerSnapshot {
            identity: state.binding.identity().cloned(),
            balance: state.ledger.balance(),
            transactions: state.ledger.history().iter().cloned().collect(),
            is_loading: self.is_loading(),
        }
    }

    pub fn summary(&self, recent: usize) -> LedgerSummary {
        self.state().ledger.summary(recent)
    }

    // ============================================================================
    // Operations
    // ============================================================================

    /// Buy `amount` credits for the bound wallet
    pub async fn purchase(&self, amount: u64) -> Result<PurchaseReceipt, CreditsError> {
        let identity = self.identity().ok_or(CreditsError::NoIdentityBound)?;
        if amount == 0 {
            return Err(CreditsError::InvalidAmount(amount));
        }
        let _guard = self.begin()?;

        let tx_hash = self.engine.confirm_purchase(&identity, amount).await;
        let transaction = Transaction::purchase(
            self.next_id(),
            amount,
            self.engine.now(),
            tx_hash.clone(),
        );

        let balance = self.commit(&identity, |ledger| ledger.record_purchase(transaction.clone()))?;
        log::info!(
            "Purchased {} credits for {} (tx {}), balance {}",
            amount,
            identity,
            tx_hash,
            balance
        );

        Ok(PurchaseReceipt {
            tx_hash,
            transaction,
            balance,
        })
    }

    /// Spend one credit calling `endpoint` on the mock backend
    pub async fn consume(&self, endpoint: &str) -> Result<ConsumeReceipt, CreditsError> {
        let identity = self.identity().ok_or(CreditsError::NoIdentityBound)?;
        let balance = self.balance();
        if balance == 0 {
            return Err(CreditsError::InsufficientBalance { balance });
        }
        let _guard = self.begin()?;

        let data = self.engine.call(endpoint).await;
        let transaction = Transaction::consumption(self.next_id(), self.engine.now(), endpoint);

        let balance =
            self.commit(&identity, |ledger| ledger.record_consumption(transaction.clone()))?;
        log::info!(
            "Consumed 1 credit on '{}' for {}, balance {}",
            endpoint,
            identity,
            balance
        );

        Ok(ConsumeReceipt {
            data,
            transaction,
            balance,
        })
    }

    /// Reload the bound wallet's persisted ledger
    ///
    /// Reloads balance and history together. Keeps the in-memory state when
    /// nothing is persisted, and does nothing while disconnected.
    pub fn refresh(&self) -> Result<(), CreditsError> {
        let mut state = self.state();
        let Some(identity) = state.binding.identity().cloned() else {
            return Ok(());
        };

        if let Some(saved) = self.store.load(&identity)? {
            log::debug!("Refreshed ledger for {}: {} credits", identity, saved.balance());
            state.ledger = saved;
        }
        Ok(())
    }

    // ============================================================================
    // Internals
    // ============================================================================

    fn begin(&self) -> Result<InFlightGuard<'_>, CreditsError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CreditsError::OperationInFlight)?;
        Ok(InFlightGuard(&self.in_flight))
    }

    fn next_id(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("tx_{}_{}", self.engine.now().timestamp_millis(), seq)
    }

    /// Apply `mutate` to a copy, persist it, then publish it
    fn commit<F>(&self, identity: &Identity, mutate: F) -> Result<u64, CreditsError>
    where
        F: FnOnce(&mut Ledger) -> Result<(), CreditsError>,
    {
        let mut state = self.state();
        if state.binding.identity() != Some(identity) {
            log::warn!("Wallet changed while an operation on {} was pending", identity);
            return Err(CreditsError::IdentityChanged {
                expected: identity.to_string(),
            });
        }

        let mut next = state.ledger.clone();
        mutate(&mut next)?;
        self.store.save(identity, &next)?;
        state.ledger = next;

        Ok(state.ledger.balance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::entropy::SeededEntropy;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn ledger() -> (CreditsLedger, MemoryStore) {
        let memory = MemoryStore::new();
        let ledger = CreditsLedger::with_components(
            Arc::new(memory.clone()),
            Arc::new(ManualClock::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap())),
            Arc::new(SeededEntropy::new(1)),
            LedgerConfig::default(),
        );
        (ledger, memory)
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let (ledger, _) = ledger();
        ledger.bind(Identity::parse("0x1")).unwrap();
        let a = ledger.purchase(1).await.unwrap();
        let b = ledger.purchase(1).await.unwrap();
        assert_ne!(a.transaction.id(), b.transaction.id());
        assert!(a.transaction.id().starts_with("tx_"));
    }

    #[tokio::test]
    async fn test_zero_purchase_rejected() {
        let (ledger, memory) = ledger();
        ledger.bind(Identity::parse("0x1")).unwrap();
        assert!(matches!(
            ledger.purchase(0).await,
            Err(CreditsError::InvalidAmount(0))
        ));
        assert!(memory.is_empty());
    }

    #[test]
    fn test_guard_releases_flag() {
        let (ledger, _) = ledger();
        {
            let _guard = ledger.begin().unwrap();
            assert!(ledger.is_loading());
            assert!(matches!(ledger.begin(), Err(CreditsError::OperationInFlight)));
        }
        assert!(!ledger.is_loading());
    }

    #[test]
    fn test_bind_without_saved_state_does_not_write() {
        let (ledger, memory) = ledger();
        let transition = ledger.bind(Identity::parse("0x1")).unwrap();
        assert_eq!(transition, Transition::Bind(Identity::parse("0x1").unwrap()));
        assert_eq!(ledger.balance(), 0);
        assert!(memory.is_empty());
    }
}

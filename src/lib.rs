//! PayPerCall: pay-per-API-call credit ledger
//!
//! Credits are bought with a wallet and spent one per API call. Settlement on
//! the Monad testnet and the paid API backend are both simulated; the ledger
//! itself is real and persisted per wallet address.
//!
//! # Architecture
//!
//! - **Ledger**: balance and history for the bound wallet, purchase/consume/refresh
//! - **Storage**: per-identity entries over an injectable key-value store
//! - **Identity binding**: swaps ledger state as the connected wallet changes
//! - **Mock API**: simulated latency, synthetic tx hashes and canned payloads
//!
//! # Example
//!
//! ```ignore
//! use payper_call::{CreditsLedger, LedgerConfig, MemoryStore, WalletStatus};
//! use std::sync::Arc;
//!
//! let ledger = CreditsLedger::new(Arc::new(MemoryStore::new()), LedgerConfig::default());
//! ledger.apply_wallet_status(&WalletStatus::connected("0x52908400098527886E0F7030069857D2E4169EE7"))?;
//!
//! let receipt = ledger.purchase(50).await?;
//! let call = ledger.consume("weather").await?;
//! assert_eq!(call.balance, 49);
//! ```

pub mod clock;
pub mod config;
pub mod entropy;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod mock_api;
pub mod pricing;
pub mod storage;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ChainConfig, LedgerConfig};
pub use entropy::{EntropySource, SeededEntropy, ThreadEntropy};
pub use error::{CreditsError, StorageError};
pub use identity::{watch_wallet, Binding, Transition, WalletStatus};
pub use ledger::CreditsLedger;
pub use mock_api::{ApiEndpoint, ApiPayload, EndpointInfo, MockApiEngine};
pub use pricing::{CreditPackage, Quote, PACKAGES};
pub use storage::{FileStore, KeyValueStore, LedgerStore, MemoryStore};
pub use types::{
    ConsumeOutcome, ConsumeReceipt, Identity, Ledger, LedgerSnapshot, LedgerSummary,
    PurchaseOutcome, PurchaseReceipt, Transaction, TransactionKind,
};

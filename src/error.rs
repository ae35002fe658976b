//! Error types for credit ledger operations
//!
//! Every ledger operation reports failure as a value. Callers that need the
//! `{ success: false }` result object convert through the outcome types in
//! [`crate::types`].

use thiserror::Error;

/// Core error type for ledger operations
#[derive(Error, Debug)]
pub enum CreditsError {
    /// Operation attempted while no wallet is connected
    #[error("No wallet identity is bound")]
    NoIdentityBound,

    /// Consumption attempted with a zero balance
    #[error("Insufficient credits: balance is {balance}")]
    InsufficientBalance { balance: u64 },

    /// Purchase amount is zero or would overflow the balance
    #[error("Invalid credit amount: {0}")]
    InvalidAmount(u64),

    /// Another purchase or consumption is still pending on this ledger
    #[error("Another credit operation is already in flight")]
    OperationInFlight,

    /// The bound wallet changed while the operation was pending
    #[error("Wallet identity changed from {expected} during the operation")]
    IdentityChanged { expected: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catch-all for the simulated settlement path
    #[error("Simulation failure: {0}")]
    SimulationFailure(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored entry exists but cannot be decoded
    #[error("Corrupt entry '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// The backing store cannot be accessed (e.g. a poisoned lock)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl CreditsError {
    /// Create a simulation failure error
    pub fn simulation(msg: impl Into<String>) -> Self {
        Self::SimulationFailure(msg.into())
    }

    /// Whether the error was a precondition rejected before any delay
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NoIdentityBound
                | Self::InsufficientBalance { .. }
                | Self::InvalidAmount(_)
                | Self::OperationInFlight
        )
    }
}

impl StorageError {
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

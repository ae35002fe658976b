//! Ledger data model
//!
//! Identities, immutable transaction records, the per-identity ledger and the
//! result objects handed back to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::error::CreditsError;
use crate::mock_api::ApiPayload;

/// Wallet address used as the ledger partition key
///
/// Kept verbatim (no checksum normalization) so storage keys match the
/// address string the wallet provider reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Parse an identity, rejecting empty or whitespace-only addresses
    pub fn parse(address: &str) -> Option<Self> {
        if address.trim().is_empty() {
            None
        } else {
            Some(Self(address.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Purchase,
    Consumption,
}

/// Immutable record of a purchase or consumption
///
/// Fields are private; records are created through [`Transaction::purchase`]
/// and [`Transaction::consumption`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: String,
    #[serde(alias = "type")]
    kind: TransactionKind,
    amount: u64,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tx_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_endpoint: Option<String>,
}

impl Transaction {
    pub fn purchase(
        id: impl Into<String>,
        amount: u64,
        timestamp: DateTime<Utc>,
        tx_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: TransactionKind::Purchase,
            amount,
            timestamp,
            tx_hash: Some(tx_hash.into()),
            api_endpoint: None,
        }
    }

    /// Consumption records always carry an amount of exactly one credit
    pub fn consumption(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        api_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: TransactionKind::Consumption,
            amount: 1,
            timestamp,
            tx_hash: None,
            api_endpoint: Some(api_endpoint.into()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn tx_hash(&self) -> Option<&str> {
        self.tx_hash.as_deref()
    }

    pub fn api_endpoint(&self) -> Option<&str> {
        self.api_endpoint.as_deref()
    }
}

/// Per-identity credit state
///
/// The balance only moves through [`Ledger::record_purchase`] and
/// [`Ledger::record_consumption`], each of which prepends its transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    balance: u64,
    history: VecDeque<Transaction>,
}

impl Ledger {
    /// Rebuild a ledger from persisted parts (history most-recent-first)
    pub fn from_parts(balance: u64, history: Vec<Transaction>) -> Self {
        Self {
            balance,
            history: history.into(),
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Transactions, most recent first
    pub fn history(&self) -> &VecDeque<Transaction> {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.balance == 0 && self.history.is_empty()
    }

    pub fn record_purchase(&mut self, tx: Transaction) -> Result<(), CreditsError> {
        if tx.kind != TransactionKind::Purchase || tx.amount == 0 {
            return Err(CreditsError::InvalidAmount(tx.amount));
        }
        self.balance = self
            .balance
            .checked_add(tx.amount)
            .ok_or(CreditsError::InvalidAmount(tx.amount))?;
        self.history.push_front(tx);
        Ok(())
    }

    pub fn record_consumption(&mut self, tx: Transaction) -> Result<(), CreditsError> {
        if tx.kind != TransactionKind::Consumption {
            return Err(CreditsError::simulation(format!(
                "transaction {} is not a consumption",
                tx.id
            )));
        }
        if self.balance == 0 {
            return Err(CreditsError::InsufficientBalance { balance: 0 });
        }
        self.balance -= 1;
        self.history.push_front(tx);
        Ok(())
    }

    /// Dashboard totals plus the `recent` newest transactions
    pub fn summary(&self, recent: usize) -> LedgerSummary {
        let mut total_purchased = 0u64;
        let mut total_consumed = 0u64;
        let mut calls_by_endpoint = BTreeMap::new();

        for tx in &self.history {
            match tx.kind {
                TransactionKind::Purchase => {
                    total_purchased = total_purchased.saturating_add(tx.amount)
                }
                TransactionKind::Consumption => {
                    total_consumed = total_consumed.saturating_add(tx.amount);
                    if let Some(endpoint) = &tx.api_endpoint {
                        *calls_by_endpoint.entry(endpoint.clone()).or_insert(0) += 1;
                    }
                }
            }
        }

        LedgerSummary {
            balance: self.balance,
            total_purchased,
            total_consumed,
            calls_by_endpoint,
            recent: self.history.iter().take(recent).cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub balance: u64,
    pub total_purchased: u64,
    pub total_consumed: u64,
    pub calls_by_endpoint: BTreeMap<String, u64>,
    pub recent: Vec<Transaction>,
}

/// Point-in-time view of the ledger container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub identity: Option<Identity>,
    pub balance: u64,
    pub transactions: Vec<Transaction>,
    pub is_loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub tx_hash: String,
    pub transaction: Transaction,
    pub balance: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsumeReceipt {
    pub data: ApiPayload,
    pub transaction: Transaction,
    pub balance: u64,
}

/// Result object for purchases: `{ success, txHash?, error? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<PurchaseReceipt, CreditsError>> for PurchaseOutcome {
    fn from(result: Result<PurchaseReceipt, CreditsError>) -> Self {
        match result {
            Ok(receipt) => Self {
                success: true,
                tx_hash: Some(receipt.tx_hash),
                error: None,
            },
            Err(e) => Self {
                success: false,
                tx_hash: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Result object for consumptions: `{ success, data?, error? }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ApiPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<ConsumeReceipt, CreditsError>> for ConsumeOutcome {
    fn from(result: Result<ConsumeReceipt, CreditsError>) -> Self {
        match result {
            Ok(receipt) => Self {
                success: true,
                data: Some(receipt.data),
                error: None,
            },
            Err(e) => Self {
                success: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }
}

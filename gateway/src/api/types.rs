use payper_call::{
    ChainConfig, CreditPackage, Identity, LedgerSnapshot, LedgerSummary, PurchaseOutcome, Quote,
    Transaction,
};
use serde::{Deserialize, Serialize};

/// Balance at or below which views warn about running low
pub const LOW_BALANCE_THRESHOLD: u64 = 3;

/// Transactions shown on the dashboard
pub const RECENT_TRANSACTIONS: usize = 10;

#[derive(Debug, Deserialize)]
pub struct ConnectWalletRequest {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct BuyCreditsRequest {
    pub amount: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsResponse {
    pub address: Option<Identity>,
    pub is_connected: bool,
    pub balance: u64,
    pub is_loading: bool,
    pub low_balance: bool,
    pub transactions: Vec<Transaction>,
    pub summary: LedgerSummary,
}

impl CreditsResponse {
    pub fn new(snapshot: LedgerSnapshot, summary: LedgerSummary) -> Self {
        Self {
            is_connected: snapshot.identity.is_some(),
            address: snapshot.identity,
            balance: snapshot.balance,
            is_loading: snapshot.is_loading,
            low_balance: snapshot.balance > 0 && snapshot.balance <= LOW_BALANCE_THRESHOLD,
            transactions: snapshot.transactions,
            summary,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyCreditsResponse {
    #[serde(flatten)]
    pub outcome: PurchaseOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    pub quote: Quote,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageResponse {
    #[serde(flatten)]
    pub package: CreditPackage,
    pub quote: Quote,
}

impl From<CreditPackage> for PackageResponse {
    fn from(package: CreditPackage) -> Self {
        Self {
            quote: package.quote(),
            package,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainResponse {
    pub chain_id: u64,
    pub name: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,
    pub rpc_url: String,
    pub explorer_url: String,
    pub contract_address: String,
}

impl From<&ChainConfig> for ChainResponse {
    fn from(chain: &ChainConfig) -> Self {
        Self {
            chain_id: chain.chain_id,
            name: chain.name.clone(),
            currency_symbol: chain.currency_symbol.clone(),
            currency_decimals: chain.currency_decimals,
            rpc_url: chain.rpc_url.clone(),
            explorer_url: chain.explorer_url.clone(),
            contract_address: chain.contract_address.clone(),
        }
    }
}

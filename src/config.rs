//! Ledger and chain configuration
//!
//! Simulated latencies are read from environment variables so demos can run
//! with realistic delays and tests with none. Chain constants describe the
//! Monad testnet the UI pretends to settle on.

use std::env;
use std::time::Duration;

/// Default simulated chain confirmation latency
pub const DEFAULT_PURCHASE_LATENCY_MS: u64 = 2000;
/// Default simulated API round trip
pub const DEFAULT_CONSUME_LATENCY_MS: u64 = 500;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Delay before a purchase is confirmed
    pub purchase_latency: Duration,
    /// Delay before a mocked API call returns
    pub consumption_latency: Duration,
}

impl LedgerConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `PAYPER_PURCHASE_LATENCY_MS`: purchase confirmation delay (default 2000)
    /// - `PAYPER_CONSUME_LATENCY_MS`: API call delay (default 500)
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Instant responses for local development
    /// PAYPER_PURCHASE_LATENCY_MS=0 PAYPER_CONSUME_LATENCY_MS=0 cargo run -p payper-gateway
    /// ```
    pub fn from_env() -> Self {
        let purchase_ms = read_millis("PAYPER_PURCHASE_LATENCY_MS", DEFAULT_PURCHASE_LATENCY_MS);
        let consume_ms = read_millis("PAYPER_CONSUME_LATENCY_MS", DEFAULT_CONSUME_LATENCY_MS);

        log::info!(
            "⏱️  Simulated latency: purchase {}ms, consumption {}ms",
            purchase_ms,
            consume_ms
        );

        Self {
            purchase_latency: Duration::from_millis(purchase_ms),
            consumption_latency: Duration::from_millis(consume_ms),
        }
    }

    /// Configuration with no simulated delay
    pub fn instant() -> Self {
        Self {
            purchase_latency: Duration::ZERO,
            consumption_latency: Duration::ZERO,
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            purchase_latency: Duration::from_millis(DEFAULT_PURCHASE_LATENCY_MS),
            consumption_latency: Duration::from_millis(DEFAULT_CONSUME_LATENCY_MS),
        }
    }
}

fn read_millis(var: &str, default: u64) -> u64 {
    match env::var(var) {
        Ok(raw) => match raw.trim().parse() {
            Ok(ms) => ms,
            Err(_) => {
                log::warn!("⚠️  Invalid {}='{}', using {}ms", var, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

/// Chain the credits are nominally settled on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,
    pub rpc_url: String,
    pub explorer_url: String,
    /// Credits contract (placeholder, never deployed)
    pub contract_address: String,
}

impl ChainConfig {
    pub fn monad_testnet() -> Self {
        Self {
            chain_id: 10143,
            name: "Monad Testnet".to_string(),
            currency_symbol: "MON".to_string(),
            currency_decimals: 18,
            rpc_url: "https://testnet-rpc.monad.xyz".to_string(),
            explorer_url: "https://testnet.monadexplorer.com".to_string(),
            contract_address: "0x0000000000000000000000000000000000000000".to_string(),
        }
    }

    /// Block explorer link for a (synthetic) transaction hash
    pub fn explorer_tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::monad_testnet()
    }
}

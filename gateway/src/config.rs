//! Gateway configuration from environment variables

use payper_call::LedgerConfig;
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Directory holding the per-wallet credit entries
    pub data_dir: PathBuf,
    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
    pub ledger: LedgerConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `BIND_ADDRESS`: listen address (default "0.0.0.0:3000"; use 127.0.0.1:3000 locally)
    /// - `PAYPER_DATA_DIR`: storage directory (default "./credits")
    /// - `ALLOWED_ORIGINS`: comma-separated CORS origins (default: any)
    /// - plus the latency variables read by [`LedgerConfig::from_env`]
    pub fn from_env() -> Self {
        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let data_dir = PathBuf::from(
            env::var("PAYPER_DATA_DIR").unwrap_or_else(|_| "./credits".to_string()),
        );
        log::info!("💾 Credit data directory: {}", data_dir.display());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        Self {
            bind_address,
            data_dir,
            allowed_origins,
            ledger: LedgerConfig::from_env(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            data_dir: PathBuf::from("./credits"),
            allowed_origins: Vec::new(),
            ledger: LedgerConfig::default(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

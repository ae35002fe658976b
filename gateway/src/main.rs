use payper_call::{ChainConfig, CreditsLedger, FileStore};
use payper_gateway::{api::server, AppState, GatewayConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok(); // Load .env file if present

    // Initialize logger (set RUST_LOG=debug for verbose output, RUST_LOG=info for normal)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GatewayConfig::from_env();
    log::info!("Starting PayPerCall gateway on {}", config.bind_address);

    let store = FileStore::new_with_base_dir(config.data_dir.clone());
    let ledger = CreditsLedger::new(Arc::new(store), config.ledger.clone());
    let state = AppState::new(ledger, ChainConfig::monad_testnet());

    server::start_server(state, &config).await?;
    Ok(())
}

//! Axum HTTP server setup and routing

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use payper_call::{ChainConfig, CreditsLedger};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::config::GatewayConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<CreditsLedger>,
    pub chain: Arc<ChainConfig>,
}

impl AppState {
    pub fn new(ledger: CreditsLedger, chain: ChainConfig) -> Self {
        Self {
            ledger: Arc::new(ledger),
            chain: Arc::new(chain),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/api/endpoints", get(handlers::list_endpoints))
        .route("/api/packages", get(handlers::list_packages))
        .route("/api/chain", get(handlers::chain_info))
        // Wallet binding
        .route("/api/wallet/connect", post(handlers::connect_wallet))
        .route("/api/wallet/disconnect", post(handlers::disconnect_wallet))
        // Credits
        .route("/api/credits", get(handlers::get_credits))
        .route("/api/credits/buy", post(handlers::buy_credits))
        .route("/api/credits/refresh", post(handlers::refresh_credits))
        // Paid calls
        .route("/api/call/:endpoint", post(handlers::call_endpoint))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        log::warn!(
            "CORS: Allowing all origins (development mode). Set ALLOWED_ORIGINS for production."
        );
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        log::info!("CORS configured for origins: {}", origins.join(","));
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

pub async fn start_server(state: AppState, config: &GatewayConfig) -> anyhow::Result<()> {
    let app = create_router(state)
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    log::info!("🚀 PayPerCall gateway listening on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            log::info!("Received SIGTERM signal");
        },
    }

    // Every mutation is already persisted; nothing to flush
    log::info!("Shutdown signal received, exiting gracefully...");
}

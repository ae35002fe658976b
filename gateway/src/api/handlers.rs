//! Axum HTTP handlers for the credits API
//!
//! Ledger operations answer with the `{ success, ... }` result object and
//! HTTP 200 even when they fail; only malformed requests get error statuses.

use axum::{
    extract::{Path, State},
    Json,
};
use payper_call::{
    ApiEndpoint, ConsumeOutcome, CreditPackage, EndpointInfo, Identity, PurchaseOutcome,
    WalletStatus, PACKAGES,
};

use super::server::AppState;
use super::types::*;
use crate::error::GatewayError;

fn credits_view(state: &AppState) -> CreditsResponse {
    CreditsResponse::new(
        state.ledger.snapshot(),
        state.ledger.summary(RECENT_TRANSACTIONS),
    )
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /api/endpoints
pub async fn list_endpoints() -> Json<Vec<EndpointInfo>> {
    Json(ApiEndpoint::ALL.iter().map(ApiEndpoint::info).collect())
}

/// GET /api/packages
pub async fn list_packages() -> Json<Vec<PackageResponse>> {
    Json(PACKAGES.into_iter().map(PackageResponse::from).collect())
}

/// GET /api/chain
pub async fn chain_info(State(state): State<AppState>) -> Json<ChainResponse> {
    Json(ChainResponse::from(state.chain.as_ref()))
}

/// POST /api/wallet/connect
pub async fn connect_wallet(
    State(state): State<AppState>,
    Json(req): Json<ConnectWalletRequest>,
) -> Result<Json<CreditsResponse>, GatewayError> {
    if Identity::parse(&req.address).is_none() {
        return Err(GatewayError::InvalidInput("wallet address is empty".to_string()));
    }

    state
        .ledger
        .apply_wallet_status(&WalletStatus::connected(req.address))?;
    Ok(Json(credits_view(&state)))
}

/// POST /api/wallet/disconnect
pub async fn disconnect_wallet(
    State(state): State<AppState>,
) -> Result<Json<CreditsResponse>, GatewayError> {
    state
        .ledger
        .apply_wallet_status(&WalletStatus::disconnected())?;
    Ok(Json(credits_view(&state)))
}

/// GET /api/credits
pub async fn get_credits(State(state): State<AppState>) -> Json<CreditsResponse> {
    Json(credits_view(&state))
}

/// POST /api/credits/buy
pub async fn buy_credits(
    State(state): State<AppState>,
    Json(req): Json<BuyCreditsRequest>,
) -> Result<Json<BuyCreditsResponse>, GatewayError> {
    let package = CreditPackage::for_amount(req.amount).ok_or_else(|| {
        GatewayError::InvalidInput(format!(
            "amount must be a listed package or between {} and {}",
            payper_call::pricing::MIN_CUSTOM_CREDITS,
            payper_call::pricing::MAX_CUSTOM_CREDITS
        ))
    })?;

    let outcome = PurchaseOutcome::from(state.ledger.purchase(package.credits).await);
    if let Some(e) = &outcome.error {
        log::warn!("Purchase of {} credits failed: {}", package.credits, e);
    }

    let explorer_url = outcome
        .tx_hash
        .as_deref()
        .map(|hash| state.chain.explorer_tx_url(hash));

    Ok(Json(BuyCreditsResponse {
        outcome,
        explorer_url,
        quote: package.quote(),
    }))
}

/// POST /api/credits/refresh
pub async fn refresh_credits(
    State(state): State<AppState>,
) -> Result<Json<CreditsResponse>, GatewayError> {
    state.ledger.refresh()?;
    Ok(Json(credits_view(&state)))
}

/// POST /api/call/:endpoint
pub async fn call_endpoint(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
) -> Json<ConsumeOutcome> {
    let outcome = ConsumeOutcome::from(state.ledger.consume(&endpoint).await);
    if let Some(e) = &outcome.error {
        log::warn!("Call to '{}' failed: {}", endpoint, e);
    }
    Json(outcome)
}

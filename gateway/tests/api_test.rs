//! Gateway API Integration Tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`; the ledger
//! uses an in-memory store and a manual clock so no request waits on the
//! simulated latency.
//!
//! Run with: cargo test -p payper-gateway --test api_test -- --nocapture

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use payper_call::{
    ChainConfig, CreditsLedger, LedgerConfig, ManualClock, MemoryStore, SeededEntropy,
};
use payper_gateway::{create_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// Helper Functions
// ============================================================================

const WALLET: &str = "0x3f5CE5FBFe3E9af3971dD833D26bA9b5C936f0bE";

fn test_app() -> Router {
    let _ = env_logger::builder().is_test(true).try_init();

    let ledger = CreditsLedger::with_components(
        Arc::new(MemoryStore::new()),
        Arc::new(ManualClock::new(Utc.timestamp_opt(1_736_000_000, 0).unwrap())),
        Arc::new(SeededEntropy::new(2024)),
        LedgerConfig::default(),
    );
    create_router(AppState::new(ledger, ChainConfig::monad_testnet()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

async fn connect(app: &Router) {
    let (status, body) = post(app, "/api/wallet/connect", json!({ "address": WALLET })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isConnected"], true);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_health_and_catalog() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".into()));

    let (_, endpoints) = send(&app, "GET", "/api/endpoints", None).await;
    let ids: Vec<&str> = endpoints
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["weather", "crypto", "random"]);
    assert_eq!(endpoints[0]["path"], "/api/weather");

    let (_, packages) = send(&app, "GET", "/api/packages", None).await;
    assert_eq!(packages.as_array().unwrap().len(), 4);
    assert_eq!(packages[1]["credits"], 50);
    assert_eq!(packages[1]["popular"], true);
    assert_eq!(packages[1]["quote"]["priceWei"], "47500000000000000");

    let (_, chain) = send(&app, "GET", "/api/chain", None).await;
    assert_eq!(chain["chainId"], 10143);
    assert_eq!(chain["currencySymbol"], "MON");
}

// ============================================================================
// Credits flow
// ============================================================================

#[tokio::test]
async fn test_buy_and_call_flow() {
    let app = test_app();
    connect(&app).await;

    let (status, bought) = post(&app, "/api/credits/buy", json!({ "amount": 50 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bought["success"], true);
    let tx_hash = bought["txHash"].as_str().unwrap().to_string();
    assert_eq!(
        bought["explorerUrl"],
        format!("https://testnet.monadexplorer.com/tx/{}", tx_hash)
    );
    assert_eq!(bought["quote"]["discountPercent"], 5);

    let (status, called) = send(&app, "POST", "/api/call/weather", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(called["success"], true);
    assert_eq!(called["data"]["location"], "San Francisco, CA");

    let (_, credits) = send(&app, "GET", "/api/credits", None).await;
    assert_eq!(credits["address"], WALLET);
    assert_eq!(credits["balance"], 49);
    assert_eq!(credits["isLoading"], false);
    assert_eq!(credits["lowBalance"], false);
    assert_eq!(credits["transactions"][0]["kind"], "consumption");
    assert_eq!(credits["transactions"][0]["apiEndpoint"], "weather");
    assert_eq!(credits["transactions"][1]["txHash"], tx_hash.as_str());
    assert_eq!(credits["summary"]["totalPurchased"], 50);
    assert_eq!(credits["summary"]["totalConsumed"], 1);
}

#[tokio::test]
async fn test_failures_use_result_object() {
    let app = test_app();

    let (status, bought) = post(&app, "/api/credits/buy", json!({ "amount": 10 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bought["success"], false);
    assert!(bought.get("txHash").is_none());

    connect(&app).await;
    let (status, called) = send(&app, "POST", "/api/call/crypto", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(called["success"], false);
    assert!(called.get("data").is_none());
}

#[tokio::test]
async fn test_low_balance_flag() {
    let app = test_app();
    connect(&app).await;

    post(&app, "/api/credits/buy", json!({ "amount": 3 })).await;
    let (_, credits) = send(&app, "GET", "/api/credits", None).await;
    assert_eq!(credits["lowBalance"], true);

    for _ in 0..3 {
        send(&app, "POST", "/api/call/random", None).await;
    }
    let (_, credits) = send(&app, "GET", "/api/credits", None).await;
    assert_eq!(credits["balance"], 0);
    assert_eq!(credits["lowBalance"], false);
}

#[tokio::test]
async fn test_disconnect_and_reconnect() {
    let app = test_app();
    connect(&app).await;
    post(&app, "/api/credits/buy", json!({ "amount": 100 })).await;

    let (_, credits) = send(&app, "POST", "/api/wallet/disconnect", None).await;
    assert_eq!(credits["isConnected"], false);
    assert_eq!(credits["balance"], 0);

    connect(&app).await;
    let (_, credits) = send(&app, "POST", "/api/credits/refresh", None).await;
    assert_eq!(credits["balance"], 100);
}

// ============================================================================
// Request validation
// ============================================================================

#[tokio::test]
async fn test_invalid_requests_rejected() {
    let app = test_app();

    let (status, body) = post(&app, "/api/wallet/connect", json!({ "address": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));

    connect(&app).await;
    let (status, _) = post(&app, "/api/credits/buy", json!({ "amount": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/api/credits/buy", json!({ "amount": 20000 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

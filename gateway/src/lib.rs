//! PayPerCall Gateway
//!
//! JSON API over a single credit ledger session: connect a wallet, buy
//! credits, spend them on the mocked endpoints and read the dashboard.

pub mod api;
pub mod config;
pub mod error;

pub use api::server::{create_router, start_server, AppState};
pub use config::GatewayConfig;
pub use error::GatewayError;

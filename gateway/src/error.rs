use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use payper_call::CreditsError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Credits(#[from] CreditsError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GatewayError::Credits(CreditsError::NoIdentityBound) => StatusCode::UNAUTHORIZED,
            GatewayError::Credits(CreditsError::OperationInFlight) => StatusCode::CONFLICT,
            GatewayError::Credits(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

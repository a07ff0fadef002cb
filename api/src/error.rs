//! JSON error responses
//!
//! Every failure surfaces as `{"error": message}` with a status code;
//! internals (paths, queries) stay out of the payload.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shared::MarketError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Market(#[from] MarketError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Market(MarketError::NoData(_)) => StatusCode::NOT_FOUND,
            ApiError::Market(MarketError::RateLimited) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Market(_) => StatusCode::BAD_GATEWAY,
            ApiError::Db(_) | ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

//! # Application Error
//!
//! Every handler returns `Result<_, AppError>`. The variant decides the HTTP
//! status; the body is `{message, status}` except for upstream failures of the
//! flight-number lookup, which keep the `{error, ...}` shape the admin page reads.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use super::store::StoreError;
use paging_common::retrieve::FeedError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or incomplete request.
    #[error("{0}")]
    Validation(String),
    /// Missing or wrong `x-api-key`.
    #[error("Invalid API Key")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// The arrivals feed answered with a non-2xx status.
    #[error("Upstream error")]
    Upstream { status: u16, body: String },
    /// The arrivals feed could not be reached or is not configured.
    #[error("{0}")]
    Feed(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        match e {
            FeedError::Upstream { status, body } => AppError::Upstream { status, body },
            other => AppError::Feed(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, json!({"message": message, "status": 400}))
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({"message": "Invalid API Key", "status": 401}),
            ),
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, json!({"message": message, "status": 404}))
            }
            AppError::Store(e) => {
                error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"message": "Internal server error", "status": 500}),
                )
            }
            AppError::Upstream { status, body } => {
                warn!(status, "Arrivals feed returned an error");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({"error": "Upstream error", "status": status, "body": body}),
                )
            }
            AppError::Feed(message) => {
                error!("Arrivals feed failure: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({"error": message}))
            }
        };
        (status, Json(body)).into_response()
    }
}

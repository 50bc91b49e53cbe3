//! Error types for the ClauseGuard server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use risk_engine::EngineError;
use serde::Serialize;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body. The dashboard only checks for non-2xx, but the
/// stable `code` keeps failures distinguishable for operators.
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            ServerError::Engine(e) => {
                let status = match e {
                    EngineError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    EngineError::CorruptDocument(_) => StatusCode::BAD_REQUEST,
                    EngineError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    EngineError::ClassificationTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
                    EngineError::InternalClassifierFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status.is_server_error() {
                    tracing::error!("engine error: {}", e);
                }
                (status, e.kind(), e.to_string())
            }
            ServerError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

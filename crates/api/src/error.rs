use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use atlas_core::error::CoreError;

use crate::upstream::UpstreamError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for input validation and [`UpstreamError`] for the
/// telemetry feed, and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `atlas_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The telemetry upstream failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// A backing resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message (logged, never sent).
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::InvalidDataset(_) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_INPUT",
                    "invalid dataset".to_string(),
                ),
                CoreError::InvalidHour(_) | CoreError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_INPUT", core.to_string())
                }
            },

            // --- Upstream errors ---
            AppError::Upstream(upstream) => match upstream {
                UpstreamError::Status { status } => {
                    tracing::warn!(upstream_status = status, "Upstream returned error status");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_ERROR",
                        "upstream error".to_string(),
                    )
                }
                UpstreamError::Unreachable(err) => {
                    tracing::warn!(error = %err, "Upstream unreachable");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_UNREACHABLE",
                        "upstream fetch failed".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::NotFound(what) => {
                tracing::debug!(resource = %what, "Resource not found");
                (StatusCode::NOT_FOUND, "NOT_FOUND", "not found".to_string())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

/// ApiError
///
/// The application-wide error taxonomy. Every fallible service operation returns
/// one of these variants, and the boundary (Axum's IntoResponse) converts them
/// into structured `{code, message}` JSON bodies with the matching status.
///
/// The split mirrors the request lifecycle: Unauthorized/Forbidden are produced
/// by the security layer before any business logic runs, NotFound/Validation by
/// the services, and Internal covers storage faults and configuration errors
/// whose details must never reach the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The addressed Member/Slide/Organization does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request body failed shape validation (empty required field, bad encoding).
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credential, or a failed login attempt.
    #[error("{0}")]
    Unauthorized(String),

    /// Valid credential, but the caller's role does not permit the operation.
    #[error("{0}")]
    Forbidden(String),

    /// Storage faults and configuration errors (e.g., missing reference role).
    /// The message is logged server-side; the response body stays generic.
    #[error("{0}")]
    Internal(String),
}

/// ErrorResponse
///
/// The wire shape of every error body: a stable machine-readable code plus a
/// human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            ApiError::Internal(detail) => {
                // The detail may reference infrastructure (bucket names, SQL state);
                // log it and send a generic body instead.
                tracing::error!("internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

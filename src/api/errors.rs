use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::api::envelope::ErrorBody;
use crate::error::AppError;

/// API-specific error wrapper that converts AppError into HTTP responses.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Integrity(msg) => {
                tracing::error!("{msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None)
            }
            AppError::Database(msg) => {
                tracing::error!("Database error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Operation {
                message,
                cause,
                expose_cause,
            } => {
                tracing::error!("{message}: {cause}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    message,
                    expose_cause.then_some(cause),
                )
            }
        };

        (status, axum::Json(ErrorBody { error, details })).into_response()
    }
}

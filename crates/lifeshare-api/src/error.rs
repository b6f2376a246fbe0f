//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use lifeshare_core::error::{AppError, StatusCategory};
use lifeshare_worker::JobExecutionError;

/// Result type of every handler.
pub type ApiResult<T> = Result<T, ApiError>;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An [`AppError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// HTTP status for the error's category.
    pub fn status(&self) -> StatusCode {
        match self.0.kind.category() {
            StatusCategory::BadRequest => StatusCode::BAD_REQUEST,
            StatusCategory::Unauthorized => StatusCode::UNAUTHORIZED,
            StatusCategory::Forbidden => StatusCode::FORBIDDEN,
            StatusCategory::NotFound => StatusCode::NOT_FOUND,
            StatusCategory::Conflict => StatusCode::CONFLICT,
            StatusCategory::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self(AppError::validation(errors.to_string()))
    }
}

impl From<JobExecutionError> for ApiError {
    fn from(err: JobExecutionError) -> Self {
        match err {
            JobExecutionError::Internal(inner) => Self(inner),
            JobExecutionError::Permanent(message) => Self(AppError::validation(message)),
            JobExecutionError::Transient(message) => Self(AppError::external(message)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            // Internal detail stays in the log.
            tracing::error!(kind = %self.0.kind, error = %self.0.message, "Internal server error");
        }

        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.0.message
        };

        let body = ApiErrorResponse {
            success: false,
            error: self.0.kind.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use folio_core::error::{AppError, ErrorKind};

/// JSON error body: `{"error": "...", "details": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn unauthorized() -> Self {
        Self::new("unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new("forbidden")
    }
}

/// An `AppError` on its way out of a handler.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn with_details(error: AppError, details: serde_json::Value) -> Self {
        Self {
            error,
            details: Some(details),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.error.kind {
            ErrorKind::Validation | ErrorKind::Storage => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            details: None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self.error.kind {
            ErrorKind::Authentication => "unauthorized".to_string(),
            ErrorKind::Authorization => "forbidden".to_string(),
            _ if status.is_server_error() => {
                tracing::error!(kind = %self.error.kind, error = %self.error.message, "Request failed");
                match self.error.kind {
                    ErrorKind::ExternalService => "upstream service unavailable".to_string(),
                    _ => "internal error".to_string(),
                }
            }
            _ => self.error.message,
        };

        let body = ApiErrorResponse {
            error: message,
            details: self.details,
        };
        (status, Json(body)).into_response()
    }
}

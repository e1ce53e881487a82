//! Error-to-HTTP mapping for the API.
//!
//! Every caller-visible failure renders as `{"error": message, "status":
//! code}`. The trade rejections keep their exact wording because clients
//! match on the message text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use engine::EngineError;
use serde_json::json;

/// Application error type with HTTP response mapping.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid request data (400).
    #[error("{0}")]
    BadRequest(String),

    /// Missing or invalid identity (401).
    #[error("Unauthorized")]
    Unauthorized,

    /// Unknown account (404).
    #[error("No such account: {0}")]
    NotFound(String),

    /// Internal server error (500).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        match e {
            // The rejection messages come from the error's Display impl.
            EngineError::InsufficientFunds
            | EngineError::InsufficientHoldings
            | EngineError::Duplicate => AppError::BadRequest(e.to_string()),
            EngineError::Validation(msg) => AppError::BadRequest(msg),
            EngineError::InvalidCredentials => AppError::Unauthorized,
            EngineError::AccountNotFound(name) => AppError::NotFound(name),
            EngineError::Store(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = axum::Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

//! Application error type and its HTTP mapping.
//!
//! Every fallible operation in the service returns [`AppError`]. Handlers
//! return it directly and rely on the [`IntoResponse`] impl, which renders
//! `{"error": "<message>"}` with the matching status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// JSON body returned for every API error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The client submitted a blank URL.
    #[error("URL is required")]
    EmptyInput,

    /// The URL is not well-formed even after scheme normalization.
    #[error("Invalid URL")]
    InvalidUrl { reason: String },

    /// The request body could not be read or failed DTO validation.
    #[error("{0}")]
    Validation(String),

    /// The generated code is already taken. Recovered by retrying.
    #[error("Short code already exists")]
    DuplicateCode { code: String },

    /// Every attempt to find a free code collided.
    #[error("Could not generate a unique code, please try again")]
    CodeExhausted { attempts: usize },

    /// No link is stored under the requested code.
    #[error("Short link not found")]
    NotFound { code: String },

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmptyInput | AppError::InvalidUrl { .. } | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::DuplicateCode { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::CodeExhausted { .. } | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts the error into the JSON body sent to clients.
    ///
    /// Database details never leave the process; they are logged instead.
    pub fn to_error_body(&self) -> ErrorBody {
        let error = match self {
            AppError::Database(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        ErrorBody { error }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Database(e) => tracing::error!(error = %e, "Database error"),
            AppError::CodeExhausted { attempts } => {
                tracing::error!(attempts, "Short code space exhausted")
            }
            AppError::InvalidUrl { reason } => tracing::debug!(%reason, "Rejected URL"),
            _ => {}
        }

        (status, Json(self.to_error_body())).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation failed: {}", errors))
    }
}

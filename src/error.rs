//! Application error type and its HTTP representation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::codec::CodecError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload rendered under the `error` key.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Every failure the service can surface.
///
/// Storage and allocation errors propagate unchanged from the repositories through the
/// services; nothing in the core retries them.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed request input.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// A code contained a symbol outside the alphabet or had the wrong width.
    #[error("{message}")]
    InvalidCode { message: String, details: Value },

    /// No active record matches.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Caller identity is required but missing.
    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    /// Caller is not allowed to touch the record.
    #[error("{message}")]
    Forbidden { message: String, details: Value },

    /// The sequence transaction could not commit. Safe to retry the whole request.
    #[error("{message}")]
    Allocation { message: String, details: Value },

    /// An active record already uses the code. Indicates an allocator or codec defect.
    #[error("short code {code} is already in use")]
    DuplicateCode { code: String },

    /// The allocated value no longer fits in a fixed-width code.
    #[error("sequence value {value} exceeds code capacity")]
    CapacityExceeded { value: u64 },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn allocation(message: impl Into<String>, details: Value) -> Self {
        Self::Allocation {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::InvalidCode { .. } => (StatusCode::BAD_REQUEST, "invalid_code"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Forbidden { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::Allocation { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "allocation_failure")
            }
            AppError::DuplicateCode { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "duplicate_code")
            }
            AppError::CapacityExceeded { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "capacity_exceeded")
            }
            AppError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Returns the HTTP status this error renders with.
    pub fn status(&self) -> StatusCode {
        self.status_and_code().0
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.status_and_code();
        let details = match self {
            AppError::Validation { details, .. }
            | AppError::InvalidCode { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::Unauthorized { details, .. }
            | AppError::Forbidden { details, .. }
            | AppError::Allocation { details, .. }
            | AppError::Internal { details, .. } => details.clone(),
            AppError::DuplicateCode { code } => json!({ "code": code }),
            AppError::CapacityExceeded { value } => json!({ "value": value }),
        };

        ErrorInfo {
            code,
            message: self.to_string(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let info = self.to_error_info();

        if status.is_server_error() {
            tracing::error!(code = info.code, message = %info.message, "Request failed");
        }

        (status, Json(ErrorBody { error: info })).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<CodecError> for AppError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::CapacityExceeded(value) => AppError::CapacityExceeded { value },
            other => AppError::InvalidCode {
                message: other.to_string(),
                details: json!({}),
            },
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Validation failed", details)
    }
}

/// Returns true if `e` is a unique violation on the active-code index.
pub fn is_duplicate_code_violation(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    db_err.is_unique_violation() && db_err.constraint() == Some("short_urls_code_active_key")
}

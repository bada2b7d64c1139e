//! Unified error handling
//!
//! Provides the application-level error type and response envelope:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response structure
//!
//! # Error code scheme
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx  | Business | E0003 not found |
//! | E2xxx  | Authorization | E2001 forbidden |
//! | E3xxx  | Authentication | E3002 invalid token |
//! | E9xxx  | System | E9002 database error |

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Unified API response structure
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 means success)
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication Errors ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Business Logic Errors ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    // ========== System Errors ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Invalid request: {0}")]
    Invalid(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "E3001", "Please login first".to_string())
            }
            AppError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "E3003", "Token expired".to_string())
            }
            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "E3002", "Invalid token".to_string())
            }

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.clone()),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),

            // Conflict (409): duplicate keys, illegal state transitions,
            // already-validated tickets
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),

            // Business rule (422)
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.clone())
            }

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                )
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }

            // Invalid request (400)
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.clone()),
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("Multipart error: {}", e))
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn invalid_token() -> Self {
        Self::InvalidToken
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// Unified message for bad credentials, to prevent account enumeration
    pub fn invalid_credentials() -> Self {
        Self::Invalid("Invalid email or password".to_string())
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}

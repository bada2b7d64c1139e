//! Utility module - shared helpers and types
//!
//! - [`AppError`] / [`AppResponse`] - error type and response envelope
//! - logging, validation and time helpers

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, ok, ok_with_message};

/// Result type alias for request handlers
pub type AppResult<T> = Result<T, AppError>;

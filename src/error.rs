//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Error type for the HTTP surface of the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found (absent or expired)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Tier name does not match any configured tier
    #[error("Unknown cache tier: {0}")]
    UnknownTier(String),

    /// Resource name does not match any known endpoint
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::UnknownTier(_) => StatusCode::NOT_FOUND,
            CacheError::UnknownResource(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP handlers.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Storage Error Enum ==
/// Failure of a durable storage operation.
///
/// The cache manager never lets these escape; they are logged and the
/// durable side of the operation is treated as not having happened.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying file I/O failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be encoded or decoded
    #[error("Storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Write would exceed the configured byte quota
    #[error("Storage quota exceeded: need {needed} bytes, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Storage cannot be used at all
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

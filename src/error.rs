//! Error types for the lookup service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::providers::ProviderError;

// == Cache Error Enum ==
/// Errors raised by the in-process cache engine.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key has expired
    #[error("Key expired: {0}")]
    Expired(String),

    /// Key is empty
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

// == Lookup Error Enum ==
/// Unified error type for lookups and the HTTP surface.
#[derive(Error, Debug)]
pub enum LookupError {
    /// No tier produced a value for the id
    #[error("Advertisement not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Settings rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The secondary provider failed; there is no tier left to fall back to
    #[error("Secondary provider failed: {0}")]
    Secondary(#[from] ProviderError),
}

// == IntoResponse Implementation ==
impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = match &self {
            LookupError::NotFound(_) => StatusCode::NOT_FOUND,
            LookupError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            LookupError::Secondary(_) => StatusCode::BAD_GATEWAY,
            LookupError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the lookup service.
pub type Result<T> = std::result::Result<T, LookupError>;

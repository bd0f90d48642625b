//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront operations.
///
/// None of these are fatal: callers degrade to a usable state.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// The catalog could not be fetched.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    /// The reliability scoring service failed.
    #[error("Reliability scoring failed: {0}")]
    ScoringFailed(String),

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Cache error.
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<snack_cache::CacheError> for CommerceError {
    fn from(e: snack_cache::CacheError) -> Self {
        CommerceError::CacheError(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

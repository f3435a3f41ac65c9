//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in currency and guest-cart operations.
///
/// Most callers recover from these with a default (zero, an empty cart, the
/// fallback rate table); the variants keep that decision visible.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Currency code outside the supported set.
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// Amount that does not parse as a finite decimal number.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Cart line with neither a product nor a service reference.
    #[error("Cart line must reference a product or a service")]
    MissingItemReference,

    /// Exchange-rate request failed.
    #[error("Exchange rate fetch failed: {0}")]
    RateFetch(String),

    /// Exchange-rate endpoint answered with something other than a code-to-rate map.
    #[error("Invalid exchange rate response: {0}")]
    InvalidRateResponse(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<buylock_store::StoreError> for CommerceError {
    fn from(e: buylock_store::StoreError) -> Self {
        CommerceError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for CommerceError {
    fn from(e: reqwest::Error) -> Self {
        CommerceError::RateFetch(e.to_string())
    }
}

//! Cart error types.

use market_kv::StoreError;
use thiserror::Error;

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// Reading or writing the key-value store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The persisted record parsed but breaks a cart invariant.
    #[error("Invalid cart record: {0}")]
    InvalidRecord(String),

    /// Price is negative, not finite, or has more decimals than supported.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Quantity would exceed the per-item maximum.
    #[error("Quantity for {id} would exceed maximum allowed ({max})")]
    QuantityExceedsLimit { id: String, max: u32 },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in cart total")]
    Overflow,

    /// Writing the cart to the store failed.
    #[error(transparent)]
    Persist(#[from] WriteError),

    /// The persistence writer has stopped.
    #[error("Cart writer is no longer running")]
    WriterClosed,
}

/// A failed cart write.
///
/// Cloneable so the same failure can be delivered to the caller that
/// queued the write and to every error-channel subscriber.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to persist cart revision {revision}: {message}")]
pub struct WriteError {
    /// Cart revision the write carried.
    pub revision: u64,
    /// Underlying failure, rendered.
    pub message: String,
}

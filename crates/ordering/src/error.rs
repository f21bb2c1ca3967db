use common::{OrderId, ProductId};
use store::StoreError;
use thiserror::Error;

/// Errors surfaced by the ordering engines.
#[derive(Debug, Error)]
pub enum OrderingError {
    /// The request was malformed; rejected before any state access.
    #[error("Validation failed for {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The referenced order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// A line item asked for more units than are available. No stock was
    /// mutated; the message carries enough detail for the caller to adjust.
    #[error("Insufficient stock for {name}. Available: {available}")]
    InsufficientStock {
        product_id: ProductId,
        name: String,
        available: i64,
    },

    /// The underlying store failed mid unit-of-work; everything was rolled
    /// back. Opaque to callers.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for OrderingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ProductNotFound(id) => OrderingError::ProductNotFound(id),
            StoreError::OrderNotFound(id) => OrderingError::OrderNotFound(id),
            StoreError::InsufficientStock {
                product_id,
                name,
                available,
            } => OrderingError::InsufficientStock {
                product_id,
                name,
                available,
            },
            other => OrderingError::Store(other),
        }
    }
}

/// Result type for ordering operations.
pub type Result<T> = std::result::Result<T, OrderingError>;

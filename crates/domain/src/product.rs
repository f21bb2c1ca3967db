//! Catalog product with the authoritative stock counter.

use chrono::{DateTime, Utc};
use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::Money;

/// A catalog product.
///
/// `stock` is the single contended value in the system. It is mutated only
/// through the store's `try_decrement` / `restore_stock` operations, inside
/// a unit of work; nothing else writes to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price per unit at the current point in time. Orders snapshot this
    /// value at placement; later price changes do not affect placed orders.
    pub price: Money,
    /// Units on hand. Never negative.
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new product with a fresh ID.
    pub fn new(name: impl Into<String>, price: Money, stock: i64) -> Self {
        Self {
            id: ProductId::new(),
            name: name.into(),
            price,
            stock,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assigns_unique_ids() {
        let a = Product::new("Widget", Money::from_cents(5000), 10);
        let b = Product::new("Widget", Money::from_cents(5000), 10);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let product = Product::new("Gadget", Money::from_cents(1999), 3);
        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product, back);
    }
}

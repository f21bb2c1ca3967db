//! Placement request shape and validation.

use common::{ProductId, UserId};
use domain::Money;

use crate::{OrderingError, Result};

/// One requested line: which product, how many units.
#[derive(Debug, Clone)]
pub struct RequestedItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl RequestedItem {
    /// Creates a new requested item.
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// A request to place an order.
///
/// `total` is the client-declared figure; it is validated for shape here and
/// checked against the snapshot total (warn on mismatch) after placement.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    /// The order's owner. Authorization happened upstream; this identity is
    /// trusted as handed in.
    pub user_id: UserId,
    /// Items in client-submitted order; processed in exactly this order.
    pub items: Vec<RequestedItem>,
    pub total: Money,
}

impl PlaceOrder {
    /// Creates a new placement request.
    pub fn new(user_id: UserId, items: Vec<RequestedItem>, total: Money) -> Self {
        Self {
            user_id,
            items,
            total,
        }
    }

    /// Checks the request shape. Runs before any state access.
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(OrderingError::Validation {
                field: "items",
                message: "at least one item is required".to_string(),
            });
        }

        for item in &self.items {
            if item.quantity == 0 {
                return Err(OrderingError::Validation {
                    field: "items.quantity",
                    message: format!("quantity must be at least 1 for product {}", item.product_id),
                });
            }
        }

        if self.total.is_negative() {
            return Err(OrderingError::Validation {
                field: "total",
                message: "total must not be negative".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request_passes() {
        let req = PlaceOrder::new(
            UserId::new(),
            vec![RequestedItem::new(ProductId::new(), 1)],
            Money::from_cents(100),
        );
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_items_rejected() {
        let req = PlaceOrder::new(UserId::new(), vec![], Money::from_cents(100));
        let err = req.validate().unwrap_err();
        assert!(matches!(
            err,
            OrderingError::Validation { field: "items", .. }
        ));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let req = PlaceOrder::new(
            UserId::new(),
            vec![
                RequestedItem::new(ProductId::new(), 2),
                RequestedItem::new(ProductId::new(), 0),
            ],
            Money::from_cents(100),
        );
        let err = req.validate().unwrap_err();
        assert!(matches!(
            err,
            OrderingError::Validation {
                field: "items.quantity",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_total_rejected() {
        let req = PlaceOrder::new(
            UserId::new(),
            vec![RequestedItem::new(ProductId::new(), 1)],
            Money::from_cents(-1),
        );
        let err = req.validate().unwrap_err();
        assert!(matches!(
            err,
            OrderingError::Validation { field: "total", .. }
        ));
    }

    #[test]
    fn test_zero_total_allowed() {
        let req = PlaceOrder::new(
            UserId::new(),
            vec![RequestedItem::new(ProductId::new(), 1)],
            Money::zero(),
        );
        assert!(req.validate().is_ok());
    }
}

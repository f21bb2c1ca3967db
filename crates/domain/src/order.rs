//! Orders and their immutable line-item snapshots.

use chrono::{DateTime, Utc};
use common::{OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::{Money, OrderStatus};

/// One line of an order: a snapshot of the product taken at placement time.
///
/// The name and unit price are copied out of the product row under the same
/// lock that validated stock, so the order keeps saying what was bought at
/// what price even if the catalog row is later edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    /// Product name at placement time.
    pub name: String,
    /// Units ordered. At least 1.
    pub quantity: u32,
    /// Price per unit at placement time.
    pub unit_price: Money,
}

impl OrderItem {
    /// Creates a new order item snapshot.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns the total price for this line (quantity * unit_price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A placed order.
///
/// `items` and `total` are immutable once persisted; only `status`
/// transitions afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    /// Total as declared by the client at placement. See
    /// [`Order::snapshot_total`] for the recomputed figure.
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new pending order for a user.
    pub fn new(user_id: UserId, items: Vec<OrderItem>, total: Money) -> Self {
        Self {
            id: OrderId::new(),
            user_id,
            items,
            total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Recomputes the total from the snapshotted line items.
    ///
    /// The persisted `total` is the client-declared figure; a mismatch
    /// between the two is logged at placement but tolerated.
    pub fn snapshot_total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Returns the number of line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

//! Order status machine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fulfillment status of an order.
///
/// Status transitions:
/// ```text
/// Pending ──► ForDelivery ──► Delivered
///    │             │
///    └─────────────┴──► Canceled
/// ```
///
/// Placement always creates orders as `Pending`; status changes are plain
/// field mutations with no stock effect. The one status that matters to the
/// inventory ledger is `Delivered`: deleting a delivered order does not
/// restore stock, because the goods have physically left the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, not yet dispatched.
    #[default]
    #[serde(rename = "pending")]
    Pending,

    /// Order handed to the courier.
    #[serde(rename = "for delivery")]
    ForDelivery,

    /// Order received by the customer (stock permanently consumed).
    #[serde(rename = "delivered")]
    Delivered,

    /// Order canceled before delivery.
    #[serde(rename = "canceled")]
    Canceled,
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct ParseStatusError(pub String);

impl OrderStatus {
    /// Returns true if deleting an order in this status restores stock.
    pub fn restores_stock_on_delete(&self) -> bool {
        !matches!(self, OrderStatus::Delivered)
    }

    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::ForDelivery => "for delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "for delivery" => Ok(OrderStatus::ForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            "canceled" => Ok(OrderStatus::Canceled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_only_delivered_keeps_stock_consumed() {
        assert!(OrderStatus::Pending.restores_stock_on_delete());
        assert!(OrderStatus::ForDelivery.restores_stock_on_delete());
        assert!(OrderStatus::Canceled.restores_stock_on_delete());
        assert!(!OrderStatus::Delivered.restores_stock_on_delete());
    }

    #[test]
    fn test_display_uses_wire_names() {
        assert_eq!(OrderStatus::Pending.to_string(), "pending");
        assert_eq!(OrderStatus::ForDelivery.to_string(), "for delivery");
        assert_eq!(OrderStatus::Delivered.to_string(), "delivered");
        assert_eq!(OrderStatus::Canceled.to_string(), "canceled");
    }

    #[test]
    fn test_from_str_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::ForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err, ParseStatusError("shipped".to_string()));
    }

    #[test]
    fn test_serialization_uses_wire_names() {
        let json = serde_json::to_string(&OrderStatus::ForDelivery).unwrap();
        assert_eq!(json, "\"for delivery\"");
        let back: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderStatus::ForDelivery);
    }
}

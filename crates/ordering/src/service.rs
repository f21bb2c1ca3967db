//! Ordering service: the engines' shared state and the non-core operations.

use audit::{AuditEntry, AuditSink};
use common::{OrderId, UserId};
use domain::{Order, OrderStatus};
use store::{Store, UnitOfWork};

use crate::{OrderingError, Result};

/// Orchestrates order placement, removal, and status changes against a store,
/// notifying an audit sink after each committed mutation.
pub struct OrderingService<S, A> {
    pub(crate) store: S,
    audit: A,
}

impl<S, A> OrderingService<S, A>
where
    S: Store,
    A: AuditSink,
{
    /// Creates a new ordering service.
    pub fn new(store: S, audit: A) -> Self {
        Self { store, audit }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the audit sink.
    pub fn audit(&self) -> &A {
        &self.audit
    }

    /// Loads an order by ID.
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order> {
        self.store
            .get_order(order_id)
            .await?
            .ok_or(OrderingError::OrderNotFound(order_id))
    }

    /// Updates an order's status.
    ///
    /// A plain field mutation with no stock effect; whether a later deletion
    /// restores stock depends on the status set here (`delivered` does not).
    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        actor: UserId,
    ) -> Result<Order> {
        let mut uow = self.store.begin().await?;
        let mut order = uow
            .fetch_order(order_id)
            .await?
            .ok_or(OrderingError::OrderNotFound(order_id))?;

        let old_status = order.status;
        uow.set_order_status(order_id, status).await?;
        uow.commit().await?;

        order.status = status;

        self.notify(AuditEntry::update(
            "Order",
            order_id,
            &format!("Order #{order_id}"),
            actor,
            serde_json::json!({ "status": old_status }),
            serde_json::json!({ "status": status }),
        ))
        .await;

        Ok(order)
    }

    /// Sends an entry to the audit sink, logging (not propagating) failure.
    ///
    /// Called only after the unit of work has committed; the business
    /// operation's outcome is already settled by the time this runs.
    pub(crate) async fn notify(&self, entry: AuditEntry) {
        if let Err(err) = self.audit.record(entry).await {
            tracing::warn!(error = %err, "audit notification failed");
        }
    }
}

//! Order removal: conditional stock restoration and record deletion.

use audit::{AuditEntry, AuditSink};
use common::{OrderId, UserId};
use store::{Store, StoreError, UnitOfWork};

use crate::{OrderingError, Result, service::OrderingService};

impl<S, A> OrderingService<S, A>
where
    S: Store,
    A: AuditSink,
{
    /// Removes an order, restoring its stock effect at most once.
    ///
    /// Unless the order was delivered, every snapshotted line item's quantity
    /// is added back to its product. A product that has since been deleted
    /// from the catalog is skipped with a warning; its line does not fail the
    /// removal. Restoration and deletion commit together, so re-invoking on
    /// the same ID finds no order (`OrderNotFound`) and never adjusts stock
    /// twice.
    #[tracing::instrument(skip(self))]
    pub async fn remove_order(&self, order_id: OrderId, actor: UserId) -> Result<()> {
        let mut uow = self.store.begin().await?;
        let order = uow
            .fetch_order(order_id)
            .await?
            .ok_or(OrderingError::OrderNotFound(order_id))?;

        if order.status.restores_stock_on_delete() {
            for item in &order.items {
                match uow.restore_stock(item.product_id, item.quantity).await? {
                    Some(new_stock) => {
                        tracing::debug!(
                            product_id = %item.product_id,
                            quantity = item.quantity,
                            new_stock,
                            "stock restored"
                        );
                    }
                    None => {
                        tracing::warn!(
                            product_id = %item.product_id,
                            quantity = item.quantity,
                            "product no longer in catalog; skipping stock restore"
                        );
                    }
                }
            }
        } else {
            tracing::debug!(order_id = %order_id, "order delivered; stock stays consumed");
        }

        // Capture the full prior state before it is gone.
        let old_values = serde_json::to_value(&order).map_err(StoreError::from)?;
        uow.delete_order(order_id).await?;
        uow.commit().await?;

        metrics::counter!("orders_removed_total").increment(1);

        self.notify(AuditEntry::delete(
            "Order",
            order_id,
            &format!("Order #{order_id}"),
            actor,
            old_values,
        ))
        .await;

        Ok(())
    }
}

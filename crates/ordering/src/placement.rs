//! Order placement: atomic stock validation, decrement, and order creation.

use audit::{AuditEntry, AuditSink};
use domain::{Order, OrderItem};
use store::{Store, UnitOfWork};

use crate::{OrderingError, PlaceOrder, Result, service::OrderingService};

impl<S, A> OrderingService<S, A>
where
    S: Store,
    A: AuditSink,
{
    /// Places an order.
    ///
    /// For each requested item, in client-submitted order, stock is checked
    /// and decremented under the store's lock; the first failure aborts the
    /// whole unit of work, so no partial decrement is ever observable. On
    /// success the order record (status `pending`, line items snapshotted
    /// from the locked product rows) commits together with the decrements,
    /// and the audit sink is notified best-effort.
    #[tracing::instrument(skip(self, request), fields(user_id = %request.user_id, items = request.items.len()))]
    pub async fn place_order(&self, request: PlaceOrder) -> Result<Order> {
        request.validate()?;

        // Reject unknown products before opening the unit of work. A product
        // deleted between this check and the decrement still surfaces as
        // ProductNotFound from inside the transaction.
        for item in &request.items {
            if self.store.get_product(item.product_id).await?.is_none() {
                return Err(OrderingError::ProductNotFound(item.product_id));
            }
        }

        let mut uow = self.store.begin().await?;

        let mut items = Vec::with_capacity(request.items.len());
        for requested in &request.items {
            let decrement = match uow
                .try_decrement(requested.product_id, requested.quantity)
                .await
            {
                Ok(decrement) => decrement,
                Err(err) => {
                    // Dropping the unit of work rolls back every decrement
                    // applied so far.
                    metrics::counter!("orders_rejected_total").increment(1);
                    return Err(err.into());
                }
            };

            items.push(OrderItem::new(
                decrement.product_id,
                decrement.name,
                requested.quantity,
                decrement.unit_price,
            ));
        }

        let order = Order::new(request.user_id, items, request.total);
        uow.insert_order(&order).await?;
        uow.commit().await?;

        metrics::counter!("orders_placed_total").increment(1);

        let computed = order.snapshot_total();
        if order.total != computed {
            // Declared totals are trusted but flagged.
            tracing::warn!(
                order_id = %order.id,
                declared = %order.total,
                computed = %computed,
                "declared total disagrees with snapshot total"
            );
        }

        self.notify(AuditEntry::create(
            "Order",
            order.id,
            &format!("Order #{}", order.id),
            request.user_id,
            serde_json::json!({
                "user_id": order.user_id,
                "total": order.total.cents(),
                "items_count": order.item_count(),
            }),
        ))
        .await;

        Ok(order)
    }
}

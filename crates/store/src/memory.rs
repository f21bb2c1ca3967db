use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, ProductId};
use domain::{Order, OrderStatus, Product};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    Result, StoreError,
    store::{StockDecrement, Store, UnitOfWork},
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    products: HashMap<ProductId, Product>,
    orders: HashMap<OrderId, Order>,
}

/// In-memory store implementation for tests and local runs.
///
/// Provides the same interface and semantics as the PostgreSQL store. A unit
/// of work holds the single state mutex for its whole lifetime and mutates a
/// scratch copy, so units of work are fully serialized (trivially meeting the
/// no-joint-overdraw requirement) and dropping one without committing
/// discards every mutation.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a product directly, outside any unit of work. Test seeding.
    pub async fn add_product(&self, product: Product) {
        self.state.lock().await.products.insert(product.id, product);
    }

    /// Returns the number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.state.lock().await.orders.len()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    type Uow = InMemoryUnitOfWork;

    async fn begin(&self) -> Result<Self::Uow> {
        let guard = self.state.clone().lock_owned().await;
        let scratch = guard.clone();
        Ok(InMemoryUnitOfWork { guard, scratch })
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.state.lock().await.products.get(&id).cloned())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.state.lock().await.orders.get(&id).cloned())
    }
}

/// A unit of work over a scratch copy of the in-memory state.
pub struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    scratch: MemoryState,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn try_decrement(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<StockDecrement> {
        let product = self
            .scratch
            .products
            .get_mut(&product_id)
            .ok_or(StoreError::ProductNotFound(product_id))?;

        if product.stock < i64::from(quantity) {
            return Err(StoreError::InsufficientStock {
                product_id,
                name: product.name.clone(),
                available: product.stock,
            });
        }

        product.stock -= i64::from(quantity);

        Ok(StockDecrement {
            product_id,
            name: product.name.clone(),
            unit_price: product.price,
            remaining: product.stock,
        })
    }

    async fn restore_stock(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Option<i64>> {
        match self.scratch.products.get_mut(&product_id) {
            Some(product) => {
                product.stock += i64::from(quantity);
                Ok(Some(product.stock))
            }
            None => Ok(None),
        }
    }

    async fn insert_product(&mut self, product: &Product) -> Result<()> {
        self.scratch.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn insert_order(&mut self, order: &Order) -> Result<()> {
        self.scratch.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn fetch_order(&mut self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.scratch.orders.get(&id).cloned())
    }

    async fn set_order_status(&mut self, id: OrderId, status: OrderStatus) -> Result<bool> {
        match self.scratch.orders.get_mut(&id) {
            Some(order) => {
                order.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_order(&mut self, id: OrderId) -> Result<bool> {
        Ok(self.scratch.orders.remove(&id).is_some())
    }

    async fn commit(mut self) -> Result<()> {
        *self.guard = self.scratch;
        Ok(())
    }
}

use async_trait::async_trait;
use common::{OrderId, ProductId};
use domain::{Money, Order, OrderStatus, Product};

use crate::Result;

/// Outcome of a successful stock decrement.
///
/// The row was read under the ledger's lock, so `name` and `unit_price` are
/// exactly the values in effect at the moment the stock was taken. Placement
/// uses them as the line-item snapshot.
#[derive(Debug, Clone)]
pub struct StockDecrement {
    pub product_id: ProductId,
    /// Product name at decrement time.
    pub name: String,
    /// Unit price at decrement time.
    pub unit_price: Money,
    /// Stock remaining after the decrement.
    pub remaining: i64,
}

/// Core trait for store implementations.
///
/// A store owns the product catalog (with the stock ledger) and the order
/// records. All mutations go through a [`UnitOfWork`]; the read helpers here
/// are non-transactional conveniences for the API's GET surface and tests.
#[async_trait]
pub trait Store: Send + Sync {
    /// The unit-of-work type this store produces.
    type Uow: UnitOfWork;

    /// Begins an atomic unit of work.
    ///
    /// Every mutation performed on the returned value is invisible to other
    /// callers until [`UnitOfWork::commit`]; dropping it without committing
    /// discards all of them.
    async fn begin(&self) -> Result<Self::Uow>;

    /// Fetches a product by ID outside any unit of work.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>>;

    /// Fetches an order by ID outside any unit of work.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>>;
}

/// One atomic unit of work against the store.
///
/// The ledger operations (`try_decrement`, `restore_stock`) and the order
/// record operations all act within the same transaction boundary: they
/// commit together or not at all. Implementations must guarantee that two
/// concurrent units of work cannot both observe pre-decrement stock and both
/// succeed when only one has sufficient quantity. Postgres takes a row-level
/// lock; the in-memory store serializes units of work outright.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Atomically checks and decrements a product's stock.
    ///
    /// Fails with [`StoreError::ProductNotFound`] if the product does not
    /// exist and [`StoreError::InsufficientStock`] if fewer than `quantity`
    /// units are available; in both cases the stock is untouched.
    ///
    /// [`StoreError::ProductNotFound`]: crate::StoreError::ProductNotFound
    /// [`StoreError::InsufficientStock`]: crate::StoreError::InsufficientStock
    async fn try_decrement(&mut self, product_id: ProductId, quantity: u32)
    -> Result<StockDecrement>;

    /// Unconditionally adds `quantity` back to a product's stock.
    ///
    /// Returns the new stock level, or `None` if the product row has been
    /// deleted from the catalog. A historical order may still reference a
    /// gone product; restoring its stock is a tolerated no-op.
    async fn restore_stock(&mut self, product_id: ProductId, quantity: u32)
    -> Result<Option<i64>>;

    /// Inserts a product into the catalog.
    async fn insert_product(&mut self, product: &Product) -> Result<()>;

    /// Inserts a new order record.
    async fn insert_order(&mut self, order: &Order) -> Result<()>;

    /// Fetches an order within this unit of work.
    async fn fetch_order(&mut self, id: OrderId) -> Result<Option<Order>>;

    /// Updates an order's status. Returns false if the order does not exist.
    async fn set_order_status(&mut self, id: OrderId, status: OrderStatus) -> Result<bool>;

    /// Deletes an order record. Returns false if the order does not exist.
    async fn delete_order(&mut self, id: OrderId) -> Result<bool>;

    /// Commits the unit of work, making all mutations visible atomically.
    async fn commit(self) -> Result<()>;
}

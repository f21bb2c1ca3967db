use async_trait::async_trait;
use common::{OrderId, ProductId, UserId};
use domain::{Money, Order, OrderItem, OrderStatus, Product};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Result, StoreError,
    store::{StockDecrement, Store, UnitOfWork},
};

/// PostgreSQL-backed store implementation.
///
/// Isolation: READ COMMITTED with pessimistic row locking. `try_decrement`
/// takes `SELECT ... FOR UPDATE` on the product row before checking
/// availability, so concurrent placements against the same product serialize
/// on that row and can never jointly overdraw it.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        tracing::info!("running database migrations");
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            stock: row.try_get("stock")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let items_json: serde_json::Value = row.try_get("items")?;
        let items: Vec<OrderItem> = serde_json::from_value(items_json)?;
        let status_json = serde_json::Value::String(row.try_get("status")?);
        let status: OrderStatus = serde_json::from_value(status_json)?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            items,
            total: Money::from_cents(row.try_get("total_cents")?),
            status,
            created_at: row.try_get("created_at")?,
        })
    }
}

const SELECT_ORDER: &str =
    "SELECT id, user_id, items, total_cents, status, created_at FROM orders WHERE id = $1";

#[async_trait]
impl Store for PostgresStore {
    type Uow = PostgresUnitOfWork;

    async fn begin(&self) -> Result<Self::Uow> {
        let tx = self.pool.begin().await?;
        Ok(PostgresUnitOfWork { tx })
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query(
            "SELECT id, name, price_cents, stock, created_at FROM products WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(SELECT_ORDER)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }
}

/// A unit of work backed by a Postgres transaction.
///
/// Dropping it without calling [`commit`](UnitOfWork::commit) rolls the
/// transaction back; there is no exit path that leaves partial mutations
/// behind.
pub struct PostgresUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn try_decrement(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<StockDecrement> {
        // Row lock first; the availability check and the update happen under it.
        let row = sqlx::query("SELECT name, price_cents, stock FROM products WHERE id = $1 FOR UPDATE")
            .bind(product_id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or(StoreError::ProductNotFound(product_id))?;

        let name: String = row.try_get("name")?;
        let unit_price = Money::from_cents(row.try_get("price_cents")?);
        let available: i64 = row.try_get("stock")?;

        if available < i64::from(quantity) {
            return Err(StoreError::InsufficientStock {
                product_id,
                name,
                available,
            });
        }

        let remaining: i64 =
            sqlx::query_scalar("UPDATE products SET stock = stock - $2 WHERE id = $1 RETURNING stock")
                .bind(product_id.as_uuid())
                .bind(i64::from(quantity))
                .fetch_one(&mut *self.tx)
                .await?;

        tracing::debug!(%product_id, quantity, remaining, "stock decremented");

        Ok(StockDecrement {
            product_id,
            name,
            unit_price,
            remaining,
        })
    }

    async fn restore_stock(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Option<i64>> {
        let new_stock: Option<i64> =
            sqlx::query_scalar("UPDATE products SET stock = stock + $2 WHERE id = $1 RETURNING stock")
                .bind(product_id.as_uuid())
                .bind(i64::from(quantity))
                .fetch_optional(&mut *self.tx)
                .await?;

        Ok(new_stock)
    }

    async fn insert_product(&mut self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, stock, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.price.cents())
        .bind(product.stock)
        .bind(product.created_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn insert_order(&mut self, order: &Order) -> Result<()> {
        let items_json = serde_json::to_value(&order.items)?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, items, total_cents, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(items_json)
        .bind(order.total.cents())
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn fetch_order(&mut self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(SELECT_ORDER)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await?;

        row.map(PostgresStore::row_to_order).transpose()
    }

    async fn set_order_status(&mut self, id: OrderId, status: OrderStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_order(&mut self, id: OrderId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

//! Inventory ledger and order record store.
//!
//! The two backends, [`PostgresStore`] and [`InMemoryStore`], expose the
//! same [`Store`] / [`UnitOfWork`] interface: check-and-decrement and restore
//! operations on product stock, plus order record persistence, all inside one
//! atomic unit of work. The in-memory store exists for tests and local runs
//! and mirrors the Postgres semantics, including full rollback on drop.

pub mod error;
pub mod store;

mod memory;
mod postgres;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use store::{StockDecrement, Store, UnitOfWork};

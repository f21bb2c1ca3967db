//! Shared identifier types used across the shop backend.

mod types;

pub use types::{OrderId, ProductId, UserId};

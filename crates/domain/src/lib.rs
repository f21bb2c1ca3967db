//! Domain model for the shop backend.
//!
//! Products carry the authoritative stock counter; orders carry an immutable
//! snapshot of the line items taken at placement time. Stock itself is only
//! mutated through the store's ledger operations, never directly on these
//! types.

mod money;
mod order;
mod product;
mod status;

pub use money::Money;
pub use order::{Order, OrderItem};
pub use product::Product;
pub use status::{OrderStatus, ParseStatusError};

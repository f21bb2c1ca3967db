//! Order placement and removal engines.
//!
//! [`OrderingService`] orchestrates the two operations with a correctness
//! contract: placement atomically validates and decrements stock for every
//! line item and creates the order record, all-or-nothing; removal restores
//! stock (unless the order was delivered) and deletes the record, within one
//! unit of work. The audit sink is notified after commit, best-effort.

mod error;
mod placement;
mod removal;
mod request;
mod service;

pub use error::{OrderingError, Result};
pub use request::{PlaceOrder, RequestedItem};
pub use service::OrderingService;

//! Audit sink contract.
//!
//! The ordering engines notify the sink after a unit of work has committed.
//! Notification is strictly best-effort: a sink failure is logged by the
//! caller and never affects the committed business operation. The audit
//! trail itself (storage, querying, retention) is owned elsewhere; this crate
//! only defines the consumed interface, a tracing-backed sink, and an
//! in-memory recorder for tests.

mod entry;
mod sink;

pub use entry::{AuditAction, AuditEntry};
pub use sink::{AuditError, AuditSink, InMemoryAuditSink, TracingAuditSink};

//! Audit sink trait and implementations.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use crate::AuditEntry;

/// Error returned by a failing sink.
///
/// Callers log this and move on; it never propagates into the business
/// operation's result.
#[derive(Debug, Error)]
#[error("audit sink failure: {0}")]
pub struct AuditError(pub String);

/// Trait for audit sink implementations.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Records one audit entry.
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

/// Sink that emits each entry as a structured log line.
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    /// Creates a new tracing-backed sink.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        tracing::info!(
            action = %entry.action,
            entity_type = %entry.entity_type,
            entity_id = %entry.entity_id,
            actor = %entry.actor,
            description = %entry.description,
            "audit"
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryAuditState {
    entries: Vec<AuditEntry>,
    fail_on_record: bool,
}

/// In-memory audit sink for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditSink {
    state: Arc<RwLock<InMemoryAuditState>>,
}

impl InMemoryAuditSink {
    /// Creates a new in-memory audit sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the sink to fail on subsequent record calls.
    pub fn set_fail_on_record(&self, fail: bool) {
        self.state.write().unwrap().fail_on_record = fail;
    }

    /// Returns a copy of all recorded entries.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.state.read().unwrap().entries.clone()
    }

    /// Returns the number of recorded entries.
    pub fn entry_count(&self) -> usize {
        self.state.read().unwrap().entries.len()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_record {
            return Err(AuditError("sink unavailable".to_string()));
        }

        state.entries.push(entry);
        Ok(())
    }
}

//! Audit entry types.

use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};

/// The kind of action being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Logout,
}

impl AuditAction {
    /// Returns the action name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One audit trail record.
///
/// The actor is an explicit parameter threaded from the caller; there is no
/// ambient request context to pull an identity from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: AuditAction,
    /// Entity kind, e.g. `"Order"` or `"Product"`.
    pub entity_type: String,
    /// Identity of the affected entity, stringified.
    pub entity_id: String,
    /// The user performing the action.
    pub actor: UserId,
    pub description: String,
    /// State before the action, where meaningful (update, delete).
    pub old_values: Option<serde_json::Value>,
    /// State after the action, where meaningful (create, update).
    pub new_values: Option<serde_json::Value>,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    fn new(
        action: AuditAction,
        entity_type: impl Into<String>,
        entity_id: impl ToString,
        actor: UserId,
        description: String,
        old_values: Option<serde_json::Value>,
        new_values: Option<serde_json::Value>,
    ) -> Self {
        Self {
            action,
            entity_type: entity_type.into(),
            entity_id: entity_id.to_string(),
            actor,
            description,
            old_values,
            new_values,
            recorded_at: Utc::now(),
        }
    }

    /// Builds a create-action entry.
    pub fn create(
        entity_type: &str,
        entity_id: impl ToString,
        name: &str,
        actor: UserId,
        new_values: serde_json::Value,
    ) -> Self {
        Self::new(
            AuditAction::Create,
            entity_type,
            entity_id,
            actor,
            format!("Created {entity_type}: {name}"),
            None,
            Some(new_values),
        )
    }

    /// Builds an update-action entry.
    pub fn update(
        entity_type: &str,
        entity_id: impl ToString,
        name: &str,
        actor: UserId,
        old_values: serde_json::Value,
        new_values: serde_json::Value,
    ) -> Self {
        Self::new(
            AuditAction::Update,
            entity_type,
            entity_id,
            actor,
            format!("Updated {entity_type}: {name}"),
            Some(old_values),
            Some(new_values),
        )
    }

    /// Builds a delete-action entry.
    pub fn delete(
        entity_type: &str,
        entity_id: impl ToString,
        name: &str,
        actor: UserId,
        old_values: serde_json::Value,
    ) -> Self {
        Self::new(
            AuditAction::Delete,
            entity_type,
            entity_id,
            actor,
            format!("Deleted {entity_type}: {name}"),
            Some(old_values),
            None,
        )
    }
}

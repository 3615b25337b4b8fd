//! Audit trail model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::enums::AuditAction;
use super::session::SessionContext;

/// One immutable record of a state-changing action
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub action: AuditAction,
    /// Entity the action touched ("devices", "requests", "auth")
    pub entity: String,
    /// Identity provider subject of the acting staff member
    pub actor_id: String,
    pub actor_name: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(
        ctx: &SessionContext,
        action: AuditAction,
        entity: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            entity: entity.into(),
            actor_id: ctx.actor_id.clone(),
            actor_name: ctx.actor_name.clone(),
            details: details.into(),
            created_at: Utc::now(),
        }
    }
}

/// Audit trail query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AuditQuery {
    /// Filter by action keyword (CREATE, UPDATE, LOGIN)
    pub action: Option<AuditAction>,
    /// Only entries at or after this instant
    pub from: Option<DateTime<Utc>>,
    /// Only entries at or before this instant
    pub to: Option<DateTime<Utc>>,
    /// Case-insensitive match on actor name or details
    pub q: Option<String>,
}

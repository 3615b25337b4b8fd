//! Audit trail service
//!
//! Recording is fire-and-forget: a failed append is logged and swallowed so
//! it can never block the business operation that triggered it.

use crate::{
    error::AppResult,
    models::{
        audit::{AuditLogEntry, AuditQuery},
        enums::AuditAction,
        session::SessionContext,
    },
    store::DynStore,
};

#[derive(Clone)]
pub struct AuditService {
    store: DynStore,
}

impl AuditService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// Append one entry for a state-changing action.
    pub async fn record(
        &self,
        ctx: &SessionContext,
        action: AuditAction,
        entity: &str,
        details: impl Into<String>,
    ) -> AuditLogEntry {
        let entry = AuditLogEntry::new(ctx, action, entity, details);
        if let Err(err) = self.store.append_audit(&entry).await {
            tracing::error!(error = %err, entity, "failed to append audit entry");
        }
        entry
    }

    /// Query the trail, newest first.
    pub async fn query(&self, query: &AuditQuery) -> AppResult<Vec<AuditLogEntry>> {
        self.store.list_audit(query).await
    }
}

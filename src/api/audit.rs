//! Audit trail endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::audit::{AuditLogEntry, AuditQuery},
};

use super::AuthenticatedUser;

/// Audit trail response
#[derive(Serialize, ToSchema)]
pub struct AuditListResponse {
    pub entries: Vec<AuditLogEntry>,
    pub total: i64,
}

/// Query the audit trail
#[utoipa::path(
    get,
    path = "/audit",
    tag = "audit",
    security(("bearer_auth" = [])),
    params(AuditQuery),
    responses(
        (status = 200, description = "Audit entries, newest first", body = AuditListResponse)
    )
)]
pub async fn list_audit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<AuditListResponse>> {
    let entries = state.services.audit.query(&query).await?;
    let total = entries.len() as i64;
    Ok(Json(AuditListResponse { entries, total }))
}

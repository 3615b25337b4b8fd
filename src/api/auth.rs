//! Session endpoints
//!
//! Sign-in, factor enrollment and verification all happen at the external
//! identity provider. The console calls `POST /auth/session` once the
//! provider flow completes so the sign-in lands in the audit trail.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{enums::AuditAction, session::AssuranceLevel},
};

use super::AuthenticatedUser;

/// Session info response
#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub actor_id: String,
    pub actor_name: String,
    pub email: String,
    pub assurance: AssuranceLevel,
}

/// Acknowledge a completed identity-provider sign-in
#[utoipa::path(
    post,
    path = "/auth/session",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session acknowledged", body = SessionResponse),
        (status = 401, description = "Invalid or missing session token")
    )
)]
pub async fn acknowledge_session(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<SessionResponse>> {
    let ctx = claims.session();

    let details = match ctx.assurance {
        AssuranceLevel::Aal2 => "User logged in with 2FA",
        AssuranceLevel::Aal1 => "User logged in",
    };
    state
        .services
        .audit
        .record(&ctx, AuditAction::Login, "auth", details)
        .await;

    Ok(Json(SessionResponse {
        actor_id: ctx.actor_id,
        actor_name: ctx.actor_name,
        email: claims.email,
        assurance: claims.aal,
    }))
}

/// Get the current session
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Invalid or missing session token")
    )
)]
pub async fn me(
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<SessionResponse>> {
    let ctx = claims.session();
    Ok(Json(SessionResponse {
        actor_id: ctx.actor_id,
        actor_name: ctx.actor_name,
        email: claims.email,
        assurance: claims.aal,
    }))
}

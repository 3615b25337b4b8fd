//! Dashboard statistics endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Fleet counters
#[derive(Serialize, ToSchema)]
pub struct DeviceStats {
    pub total: i64,
    pub available: i64,
    pub busy: i64,
    pub maintenance: i64,
}

/// Request book counters
#[derive(Serialize, ToSchema)]
pub struct RequestStats {
    /// pending + assigned + in_progress
    pub active: i64,
    pub pending: i64,
    pub delivered: i64,
    pub cancelled: i64,
}

/// Dashboard statistics response
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    pub devices: DeviceStats,
    pub requests: RequestStats,
}

/// Get dashboard statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Fleet and request counters", body = StatsResponse)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.overview().await?;
    Ok(Json(stats))
}

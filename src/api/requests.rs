//! Delivery request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::request::{CreateRequest, DeliveryRequest, RequestQuery, UpdateRequestStatus},
};

use super::AuthenticatedUser;

/// Requests list response
#[derive(Serialize, ToSchema)]
pub struct RequestsListResponse {
    pub requests: Vec<DeliveryRequest>,
    pub total: i64,
}

/// List delivery requests
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(RequestQuery),
    responses(
        (status = 200, description = "Requests, most recently created first", body = RequestsListResponse)
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<RequestQuery>,
) -> AppResult<Json<RequestsListResponse>> {
    let requests = state.services.requests.list(&query).await?;
    let total = requests.len() as i64;
    Ok(Json(RequestsListResponse { requests, total }))
}

/// Get request by ID
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = DeliveryRequest),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeliveryRequest>> {
    let request = state.services.requests.get(id).await?;
    Ok(Json(request))
}

/// Create a delivery request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created", body = DeliveryRequest),
        (status = 400, description = "Invalid request"),
        (status = 422, description = "No device exists with sufficient capacity")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<DeliveryRequest>)> {
    let ctx = claims.session();
    let request = state.services.requests.create(&ctx, &data).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Update request status
///
/// Moving to `assigned` auto-assigns the first free device with sufficient
/// capacity; moving to `delivered` frees it again.
#[utoipa::path(
    put,
    path = "/requests/{id}/status",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = UpdateRequestStatus,
    responses(
        (status = 200, description = "Request updated", body = DeliveryRequest),
        (status = 400, description = "Illegal lifecycle transition"),
        (status = 403, description = "Forced transition without a two-factor session"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "No available device with sufficient capacity")
    )
)]
pub async fn update_request_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateRequestStatus>,
) -> AppResult<Json<DeliveryRequest>> {
    let ctx = claims.session();
    let request = state.services.requests.transition(&ctx, id, &data).await?;
    Ok(Json(request))
}

//! Device registry endpoints

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
    models::device::{CreateDevice, Device, DeviceQuery, UpdateDeviceStatus},
};

use super::AuthenticatedUser;

/// Devices list response
#[derive(Serialize, ToSchema)]
pub struct DevicesListResponse {
    pub devices: Vec<Device>,
    pub total: i64,
}

/// List registered devices
#[utoipa::path(
    get,
    path = "/devices",
    tag = "devices",
    security(("bearer_auth" = [])),
    params(DeviceQuery),
    responses(
        (status = 200, description = "Devices, most recently registered first", body = DevicesListResponse)
    )
)]
pub async fn list_devices(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<DeviceQuery>,
) -> AppResult<Json<DevicesListResponse>> {
    let devices = state.services.devices.list(&query).await?;
    let total = devices.len() as i64;
    Ok(Json(DevicesListResponse { devices, total }))
}

/// Get device by ID
#[utoipa::path(
    get,
    path = "/devices/{id}",
    tag = "devices",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Device details", body = Device),
        (status = 404, description = "Device not found")
    )
)]
pub async fn get_device(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Device>> {
    let device = state.services.devices.get(id).await?;
    Ok(Json(device))
}

/// Register a new device
#[utoipa::path(
    post,
    path = "/devices",
    tag = "devices",
    security(("bearer_auth" = [])),
    request_body = CreateDevice,
    responses(
        (status = 201, description = "Device registered", body = Device),
        (status = 400, description = "Invalid capacity or missing field"),
        (status = 409, description = "Serial number already registered")
    )
)]
pub async fn register_device(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateDevice>,
) -> AppResult<(StatusCode, Json<Device>)> {
    let ctx = claims.session();
    let device = state.services.devices.register(&ctx, &data).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// Update device status (maintenance toggling etc.)
#[utoipa::path(
    put,
    path = "/devices/{id}/status",
    tag = "devices",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Device ID")),
    request_body = UpdateDeviceStatus,
    responses(
        (status = 200, description = "Device updated", body = Device),
        (status = 404, description = "Device not found")
    )
)]
pub async fn update_device_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateDeviceStatus>,
) -> AppResult<Json<Device>> {
    let ctx = claims.session();
    let device = state.services.devices.set_status(&ctx, id, data.status).await?;
    Ok(Json(device))
}

//! Delivery device model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::{DeviceStatus, DeviceType};

/// Registered delivery device (drone or ground robot)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Device {
    pub id: Uuid,
    /// Manufacturer model, e.g. "DJI Matrice 300"
    pub model: String,
    pub device_type: DeviceType,
    /// Maximum payload in kilograms, strictly positive
    pub capacity_kg: f64,
    /// Free-text autonomy descriptor, e.g. "55 min"
    pub battery_autonomy: String,
    /// Unique hardware serial
    pub serial_number: String,
    pub status: DeviceStatus,
    pub address: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Register device request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDevice {
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    pub device_type: DeviceType,
    pub capacity_kg: f64,
    #[validate(length(min = 1, message = "Battery autonomy is required"))]
    pub battery_autonomy: String,
    #[validate(length(min = 1, message = "Serial number is required"))]
    pub serial_number: String,
    pub address: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
}

/// Device status update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDeviceStatus {
    pub status: DeviceStatus,
}

/// Device list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct DeviceQuery {
    /// Filter by status
    pub status: Option<DeviceStatus>,
    /// Fuzzy match on model or serial number
    pub q: Option<String>,
}

//! Delivery request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::{CampusLocation, RequestStatus, RequestType};

/// Delivery request
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DeliveryRequest {
    pub id: Uuid,
    pub requester_firstname: String,
    pub requester_lastname: String,
    /// Email address notifications are sent to
    pub contact_email: String,
    pub origin: CampusLocation,
    pub destination: CampusLocation,
    /// Payload weight in kilograms, strictly positive
    pub weight_kg: f64,
    /// Free-text size descriptor, e.g. "20x20x20"
    pub size_vol: String,
    pub request_type: RequestType,
    pub status: RequestStatus,
    /// Device carrying the delivery; kept as history after delivery
    pub assigned_device_id: Option<Uuid>,
    /// Opaque pickup confirmation token, rendered as a QR image for the requester
    pub verification_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create delivery request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequest {
    #[validate(length(min = 1, message = "Requester first name is required"))]
    pub requester_firstname: String,
    #[validate(length(min = 1, message = "Requester last name is required"))]
    pub requester_lastname: String,
    #[validate(email(message = "Invalid email format"))]
    pub contact_email: String,
    pub origin: CampusLocation,
    pub destination: CampusLocation,
    pub weight_kg: f64,
    #[validate(length(min = 1, message = "Size descriptor is required"))]
    pub size_vol: String,
    pub request_type: RequestType,
}

/// Request status update
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRequestStatus {
    pub status: RequestStatus,
    /// Override the lifecycle transition table (requires a two-factor session)
    #[serde(default)]
    pub force: bool,
}

/// Request list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct RequestQuery {
    /// Filter by status
    pub status: Option<RequestStatus>,
    /// Fuzzy match on origin or destination
    pub q: Option<String>,
}

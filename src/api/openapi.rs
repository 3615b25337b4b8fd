//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{audit, auth, devices, health, requests, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CampusFleet API",
        version = "1.0.0",
        description = "Campus Drone & Robot Delivery Administration REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "CampusFleet Team", email = "fleet@campusfleet.org")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::acknowledge_session,
        auth::me,
        // Devices
        devices::list_devices,
        devices::get_device,
        devices::register_device,
        devices::update_device_status,
        // Requests
        requests::list_requests,
        requests::get_request,
        requests::create_request,
        requests::update_request_status,
        // Audit
        audit::list_audit,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::SessionResponse,
            crate::models::session::AssuranceLevel,
            // Devices
            crate::models::device::Device,
            crate::models::device::CreateDevice,
            crate::models::device::UpdateDeviceStatus,
            crate::models::device::DeviceQuery,
            crate::models::enums::DeviceType,
            crate::models::enums::DeviceStatus,
            devices::DevicesListResponse,
            // Requests
            crate::models::request::DeliveryRequest,
            crate::models::request::CreateRequest,
            crate::models::request::UpdateRequestStatus,
            crate::models::request::RequestQuery,
            crate::models::enums::RequestType,
            crate::models::enums::RequestStatus,
            crate::models::enums::CampusLocation,
            requests::RequestsListResponse,
            // Audit
            crate::models::audit::AuditLogEntry,
            crate::models::audit::AuditQuery,
            crate::models::enums::AuditAction,
            audit::AuditListResponse,
            // Stats
            stats::StatsResponse,
            stats::DeviceStats,
            stats::RequestStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Session acknowledgement"),
        (name = "devices", description = "Device registry"),
        (name = "requests", description = "Delivery request lifecycle"),
        (name = "audit", description = "Audit trail"),
        (name = "stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

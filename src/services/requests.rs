//! Delivery request lifecycle service
//!
//! Owns the request state machine and the capacity-based device assignment.
//! Device claiming is delegated to the store as one atomic conditional
//! update, so a concurrent transition can never bind the same device twice.

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        device::Device,
        enums::{AuditAction, DeviceStatus, RequestStatus},
        request::{CreateRequest, DeliveryRequest, RequestQuery, UpdateRequestStatus},
        session::SessionContext,
    },
    store::DynStore,
};

use super::{audit::AuditService, email::EmailService};

/// Opaque pickup confirmation token, rendered as a QR image for the requester
fn generate_verification_code() -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!("QR-{}", token.to_uppercase())
}

#[derive(Clone)]
pub struct RequestsService {
    store: DynStore,
    audit: AuditService,
    email: EmailService,
}

impl RequestsService {
    pub fn new(store: DynStore, audit: AuditService, email: EmailService) -> Self {
        Self { store, audit, email }
    }

    /// Create a delivery request in `pending` status.
    ///
    /// Fails with a capacity error when no registered device, whatever its
    /// current status, could ever carry the weight; in that case nothing is
    /// persisted.
    pub async fn create(
        &self,
        ctx: &SessionContext,
        data: &CreateRequest,
    ) -> AppResult<DeliveryRequest> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if data.weight_kg <= 0.0 {
            return Err(AppError::Validation(
                "Weight must be greater than zero".to_string(),
            ));
        }

        if !self.store.has_device_with_capacity(data.weight_kg).await? {
            return Err(AppError::Capacity(format!(
                "No device exists with sufficient capacity for {} kg",
                data.weight_kg
            )));
        }

        let request = DeliveryRequest {
            id: Uuid::new_v4(),
            requester_firstname: data.requester_firstname.clone(),
            requester_lastname: data.requester_lastname.clone(),
            contact_email: data.contact_email.clone(),
            origin: data.origin,
            destination: data.destination,
            weight_kg: data.weight_kg,
            size_vol: data.size_vol.clone(),
            request_type: data.request_type,
            status: RequestStatus::Pending,
            assigned_device_id: None,
            verification_code: Some(generate_verification_code()),
            created_at: Utc::now(),
        };

        self.store.create_request(&request).await?;

        self.audit
            .record(
                ctx,
                AuditAction::Create,
                "requests",
                format!(
                    "Request from {} to {} by {} {}",
                    request.origin,
                    request.destination,
                    request.requester_firstname,
                    request.requester_lastname
                ),
            )
            .await;

        if let Err(err) = self.email.send_request_created(&request).await {
            tracing::warn!(error = %err, request_id = %request.id, "request-created notification failed");
        }

        Ok(request)
    }

    /// Move a request to `target` status.
    ///
    /// Off-table edges need `force: true` and a two-factor session. Entering
    /// `assigned` claims a device; leaving a holding state into `delivered`
    /// (or a forced `cancelled`) releases it. The device linkage survives as
    /// history.
    pub async fn transition(
        &self,
        ctx: &SessionContext,
        id: Uuid,
        update: &UpdateRequestStatus,
    ) -> AppResult<DeliveryRequest> {
        let request = self
            .store
            .get_request(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

        let target = update.status;
        let on_table = request.status.can_transition_to(target);
        if !on_table {
            if !update.force {
                return Err(AppError::Validation(format!(
                    "Illegal transition {} -> {}",
                    request.status, target
                )));
            }
            ctx.require_two_factor()?;
        }

        // Auto-assignment: claim atomically, leave the request untouched on failure.
        let mut claimed: Option<Device> = None;
        if target == RequestStatus::Assigned && request.assigned_device_id.is_none() {
            let device = self
                .store
                .claim_device(request.weight_kg)
                .await?
                .ok_or_else(|| {
                    AppError::NoAvailableDevice(
                        "No available device with sufficient capacity".to_string(),
                    )
                })?;
            claimed = Some(device);
        }

        let releases_device = request.status.holds_device()
            && matches!(target, RequestStatus::Delivered | RequestStatus::Cancelled);

        let updated = self
            .store
            .update_request_status(id, target, claimed.as_ref().map(|d| d.id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

        if let Some(device) = &claimed {
            self.audit
                .record(
                    ctx,
                    AuditAction::Update,
                    "devices",
                    format!("Updated status of {} to busy", device.serial_number),
                )
                .await;
        }

        if releases_device {
            if let Some(device_id) = request.assigned_device_id {
                if let Some(device) = self
                    .store
                    .update_device_status(device_id, DeviceStatus::Available)
                    .await?
                {
                    self.audit
                        .record(
                            ctx,
                            AuditAction::Update,
                            "devices",
                            format!("Updated status of {} to available", device.serial_number),
                        )
                        .await;
                }
            }
        }

        let mut details = format!("Status changed to {}", target);
        if let Some(device) = &claimed {
            details.push_str(&format!(" - Device assigned: {}", device.serial_number));
        }
        if !on_table {
            details.push_str(" (forced)");
        }
        self.audit
            .record(ctx, AuditAction::Update, "requests", details)
            .await;

        if let Err(err) = self.email.send_request_status(&updated).await {
            tracing::warn!(error = %err, request_id = %updated.id, "status notification failed");
        }

        Ok(updated)
    }

    /// Get request by ID
    pub async fn get(&self, id: Uuid) -> AppResult<DeliveryRequest> {
        self.store
            .get_request(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))
    }

    /// List requests, most-recently-created first
    pub async fn list(&self, query: &RequestQuery) -> AppResult<Vec<DeliveryRequest>> {
        self.store.list_requests(query).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::EmailConfig;
    use crate::models::audit::AuditQuery;
    use crate::models::device::CreateDevice;
    use crate::models::enums::{CampusLocation, DeviceType, RequestType};
    use crate::models::session::AssuranceLevel;
    use crate::services::devices::DevicesService;

    struct Fixture {
        devices: DevicesService,
        requests: RequestsService,
        audit: AuditService,
    }

    fn fixture() -> Fixture {
        let store: DynStore = Arc::new(crate::store::MemoryStore::new());
        let audit = AuditService::new(store.clone());
        let email = EmailService::new(EmailConfig::default());
        Fixture {
            devices: DevicesService::new(store.clone(), audit.clone()),
            requests: RequestsService::new(store, audit.clone(), email),
            audit,
        }
    }

    fn ctx() -> SessionContext {
        SessionContext {
            actor_id: "user-1".to_string(),
            actor_name: "Admin User".to_string(),
            assurance: AssuranceLevel::Aal2,
        }
    }

    fn single_factor_ctx() -> SessionContext {
        SessionContext {
            assurance: AssuranceLevel::Aal1,
            ..ctx()
        }
    }

    fn new_device(serial: &str, capacity_kg: f64) -> CreateDevice {
        CreateDevice {
            model: format!("Model {}", serial),
            device_type: DeviceType::Robot,
            capacity_kg,
            battery_autonomy: "90 min".to_string(),
            serial_number: serial.to_string(),
            address: None,
            location_lat: None,
            location_lng: None,
        }
    }

    fn new_request(weight_kg: f64) -> CreateRequest {
        CreateRequest {
            requester_firstname: "Juan".to_string(),
            requester_lastname: "Perez".to_string(),
            contact_email: "juan.perez@example.edu".to_string(),
            origin: CampusLocation::EdificioAdministrativo,
            destination: CampusLocation::Biblioteca,
            weight_kg,
            size_vol: "20x20x20".to_string(),
            request_type: RequestType::SmallPackage,
        }
    }

    fn transition_to(status: RequestStatus) -> UpdateRequestStatus {
        UpdateRequestStatus { status, force: false }
    }

    fn forced(status: RequestStatus) -> UpdateRequestStatus {
        UpdateRequestStatus { status, force: true }
    }

    #[tokio::test]
    async fn create_generates_pending_request_with_verification_code() {
        let f = fixture();
        f.devices.register(&ctx(), &new_device("S1", 3.0)).await.unwrap();

        let request = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.assigned_device_id.is_none());
        let code = request.verification_code.unwrap();
        assert!(code.starts_with("QR-"));
        assert_eq!(code.len(), 12);
    }

    #[tokio::test]
    async fn create_fails_when_no_device_could_ever_carry_the_weight() {
        let f = fixture();
        f.devices.register(&ctx(), &new_device("S1", 3.0)).await.unwrap();

        let err = f.requests.create(&ctx(), &new_request(10.0)).await.unwrap_err();
        assert!(matches!(err, AppError::Capacity(_)));
        assert!(f.requests.list(&RequestQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_counts_busy_and_maintenance_devices_for_capacity() {
        let f = fixture();
        let device = f.devices.register(&ctx(), &new_device("S1", 3.0)).await.unwrap();
        f.devices
            .set_status(&ctx(), device.id, DeviceStatus::Maintenance)
            .await
            .unwrap();

        // capacity feasibility ignores the device's current status
        let request = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn assign_links_one_device_and_marks_it_busy() {
        let f = fixture();
        let d1 = f.devices.register(&ctx(), &new_device("S1", 3.0)).await.unwrap();
        let r1 = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();

        let assigned = f
            .requests
            .transition(&ctx(), r1.id, &transition_to(RequestStatus::Assigned))
            .await
            .unwrap();
        assert_eq!(assigned.status, RequestStatus::Assigned);
        assert_eq!(assigned.assigned_device_id, Some(d1.id));
        assert_eq!(f.devices.get(d1.id).await.unwrap().status, DeviceStatus::Busy);
    }

    #[tokio::test]
    async fn assign_fails_without_an_eligible_free_device() {
        let f = fixture();
        let device = f.devices.register(&ctx(), &new_device("S1", 3.0)).await.unwrap();
        f.devices
            .set_status(&ctx(), device.id, DeviceStatus::Maintenance)
            .await
            .unwrap();
        let r1 = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();

        let err = f
            .requests
            .transition(&ctx(), r1.id, &transition_to(RequestStatus::Assigned))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoAvailableDevice(_)));
        // request and device are unchanged
        assert_eq!(f.requests.get(r1.id).await.unwrap().status, RequestStatus::Pending);
        assert_eq!(
            f.devices.get(device.id).await.unwrap().status,
            DeviceStatus::Maintenance
        );
    }

    #[tokio::test]
    async fn delivered_releases_the_device_and_keeps_linkage_as_history() {
        let f = fixture();
        let d1 = f.devices.register(&ctx(), &new_device("S1", 3.0)).await.unwrap();
        let r1 = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();

        f.requests
            .transition(&ctx(), r1.id, &transition_to(RequestStatus::Assigned))
            .await
            .unwrap();
        let delivered = f
            .requests
            .transition(&ctx(), r1.id, &transition_to(RequestStatus::Delivered))
            .await
            .unwrap();

        assert_eq!(delivered.status, RequestStatus::Delivered);
        assert_eq!(delivered.assigned_device_id, Some(d1.id));
        assert_eq!(
            f.devices.get(d1.id).await.unwrap().status,
            DeviceStatus::Available
        );
    }

    #[tokio::test]
    async fn assignment_is_first_fit_in_registration_order() {
        let f = fixture();
        let d1 = f.devices.register(&ctx(), &new_device("S1", 3.0)).await.unwrap();
        let d2 = f.devices.register(&ctx(), &new_device("S2", 3.0)).await.unwrap();
        let r1 = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();
        let r2 = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();
        let r3 = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();

        let a1 = f
            .requests
            .transition(&ctx(), r1.id, &transition_to(RequestStatus::Assigned))
            .await
            .unwrap();
        assert_eq!(a1.assigned_device_id, Some(d1.id));

        let a2 = f
            .requests
            .transition(&ctx(), r2.id, &transition_to(RequestStatus::Assigned))
            .await
            .unwrap();
        assert_eq!(a2.assigned_device_id, Some(d2.id));

        let err = f
            .requests
            .transition(&ctx(), r3.id, &transition_to(RequestStatus::Assigned))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoAvailableDevice(_)));
    }

    #[tokio::test]
    async fn full_lifecycle_pending_assigned_in_progress_delivered() {
        let f = fixture();
        let d1 = f.devices.register(&ctx(), &new_device("S1", 3.0)).await.unwrap();
        let r1 = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();

        for status in [
            RequestStatus::Assigned,
            RequestStatus::InProgress,
            RequestStatus::Delivered,
        ] {
            let updated = f
                .requests
                .transition(&ctx(), r1.id, &transition_to(status))
                .await
                .unwrap();
            assert_eq!(updated.status, status);
        }
        assert_eq!(
            f.devices.get(d1.id).await.unwrap().status,
            DeviceStatus::Available
        );
    }

    #[tokio::test]
    async fn transition_requires_existing_request() {
        let f = fixture();
        let err = f
            .requests
            .transition(&ctx(), Uuid::new_v4(), &transition_to(RequestStatus::Cancelled))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn off_table_transition_needs_force_and_two_factor() {
        let f = fixture();
        f.devices.register(&ctx(), &new_device("S1", 3.0)).await.unwrap();
        let r1 = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();

        // pending -> delivered is not a lifecycle edge
        let err = f
            .requests
            .transition(&ctx(), r1.id, &transition_to(RequestStatus::Delivered))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // force without a two-factor session is refused
        let err = f
            .requests
            .transition(&single_factor_ctx(), r1.id, &forced(RequestStatus::Delivered))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));

        // force with AAL2 goes through
        let updated = f
            .requests
            .transition(&ctx(), r1.id, &forced(RequestStatus::Delivered))
            .await
            .unwrap();
        assert_eq!(updated.status, RequestStatus::Delivered);
    }

    #[tokio::test]
    async fn forced_cancel_of_an_assigned_request_frees_the_device() {
        let f = fixture();
        let d1 = f.devices.register(&ctx(), &new_device("S1", 3.0)).await.unwrap();
        let r1 = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();
        f.requests
            .transition(&ctx(), r1.id, &transition_to(RequestStatus::Assigned))
            .await
            .unwrap();

        let cancelled = f
            .requests
            .transition(&ctx(), r1.id, &forced(RequestStatus::Cancelled))
            .await
            .unwrap();
        assert_eq!(cancelled.status, RequestStatus::Cancelled);
        assert_eq!(
            f.devices.get(d1.id).await.unwrap().status,
            DeviceStatus::Available
        );
    }

    #[tokio::test]
    async fn every_mutation_leaves_an_audit_trail_newest_first() {
        let f = fixture();
        f.devices.register(&ctx(), &new_device("S1", 3.0)).await.unwrap();
        let r1 = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();
        f.requests
            .transition(&ctx(), r1.id, &transition_to(RequestStatus::Assigned))
            .await
            .unwrap();

        let entries = f.audit.query(&AuditQuery::default()).await.unwrap();
        // device CREATE, request CREATE, device busy UPDATE, request UPDATE
        assert_eq!(entries.len(), 4);
        assert!(entries[0].details.contains("Status changed to assigned"));
        assert!(entries[0].details.contains("Device assigned: S1"));
        assert!(entries[1].details.contains("to busy"));
        assert_eq!(entries[3].action, AuditAction::Create);
        assert_eq!(entries[3].entity, "devices");
    }

    #[tokio::test]
    async fn audit_query_filters_by_action_and_text() {
        let f = fixture();
        f.devices.register(&ctx(), &new_device("S1", 3.0)).await.unwrap();
        let r1 = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();
        f.requests
            .transition(&ctx(), r1.id, &transition_to(RequestStatus::Assigned))
            .await
            .unwrap();

        let creates = f
            .audit
            .query(&AuditQuery {
                action: Some(AuditAction::Create),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(creates.len(), 2);

        let hits = f
            .audit
            .query(&AuditQuery {
                q: Some("device assigned".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_filterable() {
        let f = fixture();
        f.devices.register(&ctx(), &new_device("S1", 20.0)).await.unwrap();
        let r1 = f.requests.create(&ctx(), &new_request(1.0)).await.unwrap();
        let r2 = f.requests.create(&ctx(), &new_request(2.0)).await.unwrap();

        let all = f.requests.list(&RequestQuery::default()).await.unwrap();
        assert_eq!(all[0].id, r2.id);
        assert_eq!(all[1].id, r1.id);

        f.requests
            .transition(&ctx(), r1.id, &transition_to(RequestStatus::Cancelled))
            .await
            .unwrap();
        let pending = f
            .requests
            .list(&RequestQuery {
                status: Some(RequestStatus::Pending),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, r2.id);

        let hits = f
            .requests
            .list(&RequestQuery {
                q: Some("biblioteca".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }
}

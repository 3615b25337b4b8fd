//! Persistence layer
//!
//! A single polymorphic interface over everything the services persist.
//! The backend is picked once at process start ([`crate::config::StoreBackend`]);
//! nothing else in the codebase branches on it.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        audit::{AuditLogEntry, AuditQuery},
        device::{Device, DeviceQuery},
        enums::{DeviceStatus, RequestStatus},
        request::{DeliveryRequest, RequestQuery},
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Capability set required from a persistence backend.
///
/// All list operations return newest-first. `claim_device` is the one
/// compound operation: find-and-mark-busy must be atomic so that two
/// concurrent assignments can never claim the same device.
#[async_trait]
pub trait Store: Send + Sync {
    // --- devices ---

    async fn create_device(&self, device: &Device) -> AppResult<()>;

    async fn get_device(&self, id: Uuid) -> AppResult<Option<Device>>;

    async fn find_device_by_serial(&self, serial_number: &str) -> AppResult<Option<Device>>;

    /// Overwrite the status of a device. Returns `None` for an unknown id.
    async fn update_device_status(
        &self,
        id: Uuid,
        status: DeviceStatus,
    ) -> AppResult<Option<Device>>;

    async fn list_devices(&self, query: &DeviceQuery) -> AppResult<Vec<Device>>;

    /// Whether any registered device, regardless of status, can carry the weight.
    async fn has_device_with_capacity(&self, weight_kg: f64) -> AppResult<bool>;

    /// Atomically claim the first available device with sufficient capacity,
    /// scanning in registration order, and mark it busy. Returns the claimed
    /// device, or `None` when no eligible device is free.
    async fn claim_device(&self, min_capacity_kg: f64) -> AppResult<Option<Device>>;

    // --- requests ---

    async fn create_request(&self, request: &DeliveryRequest) -> AppResult<()>;

    async fn get_request(&self, id: Uuid) -> AppResult<Option<DeliveryRequest>>;

    /// Write the status and, when given, the device linkage of a request.
    /// An existing linkage is never cleared. Returns `None` for an unknown id.
    async fn update_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
        assigned_device_id: Option<Uuid>,
    ) -> AppResult<Option<DeliveryRequest>>;

    async fn list_requests(&self, query: &RequestQuery) -> AppResult<Vec<DeliveryRequest>>;

    // --- audit ---

    async fn append_audit(&self, entry: &AuditLogEntry) -> AppResult<()>;

    async fn list_audit(&self, query: &AuditQuery) -> AppResult<Vec<AuditLogEntry>>;
}

/// Shared handle to the process-wide store
pub type DynStore = Arc<dyn Store>;

//! Device registry service

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        device::{CreateDevice, Device, DeviceQuery},
        enums::{AuditAction, DeviceStatus},
        session::SessionContext,
    },
    store::DynStore,
};

use super::audit::AuditService;

#[derive(Clone)]
pub struct DevicesService {
    store: DynStore,
    audit: AuditService,
}

impl DevicesService {
    pub fn new(store: DynStore, audit: AuditService) -> Self {
        Self { store, audit }
    }

    /// Register a new device. Status is always forced to `available`.
    pub async fn register(&self, ctx: &SessionContext, data: &CreateDevice) -> AppResult<Device> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if data.capacity_kg <= 0.0 {
            return Err(AppError::Validation(
                "Capacity must be greater than zero".to_string(),
            ));
        }

        if self
            .store
            .find_device_by_serial(&data.serial_number)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Serial number {} is already registered",
                data.serial_number
            )));
        }

        let device = Device {
            id: Uuid::new_v4(),
            model: data.model.clone(),
            device_type: data.device_type,
            capacity_kg: data.capacity_kg,
            battery_autonomy: data.battery_autonomy.clone(),
            serial_number: data.serial_number.clone(),
            status: DeviceStatus::Available,
            address: data.address.clone(),
            location_lat: data.location_lat,
            location_lng: data.location_lng,
            created_at: Utc::now(),
        };

        self.store.create_device(&device).await?;

        self.audit
            .record(
                ctx,
                AuditAction::Create,
                "devices",
                format!("Device {} registered ({})", device.model, device.serial_number),
            )
            .await;

        Ok(device)
    }

    /// Overwrite a device's status. The registry status set is flat; the only
    /// guard is that the device exists.
    pub async fn set_status(
        &self,
        ctx: &SessionContext,
        id: Uuid,
        status: DeviceStatus,
    ) -> AppResult<Device> {
        let device = self
            .store
            .update_device_status(id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", id)))?;

        self.audit
            .record(
                ctx,
                AuditAction::Update,
                "devices",
                format!("Updated status of {} to {}", device.serial_number, status),
            )
            .await;

        Ok(device)
    }

    /// Get device by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Device> {
        self.store
            .get_device(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", id)))
    }

    /// List devices, most-recently-registered first
    pub async fn list(&self, query: &DeviceQuery) -> AppResult<Vec<Device>> {
        self.store.list_devices(query).await
    }
}

//! In-memory store
//!
//! Backs development mode and the unit tests. Collections live behind a
//! single `RwLock`, which also makes `claim_device` atomic: the scan and the
//! busy-mark happen under one write guard.

use async_trait::async_trait;
use tokio::sync::RwLock;
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

use super::Store;

#[derive(Default)]
struct Inner {
    // insertion order == registration order; lists reverse it
    devices: Vec<Device>,
    requests: Vec<DeliveryRequest>,
    audit: Vec<AuditLogEntry>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn fuzzy(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_device(&self, device: &Device) -> AppResult<()> {
        self.inner.write().await.devices.push(device.clone());
        Ok(())
    }

    async fn get_device(&self, id: Uuid) -> AppResult<Option<Device>> {
        let inner = self.inner.read().await;
        Ok(inner.devices.iter().find(|d| d.id == id).cloned())
    }

    async fn find_device_by_serial(&self, serial_number: &str) -> AppResult<Option<Device>> {
        let inner = self.inner.read().await;
        Ok(inner
            .devices
            .iter()
            .find(|d| d.serial_number == serial_number)
            .cloned())
    }

    async fn update_device_status(
        &self,
        id: Uuid,
        status: DeviceStatus,
    ) -> AppResult<Option<Device>> {
        let mut inner = self.inner.write().await;
        Ok(inner.devices.iter_mut().find(|d| d.id == id).map(|d| {
            d.status = status;
            d.clone()
        }))
    }

    async fn list_devices(&self, query: &DeviceQuery) -> AppResult<Vec<Device>> {
        let inner = self.inner.read().await;
        Ok(inner
            .devices
            .iter()
            .rev()
            .filter(|d| query.status.map_or(true, |s| d.status == s))
            .filter(|d| {
                query.q.as_deref().map_or(true, |q| {
                    fuzzy(&d.model, q) || fuzzy(&d.serial_number, q)
                })
            })
            .cloned()
            .collect())
    }

    async fn has_device_with_capacity(&self, weight_kg: f64) -> AppResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner.devices.iter().any(|d| d.capacity_kg >= weight_kg))
    }

    async fn claim_device(&self, min_capacity_kg: f64) -> AppResult<Option<Device>> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .devices
            .iter_mut()
            .find(|d| d.status == DeviceStatus::Available && d.capacity_kg >= min_capacity_kg)
            .map(|d| {
                d.status = DeviceStatus::Busy;
                d.clone()
            }))
    }

    async fn create_request(&self, request: &DeliveryRequest) -> AppResult<()> {
        self.inner.write().await.requests.push(request.clone());
        Ok(())
    }

    async fn get_request(&self, id: Uuid) -> AppResult<Option<DeliveryRequest>> {
        let inner = self.inner.read().await;
        Ok(inner.requests.iter().find(|r| r.id == id).cloned())
    }

    async fn update_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
        assigned_device_id: Option<Uuid>,
    ) -> AppResult<Option<DeliveryRequest>> {
        let mut inner = self.inner.write().await;
        Ok(inner.requests.iter_mut().find(|r| r.id == id).map(|r| {
            r.status = status;
            if assigned_device_id.is_some() {
                r.assigned_device_id = assigned_device_id;
            }
            r.clone()
        }))
    }

    async fn list_requests(&self, query: &RequestQuery) -> AppResult<Vec<DeliveryRequest>> {
        let inner = self.inner.read().await;
        Ok(inner
            .requests
            .iter()
            .rev()
            .filter(|r| query.status.map_or(true, |s| r.status == s))
            .filter(|r| {
                query.q.as_deref().map_or(true, |q| {
                    fuzzy(r.origin.as_str(), q) || fuzzy(r.destination.as_str(), q)
                })
            })
            .cloned()
            .collect())
    }

    async fn append_audit(&self, entry: &AuditLogEntry) -> AppResult<()> {
        self.inner.write().await.audit.push(entry.clone());
        Ok(())
    }

    async fn list_audit(&self, query: &AuditQuery) -> AppResult<Vec<AuditLogEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .audit
            .iter()
            .rev()
            .filter(|e| query.action.map_or(true, |a| e.action == a))
            .filter(|e| query.from.map_or(true, |from| e.created_at >= from))
            .filter(|e| query.to.map_or(true, |to| e.created_at <= to))
            .filter(|e| {
                query.q.as_deref().map_or(true, |q| {
                    fuzzy(&e.actor_name, q) || fuzzy(&e.details, q)
                })
            })
            .cloned()
            .collect())
    }
}

//! Postgres store

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
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

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_device(&self, device: &Device) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO devices (
                id, model, device_type, capacity_kg, battery_autonomy,
                serial_number, status, address, location_lat, location_lng, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(device.id)
        .bind(&device.model)
        .bind(device.device_type)
        .bind(device.capacity_kg)
        .bind(&device.battery_autonomy)
        .bind(&device.serial_number)
        .bind(device.status)
        .bind(&device.address)
        .bind(device.location_lat)
        .bind(device.location_lng)
        .bind(device.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_device(&self, id: Uuid) -> AppResult<Option<Device>> {
        let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(device)
    }

    async fn find_device_by_serial(&self, serial_number: &str) -> AppResult<Option<Device>> {
        let device =
            sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE serial_number = $1")
                .bind(serial_number)
                .fetch_optional(&self.pool)
                .await?;
        Ok(device)
    }

    async fn update_device_status(
        &self,
        id: Uuid,
        status: DeviceStatus,
    ) -> AppResult<Option<Device>> {
        let device = sqlx::query_as::<_, Device>(
            "UPDATE devices SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(device)
    }

    async fn list_devices(&self, query: &DeviceQuery) -> AppResult<Vec<Device>> {
        let devices = sqlx::query_as::<_, Device>(
            r#"
            SELECT * FROM devices
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL
                   OR model ILIKE '%' || $2 || '%'
                   OR serial_number ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(query.status.map(|s| s.as_str()))
        .bind(query.q.as_deref())
        .fetch_all(&self.pool)
        .await?;
        Ok(devices)
    }

    async fn has_device_with_capacity(&self, weight_kg: f64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM devices WHERE capacity_kg >= $1)",
        )
        .bind(weight_kg)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn claim_device(&self, min_capacity_kg: f64) -> AppResult<Option<Device>> {
        // Single conditional update: scan and busy-mark cannot interleave
        // with a concurrent claim.
        let device = sqlx::query_as::<_, Device>(
            r#"
            UPDATE devices SET status = 'busy'
            WHERE id = (
                SELECT id FROM devices
                WHERE status = 'available' AND capacity_kg >= $1
                ORDER BY created_at
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#,
        )
        .bind(min_capacity_kg)
        .fetch_optional(&self.pool)
        .await?;
        Ok(device)
    }

    async fn create_request(&self, request: &DeliveryRequest) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO requests (
                id, requester_firstname, requester_lastname, contact_email,
                origin, destination, weight_kg, size_vol, request_type,
                status, assigned_device_id, verification_code, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(request.id)
        .bind(&request.requester_firstname)
        .bind(&request.requester_lastname)
        .bind(&request.contact_email)
        .bind(request.origin)
        .bind(request.destination)
        .bind(request.weight_kg)
        .bind(&request.size_vol)
        .bind(request.request_type)
        .bind(request.status)
        .bind(request.assigned_device_id)
        .bind(&request.verification_code)
        .bind(request.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_request(&self, id: Uuid) -> AppResult<Option<DeliveryRequest>> {
        let request =
            sqlx::query_as::<_, DeliveryRequest>("SELECT * FROM requests WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(request)
    }

    async fn update_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
        assigned_device_id: Option<Uuid>,
    ) -> AppResult<Option<DeliveryRequest>> {
        let request = sqlx::query_as::<_, DeliveryRequest>(
            r#"
            UPDATE requests
            SET status = $2,
                assigned_device_id = COALESCE($3, assigned_device_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(assigned_device_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }

    async fn list_requests(&self, query: &RequestQuery) -> AppResult<Vec<DeliveryRequest>> {
        let requests = sqlx::query_as::<_, DeliveryRequest>(
            r#"
            SELECT * FROM requests
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL
                   OR origin ILIKE '%' || $2 || '%'
                   OR destination ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(query.status.map(|s| s.as_str()))
        .bind(query.q.as_deref())
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    async fn append_audit(&self, entry: &AuditLogEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                id, action, entity, actor_id, actor_name, details, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id)
        .bind(entry.action)
        .bind(&entry.entity)
        .bind(&entry.actor_id)
        .bind(&entry.actor_name)
        .bind(&entry.details)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_audit(&self, query: &AuditQuery) -> AppResult<Vec<AuditLogEntry>> {
        let entries = sqlx::query_as::<_, AuditLogEntry>(
            r#"
            SELECT * FROM audit_logs
            WHERE ($1::text IS NULL OR action = $1)
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
              AND ($4::text IS NULL
                   OR actor_name ILIKE '%' || $4 || '%'
                   OR details ILIKE '%' || $4 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(query.action.map(|a| a.as_str()))
        .bind(query.from)
        .bind(query.to)
        .bind(query.q.as_deref())
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}

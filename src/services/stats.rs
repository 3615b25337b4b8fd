//! Statistics service

use crate::{
    api::stats::{DeviceStats, RequestStats, StatsResponse},
    error::AppResult,
    models::{
        device::DeviceQuery,
        enums::{DeviceStatus, RequestStatus},
        request::RequestQuery,
    },
    store::DynStore,
};

#[derive(Clone)]
pub struct StatsService {
    store: DynStore,
}

impl StatsService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// Dashboard counters over the current fleet and request book
    pub async fn overview(&self) -> AppResult<StatsResponse> {
        let devices = self.store.list_devices(&DeviceQuery::default()).await?;
        let requests = self.store.list_requests(&RequestQuery::default()).await?;

        let device_count = |status: DeviceStatus| -> i64 {
            devices.iter().filter(|d| d.status == status).count() as i64
        };
        let request_count = |status: RequestStatus| -> i64 {
            requests.iter().filter(|r| r.status == status).count() as i64
        };

        Ok(StatsResponse {
            devices: DeviceStats {
                total: devices.len() as i64,
                available: device_count(DeviceStatus::Available),
                busy: device_count(DeviceStatus::Busy),
                maintenance: device_count(DeviceStatus::Maintenance),
            },
            requests: RequestStats {
                active: requests
                    .iter()
                    .filter(|r| {
                        matches!(
                            r.status,
                            RequestStatus::Pending
                                | RequestStatus::Assigned
                                | RequestStatus::InProgress
                        )
                    })
                    .count() as i64,
                pending: request_count(RequestStatus::Pending),
                delivered: request_count(RequestStatus::Delivered),
                cancelled: request_count(RequestStatus::Cancelled),
            },
        })
    }
}

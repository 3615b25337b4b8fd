//! Business logic services

pub mod audit;
pub mod devices;
pub mod email;
pub mod requests;
pub mod stats;

use crate::{config::EmailConfig, store::DynStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub devices: devices::DevicesService,
    pub requests: requests::RequestsService,
    pub audit: audit::AuditService,
    pub stats: stats::StatsService,
    pub email: email::EmailService,
}

impl Services {
    /// Create all services over the selected store
    pub fn new(store: DynStore, email_config: EmailConfig) -> Self {
        let email = email::EmailService::new(email_config);
        let audit = audit::AuditService::new(store.clone());
        Self {
            devices: devices::DevicesService::new(store.clone(), audit.clone()),
            requests: requests::RequestsService::new(store.clone(), audit.clone(), email.clone()),
            stats: stats::StatsService::new(store),
            audit,
            email,
        }
    }
}

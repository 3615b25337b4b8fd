//! CampusFleet Delivery Administration Server
//!
//! REST JSON API backing the campus delivery console: device registry for
//! drones and ground robots, delivery request lifecycle with capacity-based
//! auto-assignment, and an append-only audit trail.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

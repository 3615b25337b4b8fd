//! Data models for CampusFleet

pub mod audit;
pub mod device;
pub mod enums;
pub mod request;
pub mod session;

// Re-export commonly used types
pub use audit::AuditLogEntry;
pub use device::Device;
pub use enums::{
    AuditAction, CampusLocation, DeviceStatus, DeviceType, RequestStatus, RequestType,
};
pub use request::DeliveryRequest;
pub use session::{AssuranceLevel, SessionContext, UserClaims};

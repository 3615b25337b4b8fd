//! Shared domain enums
//!
//! All statuses are stored as text in the database and on the wire, so each
//! enum carries its own `as_str`/`FromStr`/SQLx plumbing.

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// DeviceType
// ---------------------------------------------------------------------------

/// Kind of delivery device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Drone,
    Robot,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Drone => "drone",
            DeviceType::Robot => "robot",
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drone" => Ok(DeviceType::Drone),
            "robot" => Ok(DeviceType::Robot),
            _ => Err(format!("Invalid device type: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for DeviceType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for DeviceType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for DeviceType {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

// ---------------------------------------------------------------------------
// DeviceStatus
// ---------------------------------------------------------------------------

/// Device availability status
///
/// A flat set: any status may be written over any other, there is no
/// transition table at the registry level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Available,
    Busy,
    Maintenance,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Available => "available",
            DeviceStatus::Busy => "busy",
            DeviceStatus::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeviceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(DeviceStatus::Available),
            "busy" => Ok(DeviceStatus::Busy),
            "maintenance" => Ok(DeviceStatus::Maintenance),
            _ => Err(format!("Invalid device status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for DeviceStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for DeviceStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for DeviceStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Delivery request lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Assigned,
    InProgress,
    Delivered,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Assigned => "assigned",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Delivered => "delivered",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// Whether `target` is a regular forward edge of the lifecycle.
    ///
    /// Anything else needs the explicit override capability.
    pub fn can_transition_to(&self, target: RequestStatus) -> bool {
        matches!(
            (*self, target),
            (RequestStatus::Pending, RequestStatus::Assigned)
                | (RequestStatus::Pending, RequestStatus::Cancelled)
                | (RequestStatus::Assigned, RequestStatus::InProgress)
                | (RequestStatus::Assigned, RequestStatus::Delivered)
                | (RequestStatus::InProgress, RequestStatus::Delivered)
        )
    }

    /// Statuses during which the request exclusively holds its device.
    pub fn holds_device(&self) -> bool {
        matches!(self, RequestStatus::Assigned | RequestStatus::InProgress)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "assigned" => Ok(RequestStatus::Assigned),
            "in_progress" => Ok(RequestStatus::InProgress),
            "delivered" => Ok(RequestStatus::Delivered),
            "cancelled" => Ok(RequestStatus::Cancelled),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for RequestStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for RequestStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for RequestStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

// ---------------------------------------------------------------------------
// RequestType
// ---------------------------------------------------------------------------

/// What the request carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Document,
    SmallPackage,
    /// Aerial video recording run (drone only, no payload pickup)
    Recording,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Document => "document",
            RequestType::SmallPackage => "small_package",
            RequestType::Recording => "recording",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "document" => Ok(RequestType::Document),
            "small_package" => Ok(RequestType::SmallPackage),
            "recording" => Ok(RequestType::Recording),
            _ => Err(format!("Invalid request type: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for RequestType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for RequestType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for RequestType {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

// ---------------------------------------------------------------------------
// CampusLocation
// ---------------------------------------------------------------------------

/// Named campus pickup/dropoff points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CampusLocation {
    #[serde(rename = "Cedro rosado")]
    CedroRosado,
    Almendros,
    Palmas,
    Lagos,
    Saman,
    #[serde(rename = "Educacion continua")]
    EducacionContinua,
    Guduales,
    Guayacanes,
    Facultad,
    #[serde(rename = "Edificio administrativo")]
    EdificioAdministrativo,
    #[serde(rename = "Edificio financiero")]
    EdificioFinanciero,
    Biblioteca,
    Capilla,
}

impl CampusLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampusLocation::CedroRosado => "Cedro rosado",
            CampusLocation::Almendros => "Almendros",
            CampusLocation::Palmas => "Palmas",
            CampusLocation::Lagos => "Lagos",
            CampusLocation::Saman => "Saman",
            CampusLocation::EducacionContinua => "Educacion continua",
            CampusLocation::Guduales => "Guduales",
            CampusLocation::Guayacanes => "Guayacanes",
            CampusLocation::Facultad => "Facultad",
            CampusLocation::EdificioAdministrativo => "Edificio administrativo",
            CampusLocation::EdificioFinanciero => "Edificio financiero",
            CampusLocation::Biblioteca => "Biblioteca",
            CampusLocation::Capilla => "Capilla",
        }
    }

    /// Every known location, in display order.
    pub fn all() -> &'static [CampusLocation] {
        &[
            CampusLocation::CedroRosado,
            CampusLocation::Almendros,
            CampusLocation::Palmas,
            CampusLocation::Lagos,
            CampusLocation::Saman,
            CampusLocation::EducacionContinua,
            CampusLocation::Guduales,
            CampusLocation::Guayacanes,
            CampusLocation::Facultad,
            CampusLocation::EdificioAdministrativo,
            CampusLocation::EdificioFinanciero,
            CampusLocation::Biblioteca,
            CampusLocation::Capilla,
        ]
    }
}

impl std::fmt::Display for CampusLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CampusLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CampusLocation::all()
            .iter()
            .find(|loc| loc.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown campus location: {}", s))
    }
}

impl sqlx::Type<Postgres> for CampusLocation {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for CampusLocation {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for CampusLocation {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Audit trail action keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Login,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Login => "LOGIN",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREATE" => Ok(AuditAction::Create),
            "UPDATE" => Ok(AuditAction::Update),
            "LOGIN" => Ok(AuditAction::Login),
            _ => Err(format!("Invalid audit action: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for AuditAction {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for AuditAction {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for AuditAction {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_status_forward_edges() {
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Assigned));
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Cancelled));
        assert!(RequestStatus::Assigned.can_transition_to(RequestStatus::InProgress));
        assert!(RequestStatus::Assigned.can_transition_to(RequestStatus::Delivered));
        assert!(RequestStatus::InProgress.can_transition_to(RequestStatus::Delivered));
    }

    #[test]
    fn request_status_rejects_backward_and_terminal_edges() {
        assert!(!RequestStatus::Assigned.can_transition_to(RequestStatus::Pending));
        assert!(!RequestStatus::Delivered.can_transition_to(RequestStatus::Pending));
        assert!(!RequestStatus::Cancelled.can_transition_to(RequestStatus::Assigned));
        assert!(!RequestStatus::InProgress.can_transition_to(RequestStatus::Cancelled));
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Pending));
    }

    #[test]
    fn campus_location_round_trips_display_names() {
        for loc in CampusLocation::all() {
            assert_eq!(loc.as_str().parse::<CampusLocation>().unwrap(), *loc);
        }
        assert!("Parqueadero".parse::<CampusLocation>().is_err());
    }
}

use crate::ids::BuildingId;
use crate::ids::GuestVisitId;
use crate::ids::ParkingSpotId;
use crate::ids::RequestId;
use crate::ids::ResidentId;
use crate::ids::SiteId;
use crate::ids::UnitId;
use crate::ids::VehicleId;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use strum_macros::AsRefStr;
use strum_macros::Display;
use strum_macros::EnumIter;
use strum_macros::EnumString;

/// Explicit ordering for status vocabularies. Sorting by status compares
/// ranks, never the lexical spelling.
pub trait Ranked {
    fn rank(&self) -> u8;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: SiteId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id: BuildingId,
    pub site_id: SiteId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: UnitId,
    pub building_id: BuildingId,
    pub number: String,
    pub floor: i32,
}

/// Derived from the resident count of a unit; never stored.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UnitStatus {
    Occupied,
    Empty,
}

impl UnitStatus {
    pub fn from_resident_count(count: usize) -> Self {
        if count > 0 {
            UnitStatus::Occupied
        } else {
            UnitStatus::Empty
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResidentType {
    Owner,
    Tenant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: ResidentId,
    pub unit_id: UnitId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResidentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A resident-owned vehicle. `parking_spot` is a cached display name and is
/// refreshed from `parking_spot_id` whenever the graph changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: VehicleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_id: Option<ResidentId>,
    pub plate: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_spot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_spot_id: Option<ParkingSpotId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpot {
    pub id: ParkingSpotId,
    pub building_id: BuildingId,
    pub floor: i32,
    pub name: String,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GuestVisitStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl GuestVisitStatus {
    /// Pending and active visits hold a vehicle on site; finished ones do not.
    pub fn is_present(self) -> bool {
        matches!(self, GuestVisitStatus::Pending | GuestVisitStatus::Active)
    }
}

impl Ranked for GuestVisitStatus {
    fn rank(&self) -> u8 {
        match self {
            GuestVisitStatus::Pending => 0,
            GuestVisitStatus::Active => 1,
            GuestVisitStatus::Completed => 2,
            GuestVisitStatus::Cancelled => 3,
        }
    }
}

/// Guest registration. Guests are linked to spots by display name only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestVisit {
    pub id: GuestVisitId,
    pub plate: String,
    #[serde(default)]
    pub model: String,
    pub guest_name: String,
    pub status: GuestVisitStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_spot: Option<String>,
    /// Host unit, when the visit was registered against one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<UnitId>,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RequestKind {
    Maintenance,
    Complaint,
    Suggestion,
    Other,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RequestStatus {
    Pending,
    #[serde(alias = "in-progress")]
    #[strum(to_string = "in_progress", serialize = "in-progress")]
    InProgress,
    Resolved,
    Rejected,
}

impl Ranked for RequestStatus {
    fn rank(&self) -> u8 {
        match self {
            RequestStatus::Pending => 0,
            RequestStatus::InProgress => 1,
            RequestStatus::Resolved => 2,
            RequestStatus::Rejected => 3,
        }
    }
}

impl Ranked for ResidentType {
    fn rank(&self) -> u8 {
        match self {
            ResidentType::Owner => 0,
            ResidentType::Tenant => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityRequest {
    pub id: RequestId,
    pub building_id: BuildingId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<UnitId>,
    pub title: String,
    pub kind: RequestKind,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn request_status_accepts_both_spellings() {
        let dashed: RequestStatus = serde_json::from_str("\"in-progress\"").unwrap();
        let snake: RequestStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(dashed, RequestStatus::InProgress);
        assert_eq!(snake, RequestStatus::InProgress);
        assert_eq!(
            RequestStatus::from_str("In-Progress").unwrap(),
            RequestStatus::InProgress
        );
        assert_eq!(RequestStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn request_status_rank_follows_workflow_not_spelling() {
        let ranks: Vec<u8> = RequestStatus::iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
        // Lexically "rejected" < "resolved"; by rank it is the other way round.
        assert!(RequestStatus::Resolved.rank() < RequestStatus::Rejected.rank());
    }

    #[test]
    fn only_pending_and_active_guests_are_present() {
        let present: Vec<GuestVisitStatus> =
            GuestVisitStatus::iter().filter(|s| s.is_present()).collect();
        assert_eq!(
            present,
            vec![GuestVisitStatus::Pending, GuestVisitStatus::Active]
        );
    }

    #[test]
    fn unit_status_is_derived_from_residents() {
        assert_eq!(UnitStatus::from_resident_count(0), UnitStatus::Empty);
        assert_eq!(UnitStatus::from_resident_count(2), UnitStatus::Occupied);
    }

    #[test]
    fn resident_type_round_trips_under_type_key() {
        let json = r#"{"id":"r1","unitId":"u1","name":"Ana","type":"tenant"}"#;
        let resident: Resident = serde_json::from_str(json).unwrap();
        assert_eq!(resident.kind, ResidentType::Tenant);
        assert_eq!(resident.phone, None);
        assert_eq!(serde_json::to_string(&resident).unwrap(), json);
    }
}

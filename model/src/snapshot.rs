use crate::entity::CommunityRequest;
use crate::entity::GuestVisit;
use crate::entity::ParkingSpot;
use crate::entity::ResidentType;
use crate::entity::Site;
use crate::entity::Vehicle;
use crate::ids::BuildingId;
use crate::ids::ResidentId;
use crate::ids::SiteId;
use crate::ids::UnitId;
use serde::Deserialize;
use serde::Serialize;

/// Nested wire form delivered by the data-fetch collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub buildings: Vec<BuildingRecord>,
    #[serde(default)]
    pub guest_visits: Vec<GuestVisit>,
    #[serde(default)]
    pub requests: Vec<CommunityRequest>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingRecord {
    pub id: BuildingId,
    pub site_id: SiteId,
    pub name: String,
    #[serde(default)]
    pub units: Vec<UnitRecord>,
    #[serde(default)]
    pub parking_spots: Vec<ParkingSpot>,
}

/// `building_id` may be omitted; the enclosing building is authoritative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRecord {
    pub id: UnitId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_id: Option<BuildingId>,
    pub number: String,
    pub floor: i32,
    #[serde(default)]
    pub residents: Vec<ResidentRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentRecord {
    pub id: ResidentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<UnitId>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResidentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

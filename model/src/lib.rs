//! Entity model for the estate console.
//!
//! Records arrive as a nested [`Snapshot`] (site, building, unit, resident,
//! vehicle) and are flattened into an [`EntityGraph`]: one id-keyed map per
//! entity kind, with relations expressed as ids. Leaf updates are a single map
//! entry replacement and parking spot references are normalized to
//! [`ParkingSpotId`].

mod entity;
mod error;
mod graph;
mod ids;
mod snapshot;

pub use entity::Building;
pub use entity::CommunityRequest;
pub use entity::GuestVisit;
pub use entity::GuestVisitStatus;
pub use entity::ParkingSpot;
pub use entity::Ranked;
pub use entity::RequestKind;
pub use entity::RequestStatus;
pub use entity::Resident;
pub use entity::ResidentType;
pub use entity::Site;
pub use entity::Unit;
pub use entity::UnitStatus;
pub use entity::Vehicle;
pub use error::ModelError;
pub use error::Result;
pub use graph::EntityGraph;
pub use ids::BuildingId;
pub use ids::GuestVisitId;
pub use ids::ParkingSpotId;
pub use ids::RequestId;
pub use ids::ResidentId;
pub use ids::SiteId;
pub use ids::UnitId;
pub use ids::VehicleId;
pub use snapshot::BuildingRecord;
pub use snapshot::ResidentRecord;
pub use snapshot::Snapshot;
pub use snapshot::UnitRecord;

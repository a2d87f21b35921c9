use crate::ids::BuildingId;
use crate::ids::GuestVisitId;
use crate::ids::ParkingSpotId;
use crate::ids::ResidentId;
use crate::ids::VehicleId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown building: {0}")]
    UnknownBuilding(BuildingId),

    #[error("Unknown resident: {0}")]
    UnknownResident(ResidentId),

    #[error("Unknown vehicle: {0}")]
    UnknownVehicle(VehicleId),

    #[error("Unknown parking spot: {0}")]
    UnknownSpot(ParkingSpotId),

    #[error("Unknown guest visit: {0}")]
    UnknownGuestVisit(GuestVisitId),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

use crate::fetch::FetchError;
use estate_model::BuildingId;
use estate_model::GuestVisitStatus;
use estate_model::ModelError;
use estate_model::ParkingSpotId;
use estate_model::ResidentId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parking error: {0}")]
    Parking(#[from] ParkingError),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Why a parking mutation was refused. State is left untouched in every case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParkingError {
    #[error("unknown parking spot: {0}")]
    UnknownSpot(ParkingSpotId),

    #[error("unknown vehicle: {0}")]
    UnknownVehicle(String),

    #[error("unknown resident: {0}")]
    UnknownResident(ResidentId),

    #[error("unknown building: {0}")]
    UnknownBuilding(BuildingId),

    #[error("spot {spot} is already taken by {plate}")]
    SpotTaken { spot: String, plate: String },

    #[error("spot {spot} is not in the vehicle's building")]
    WrongBuilding { spot: String },

    #[error("guest {plate} is {status} and cannot hold a spot")]
    GuestNotPresent {
        plate: String,
        status: GuestVisitStatus,
    },

    #[error("spot name {spot} is used in several buildings; guest has no host unit")]
    AmbiguousSpotName { spot: String },

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("entity graph rejected the change: {0}")]
    Model(#[from] ModelError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("spot name is required")]
    EmptySpotName,

    #[error("spot name {0} is already used in this building")]
    DuplicateSpotName(String),

    #[error("plate is required")]
    EmptyPlate,
}

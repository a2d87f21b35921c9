use crate::filter::Filterable;
use crate::filter::SortKey;
use crate::parking::UnifiedVehicle;
use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumString;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VehicleDimension {
    /// `resident` or `guest`.
    Holder,
    /// `assigned` or `unassigned`.
    Parking,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VehicleSort {
    Plate,
    Holder,
    Unit,
}

impl Filterable for UnifiedVehicle<'_> {
    type Dimension = VehicleDimension;
    type SortField = VehicleSort;

    fn matches_filter(&self, dimension: VehicleDimension, value: &str) -> bool {
        let value = value.to_ascii_lowercase();
        match (dimension, value.as_str()) {
            (VehicleDimension::Holder, "resident") => !self.is_guest,
            (VehicleDimension::Holder, "guest") => self.is_guest,
            (VehicleDimension::Parking, "assigned") => self.parking_spot.is_some(),
            (VehicleDimension::Parking, "unassigned") => self.parking_spot.is_none(),
            _ => false,
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.matches(needle)
    }

    fn sort_key(&self, field: VehicleSort) -> SortKey<'_> {
        match field {
            VehicleSort::Plate => SortKey::Text(self.plate),
            VehicleSort::Holder => SortKey::Text(self.holder_name),
            VehicleSort::Unit => SortKey::Text(self.unit_number.unwrap_or_default()),
        }
    }
}

use super::parse_floor;
use crate::filter::Filterable;
use crate::filter::SortKey;
use crate::filter::any_field_contains;
use estate_model::BuildingId;
use estate_model::EntityGraph;
use estate_model::Ranked;
use estate_model::Resident;
use estate_model::Unit;
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
pub enum ResidentDimension {
    /// `owner` or `tenant`.
    Type,
    /// `with` or `without` vehicles.
    Vehicles,
    Floor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResidentSort {
    Name,
    Unit,
    Floor,
    Type,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentRow<'g> {
    pub resident: &'g Resident,
    pub unit: &'g Unit,
    pub vehicle_count: usize,
}

/// Residents of `buildings`, ordered building → unit → resident.
pub fn resident_rows<'g>(graph: &'g EntityGraph, buildings: &[BuildingId]) -> Vec<ResidentRow<'g>> {
    buildings
        .iter()
        .flat_map(|building| graph.units_of(building))
        .flat_map(|unit| {
            graph.residents_of(&unit.id).map(move |resident| ResidentRow {
                resident,
                unit,
                vehicle_count: graph.vehicle_count(&resident.id),
            })
        })
        .collect()
}

impl Filterable for ResidentRow<'_> {
    type Dimension = ResidentDimension;
    type SortField = ResidentSort;

    fn matches_filter(&self, dimension: ResidentDimension, value: &str) -> bool {
        match dimension {
            ResidentDimension::Type => self.resident.kind.as_ref().eq_ignore_ascii_case(value),
            ResidentDimension::Vehicles => match value.to_ascii_lowercase().as_str() {
                "with" => self.vehicle_count > 0,
                "without" => self.vehicle_count == 0,
                _ => false,
            },
            ResidentDimension::Floor => parse_floor(value) == Some(self.unit.floor),
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        let resident = self.resident;
        any_field_contains(
            needle,
            [resident.name.as_str(), self.unit.number.as_str()]
                .into_iter()
                .chain(resident.phone.as_deref())
                .chain(resident.email.as_deref()),
        )
    }

    fn sort_key(&self, field: ResidentSort) -> SortKey<'_> {
        match field {
            ResidentSort::Name => SortKey::Text(&self.resident.name),
            ResidentSort::Unit => SortKey::Text(&self.unit.number),
            ResidentSort::Floor => SortKey::Number(i64::from(self.unit.floor)),
            ResidentSort::Type => SortKey::Rank(self.resident.kind.rank()),
        }
    }
}

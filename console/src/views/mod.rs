//! Row types for the console tabs and their filter/sort vocabularies.

mod requests;
mod residents;
mod units;
mod vehicles;

pub use requests::RequestDimension;
pub use requests::RequestRow;
pub use requests::RequestSort;
pub use requests::request_rows;
pub use residents::ResidentDimension;
pub use residents::ResidentRow;
pub use residents::ResidentSort;
pub use residents::resident_rows;
pub use units::UnitDimension;
pub use units::UnitRow;
pub use units::UnitSort;
pub use units::unit_rows;
pub use vehicles::VehicleDimension;
pub use vehicles::VehicleSort;

use estate_model::BuildingId;
use estate_model::EntityGraph;
use estate_model::SiteId;
use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumIter;
use strum_macros::EnumString;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConsoleTab {
    #[default]
    Residents,
    Units,
    Vehicles,
    Requests,
}

/// Buildings a view covers: the active building, every building of the
/// active site when no building is selected, nothing without a site.
pub fn scope_buildings(
    graph: &EntityGraph,
    site: Option<&SiteId>,
    building: Option<&BuildingId>,
) -> Vec<BuildingId> {
    let Some(site) = site else {
        return Vec::new();
    };
    match building {
        Some(building) => graph
            .building(building)
            .filter(|found| &found.site_id == site)
            .map(|found| vec![found.id.clone()])
            .unwrap_or_default(),
        None => graph
            .buildings_of_site(site)
            .map(|found| found.id.clone())
            .collect(),
    }
}

/// Floor filter values are plain integers; anything else matches nothing.
pub(crate) fn parse_floor(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_graph;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn scope_follows_selection() {
        let graph = fixture_graph();
        let s1 = SiteId::from("s1");
        let b2 = BuildingId::from("b2");
        assert_eq!(scope_buildings(&graph, None, Some(&b2)), Vec::<BuildingId>::new());
        assert_eq!(scope_buildings(&graph, Some(&s1), Some(&b2)), vec![b2.clone()]);
        assert_eq!(
            scope_buildings(&graph, Some(&s1), None),
            vec![BuildingId::from("b1"), b2]
        );
        assert!(scope_buildings(&graph, Some(&SiteId::from("s2")), None).is_empty());
        assert!(scope_buildings(&graph, Some(&s1), Some(&BuildingId::from("gone"))).is_empty());
    }

    #[test]
    fn tabs_parse_from_cli_names() {
        assert_eq!(ConsoleTab::from_str("Vehicles").unwrap(), ConsoleTab::Vehicles);
        assert_eq!(ConsoleTab::Requests.to_string(), "requests");
    }
}

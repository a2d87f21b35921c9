use super::parse_floor;
use crate::filter::Filterable;
use crate::filter::SortKey;
use crate::filter::any_field_contains;
use estate_model::BuildingId;
use estate_model::EntityGraph;
use estate_model::Unit;
use estate_model::UnitStatus;
use serde::Deserialize;
use serde::Serialize;
use std::str::FromStr;
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
pub enum UnitDimension {
    /// `occupied` or `empty`.
    Occupancy,
    Floor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UnitSort {
    Number,
    Floor,
    Residents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRow<'g> {
    pub unit: &'g Unit,
    pub status: UnitStatus,
    pub resident_count: usize,
}

pub fn unit_rows<'g>(graph: &'g EntityGraph, buildings: &[BuildingId]) -> Vec<UnitRow<'g>> {
    buildings
        .iter()
        .flat_map(|building| graph.units_of(building))
        .map(|unit| {
            let resident_count = graph.resident_count(&unit.id);
            UnitRow {
                unit,
                status: UnitStatus::from_resident_count(resident_count),
                resident_count,
            }
        })
        .collect()
}

impl Filterable for UnitRow<'_> {
    type Dimension = UnitDimension;
    type SortField = UnitSort;

    fn matches_filter(&self, dimension: UnitDimension, value: &str) -> bool {
        match dimension {
            UnitDimension::Occupancy => {
                UnitStatus::from_str(value).is_ok_and(|status| status == self.status)
            }
            UnitDimension::Floor => parse_floor(value) == Some(self.unit.floor),
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        any_field_contains(needle, [self.unit.number.as_str()])
    }

    fn sort_key(&self, field: UnitSort) -> SortKey<'_> {
        match field {
            UnitSort::Number => SortKey::Text(&self.unit.number),
            UnitSort::Floor => SortKey::Number(i64::from(self.unit.floor)),
            UnitSort::Residents => {
                SortKey::Number(i64::try_from(self.resident_count).unwrap_or(i64::MAX))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterPipeline;
    use crate::filter::FilterValue;
    use crate::test_support::fixture_graph;
    use pretty_assertions::assert_eq;

    fn numbers(rows: &[UnitRow<'_>]) -> Vec<String> {
        rows.iter().map(|row| row.unit.number.clone()).collect()
    }

    #[test]
    fn occupancy_filter_uses_derived_status() {
        let graph = fixture_graph();
        let mut pipeline = FilterPipeline::new(10, 3);
        pipeline.set_filter(UnitDimension::Occupancy, FilterValue::parse("Empty"));
        let rows = unit_rows(&graph, &[BuildingId::from("b1")]);
        assert_eq!(numbers(pipeline.derive(rows).filtered()), vec!["201"]);

        pipeline.set_filter(UnitDimension::Occupancy, FilterValue::parse("vacant"));
        let rows = unit_rows(&graph, &[BuildingId::from("b1")]);
        assert!(pipeline.derive(rows).filtered().is_empty());
    }

    #[test]
    fn floor_filter_with_descending_number_sort() {
        let graph = fixture_graph();
        let mut pipeline = FilterPipeline::new(10, 3);
        pipeline.set_filter(UnitDimension::Floor, FilterValue::parse("1"));
        pipeline.toggle_sort(UnitSort::Number);
        pipeline.toggle_sort(UnitSort::Number);
        let rows = unit_rows(&graph, &[BuildingId::from("b1")]);
        assert_eq!(numbers(pipeline.derive(rows).filtered()), vec!["102", "101"]);
    }
}

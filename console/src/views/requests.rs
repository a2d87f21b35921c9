use crate::filter::Filterable;
use crate::filter::SortKey;
use crate::filter::any_field_contains;
use estate_model::BuildingId;
use estate_model::CommunityRequest;
use estate_model::EntityGraph;
use estate_model::Ranked;
use estate_model::RequestKind;
use estate_model::RequestStatus;
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
pub enum RequestDimension {
    Status,
    Kind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RequestSort {
    Created,
    Status,
    Title,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRow<'g> {
    pub request: &'g CommunityRequest,
    pub unit_number: Option<&'g str>,
}

pub fn request_rows<'g>(graph: &'g EntityGraph, buildings: &[BuildingId]) -> Vec<RequestRow<'g>> {
    buildings
        .iter()
        .flat_map(|building| graph.requests_of(building))
        .map(|request| RequestRow {
            request,
            unit_number: request
                .unit_id
                .as_ref()
                .and_then(|id| graph.unit(id))
                .map(|unit| unit.number.as_str()),
        })
        .collect()
}

impl Filterable for RequestRow<'_> {
    type Dimension = RequestDimension;
    type SortField = RequestSort;

    fn matches_filter(&self, dimension: RequestDimension, value: &str) -> bool {
        match dimension {
            RequestDimension::Status => {
                RequestStatus::from_str(value).is_ok_and(|status| status == self.request.status)
            }
            RequestDimension::Kind => {
                RequestKind::from_str(value).is_ok_and(|kind| kind == self.request.kind)
            }
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        any_field_contains(
            needle,
            std::iter::once(self.request.title.as_str()).chain(self.unit_number),
        )
    }

    fn sort_key(&self, field: RequestSort) -> SortKey<'_> {
        match field {
            RequestSort::Created => SortKey::Timestamp(self.request.created_at),
            RequestSort::Status => SortKey::Rank(self.request.status.rank()),
            RequestSort::Title => SortKey::Text(&self.request.title),
        }
    }
}

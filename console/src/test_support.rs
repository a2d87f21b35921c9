use estate_model::EntityGraph;
use estate_model::Snapshot;

pub(crate) const FIXTURE: &str = include_str!("../tests/fixtures/estate.json");

pub(crate) fn fixture_snapshot() -> Snapshot {
    serde_json::from_str(FIXTURE).expect("fixture snapshot")
}

pub(crate) fn fixture_graph() -> EntityGraph {
    EntityGraph::from_snapshot(fixture_snapshot())
}

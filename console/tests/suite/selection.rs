use super::harness;
use super::snapshot;
use estate_console::BuildingSelectionMode;
use estate_console::UnitStats;
use estate_model::BuildingId;
use estate_model::SiteId;
use pretty_assertions::assert_eq;

fn building(id: &str) -> BuildingId {
    BuildingId::from(id)
}

#[test]
fn first_load_picks_first_site_and_building() {
    let harness = harness();
    let console = &harness.console;
    assert_eq!(console.active_site_id(), Some(&SiteId::from("s1")));
    assert_eq!(console.active_building_id(), Some(&building("b1")));
    assert_eq!(console.selection_mode(), BuildingSelectionMode::Auto);
}

#[test]
fn site_without_buildings_has_no_building_and_zero_stats() {
    let mut harness = harness();
    let console = &mut harness.console;
    console.set_active_site(Some(SiteId::from("s2")));

    assert_eq!(console.active_building_id(), None);
    assert_eq!(console.scope(), Vec::<BuildingId>::new());
    assert_eq!(
        console.unit_stats(),
        UnitStats {
            total: 0,
            occupied: 0,
            empty: 0
        }
    );
    let parking = console.parking_stats();
    assert_eq!(parking.total_spots, 0);
    assert_eq!(parking.occupancy_rate, 0);
}

#[test]
fn user_null_survives_background_refetch() {
    let mut harness = harness();
    let console = &mut harness.console;
    console.set_active_building(None);
    assert_eq!(console.selection_mode(), BuildingSelectionMode::UserChoseNull);

    console.load_snapshot(snapshot());
    assert_eq!(console.active_building_id(), None);
    assert_eq!(console.scope(), vec![building("b1"), building("b2")]);
}

#[test]
fn site_change_drops_the_null_choice() {
    let mut harness = harness();
    let console = &mut harness.console;
    console.set_active_building(None);
    console.set_active_site(Some(SiteId::from("s2")));
    console.set_active_site(Some(SiteId::from("s1")));
    assert_eq!(console.active_building_id(), Some(&building("b1")));
}

#[test]
fn removed_building_heals_to_first_remaining() {
    let mut harness = harness();
    let console = &mut harness.console;
    console.set_active_building(Some(building("b1")));

    let mut without_b1 = snapshot();
    without_b1.buildings.retain(|record| record.id != building("b1"));
    console.load_snapshot(without_b1);
    assert_eq!(console.active_building_id(), Some(&building("b2")));
    assert_eq!(console.selection_mode(), BuildingSelectionMode::Auto);
}

#[test]
fn unknown_building_is_healed_immediately() {
    let mut harness = harness();
    let console = &mut harness.console;
    console.set_active_building(Some(building("nope")));
    assert_eq!(console.active_building_id(), Some(&building("b1")));
}

#[test]
fn clearing_the_site_empties_every_view() {
    let mut harness = harness();
    let console = &mut harness.console;
    console.set_active_site(None);
    assert_eq!(console.active_building_id(), None);
    assert!(console.resident_view().filtered().is_empty());
    assert!(console.occupancy().is_empty());

    // An explicit "no site" is not overridden by the next load.
    console.load_snapshot(snapshot());
    assert_eq!(console.active_site_id(), None);
}

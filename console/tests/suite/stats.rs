use super::harness;
use super::harness_with;
use estate_console::ConsoleConfig;
use estate_console::GuestCountScope;
use estate_console::ParkingStats;
use estate_console::UnitStats;
use estate_model::ParkingSpotId;
use pretty_assertions::assert_eq;

#[test]
fn active_building_stats() {
    let harness = harness();
    assert_eq!(
        harness.console.unit_stats(),
        UnitStats {
            total: 3,
            occupied: 2,
            empty: 1
        }
    );
    assert_eq!(
        harness.console.parking_stats(),
        ParkingStats {
            total_spots: 3,
            occupied_spots: 1,
            available_spots: 2,
            occupancy_rate: 33,
            guest_vehicles: 3,
        }
    );
}

#[test]
fn all_buildings_stats_sum_the_site() {
    let mut harness = harness();
    harness.console.set_active_building(None);
    assert_eq!(
        harness.console.unit_stats(),
        UnitStats {
            total: 4,
            occupied: 3,
            empty: 1
        }
    );
    let parking = harness.console.parking_stats();
    assert_eq!(parking.total_spots, 4);
    assert_eq!(parking.occupied_spots, 1);
    assert_eq!(parking.occupancy_rate, 25);
}

#[test]
fn cancelled_and_completed_guests_are_not_counted() {
    let harness = harness();
    let guests: Vec<String> = harness
        .console
        .unified_vehicles(None)
        .into_iter()
        .filter(|row| row.is_guest)
        .map(|row| row.plate.to_string())
        .collect();
    assert_eq!(guests, vec!["DUP-1", "GST-1", "GST-2"]);
    assert_eq!(harness.console.parking_stats().guest_vehicles, guests.len());
}

#[test]
fn building_scoped_guest_count() {
    let config = ConsoleConfig {
        guest_count_scope: GuestCountScope::Building,
        ..ConsoleConfig::default()
    };
    let harness = harness_with(config);
    assert_eq!(harness.console.parking_stats().guest_vehicles, 2);
}

#[test]
fn occupancy_rate_stays_in_bounds_while_filling_spots() {
    let mut harness = harness();
    let assigned = harness
        .console
        .assign_vehicle_to_spot(&ParkingSpotId::from("pa"), "v2");
    assert!(assigned.is_some());
    let stats = harness.console.parking_stats();
    assert_eq!(stats.occupied_spots, 2);
    assert_eq!(stats.occupancy_rate, 67);
    assert!(stats.occupancy_rate <= 100);
}

#[test]
fn unified_list_is_stable_between_calls() {
    let harness = harness();
    assert_eq!(
        harness.console.unified_vehicles(None),
        harness.console.unified_vehicles(None)
    );
    assert_eq!(
        harness.console.unified_vehicles(Some("gst")),
        harness.console.unified_vehicles(Some("GST"))
    );
}

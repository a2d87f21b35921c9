use super::harness;
use estate_console::NoticeLevel;
use estate_console::PropertyConsole;
use estate_console::parking::VehicleRef;
use estate_model::BuildingId;
use estate_model::GuestVisitId;
use estate_model::ParkingSpotId;
use estate_model::ResidentId;
use pretty_assertions::assert_eq;

fn spot(id: &str) -> ParkingSpotId {
    ParkingSpotId::from(id)
}

/// `(spot name, resident plate, guest plate)` per spot of the scope.
fn occupancy(console: &PropertyConsole) -> Vec<(String, Option<String>, Option<String>)> {
    console
        .occupancy()
        .iter()
        .map(|entry| {
            (
                entry.spot.name.clone(),
                entry.holder.as_ref().map(|holder| holder.plate.to_string()),
                entry.guest.as_ref().map(|guest| guest.plate.to_string()),
            )
        })
        .collect()
}

#[test]
fn fixture_occupancy_is_id_based() {
    let harness = harness();
    assert_eq!(
        occupancy(&harness.console),
        vec![
            ("A".to_string(), None, None),
            ("B".to_string(), Some("ABC-123".to_string()), None),
            ("C".to_string(), None, Some("GST-1".to_string())),
        ]
    );
}

#[test]
fn guest_assignment_moves_its_claim() {
    let mut harness = harness();
    let console = &mut harness.console;
    let assignment = console
        .assign_vehicle_to_spot(&spot("pa"), "g1")
        .expect("assignment");
    assert_eq!(assignment.vehicle, VehicleRef::Guest(GuestVisitId::from("g1")));
    assert_eq!(assignment.previous_spot.as_deref(), Some("C"));
    assert_eq!(
        occupancy(console),
        vec![
            ("A".to_string(), None, Some("GST-1".to_string())),
            ("B".to_string(), Some("ABC-123".to_string()), None),
            ("C".to_string(), None, None),
        ]
    );
    // Guests never count towards occupied spots.
    assert_eq!(console.parking_stats().occupied_spots, 1);
}

#[test]
fn refused_assignments_leave_state_untouched() {
    let mut harness = harness();
    let before = harness.console.snapshot();

    assert_eq!(harness.console.assign_vehicle_to_spot(&spot("pc"), "v2"), None);
    assert_eq!(harness.console.assign_vehicle_to_spot(&spot("px"), "v2"), None);
    assert_eq!(harness.console.assign_vehicle_to_spot(&spot("zz"), "v2"), None);
    assert_eq!(harness.console.assign_vehicle_to_spot(&spot("pa"), "nobody"), None);
    assert_eq!(harness.console.snapshot(), before);

    let messages: Vec<String> = harness
        .notifier
        .take()
        .into_iter()
        .map(|notice| {
            assert_eq!(notice.level, NoticeLevel::Error);
            notice.message
        })
        .collect();
    assert_eq!(
        messages,
        vec![
            "spot C is already taken by GST-1",
            "spot X is not in the vehicle's building",
            "unknown parking spot: zz",
            "unknown vehicle: nobody",
        ]
    );
}

#[test]
fn hostless_guest_does_not_block_other_buildings() {
    let mut harness = harness();
    let console = &mut harness.console;
    assert!(console.assign_vehicle_to_spot(&spot("pa"), "dup").is_some());
    let b2_a = console
        .add_parking_spot(&BuildingId::from("b2"), 0, "A")
        .expect("spot added");

    console.set_active_building(Some(BuildingId::from("b2")));
    assert_eq!(
        occupancy(console),
        vec![
            ("X".to_string(), None, None),
            ("A".to_string(), None, None),
        ]
    );
    let vehicle = console
        .add_vehicle(&ResidentId::from("r3"), "NEW-3", "Zoe")
        .expect("vehicle added");
    assert!(
        console
            .assign_vehicle_to_spot(&b2_a, vehicle.as_str())
            .is_some()
    );
    assert_eq!(console.parking_stats().occupied_spots, 1);
}

#[test]
fn finished_guest_visit_cannot_take_a_spot() {
    let mut harness = harness();
    assert_eq!(harness.console.assign_vehicle_to_spot(&spot("pa"), "g4"), None);
    let notices = harness.notifier.take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "guest GST-4 is completed and cannot hold a spot");
    // Spot A stays free for residents.
    assert!(harness.console.assign_vehicle_to_spot(&spot("pa"), "v2").is_some());
}

#[test]
fn unassign_releases_the_spot() {
    let mut harness = harness();
    let released = harness.console.unassign_vehicle("v1").expect("unassigned");
    assert_eq!(released.released_spot.as_deref(), Some("B"));
    let stats = harness.console.parking_stats();
    assert_eq!(stats.occupied_spots, 0);
    assert_eq!(stats.available_spots, 3);

    // Releasing again has nothing to do and says so.
    assert!(harness.console.unassign_vehicle("v1").is_some());
    let levels: Vec<NoticeLevel> = harness
        .notifier
        .take()
        .into_iter()
        .map(|notice| notice.level)
        .collect();
    assert_eq!(levels, vec![NoticeLevel::Success, NoticeLevel::Warning]);
}

#[test]
fn rename_keeps_links_and_guest_claims() {
    let mut harness = harness();
    let console = &mut harness.console;
    assert!(console.rename_parking_spot(&spot("pb"), " B1 "));
    assert!(console.rename_parking_spot(&spot("pc"), "C2"));
    assert_eq!(
        occupancy(console),
        vec![
            ("A".to_string(), None, None),
            ("B1".to_string(), Some("ABC-123".to_string()), None),
            ("C2".to_string(), None, Some("GST-1".to_string())),
        ]
    );
    let spots: Vec<Option<String>> = console
        .unified_vehicles(Some("abc"))
        .iter()
        .map(|row| row.parking_spot.map(str::to_owned))
        .collect();
    assert_eq!(spots, vec![Some("B1".to_string())]);

    // Names stay unique within the building, ignoring case.
    assert!(!console.rename_parking_spot(&spot("pa"), "b1"));
}

#[test]
fn new_spot_and_vehicle_can_be_paired() {
    let mut harness = harness();
    let console = &mut harness.console;
    assert_eq!(console.add_parking_spot(&BuildingId::from("b1"), 1, "  "), None);
    assert_eq!(console.add_parking_spot(&BuildingId::from("b1"), 1, "a"), None);
    let new_spot = console
        .add_parking_spot(&BuildingId::from("b1"), -1, "D")
        .expect("spot added");

    assert_eq!(console.add_vehicle(&ResidentId::from("r2"), " ", "Golf"), None);
    let vehicle = console
        .add_vehicle(&ResidentId::from("r2"), "NEW-1", "Golf")
        .expect("vehicle added");
    assert!(
        console
            .assign_vehicle_to_spot(&new_spot, vehicle.as_str())
            .is_some()
    );

    let stats = console.parking_stats();
    assert_eq!(stats.total_spots, 4);
    assert_eq!(stats.occupied_spots, 2);
    assert_eq!(stats.occupancy_rate, 50);

    let levels: Vec<NoticeLevel> = harness
        .notifier
        .take()
        .into_iter()
        .map(|notice| notice.level)
        .collect();
    assert_eq!(
        levels,
        vec![
            NoticeLevel::Error,
            NoticeLevel::Error,
            NoticeLevel::Success,
            NoticeLevel::Error,
            NoticeLevel::Success,
            NoticeLevel::Success,
        ]
    );
}

#[test]
fn deleting_a_shared_id_removes_the_guest_visit() {
    let mut harness = harness();
    let console = &mut harness.console;
    assert_eq!(
        console.delete_vehicle("dup"),
        Some(VehicleRef::Guest(GuestVisitId::from("dup")))
    );
    assert_eq!(console.parking_stats().guest_vehicles, 2);

    // The resident vehicle with the same id is now reachable.
    console.set_active_building(Some(BuildingId::from("b2")));
    assert_eq!(
        console.delete_vehicle("dup"),
        Some(VehicleRef::Resident("dup".into()))
    );
    assert!(console.unified_vehicles(Some("res-9")).is_empty());
}

//! Aggregate statistics. Pure reads of the entity graph.

use crate::config::GuestCountScope;
use crate::parking::compute_occupancy;
use estate_model::BuildingId;
use estate_model::EntityGraph;
use estate_model::UnitStatus;
use serde::Serialize;
use std::iter::Sum;
use std::ops::Add;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UnitStats {
    pub total: usize,
    pub occupied: usize,
    pub empty: usize,
}

impl Add for UnitStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            total: self.total + other.total,
            occupied: self.occupied + other.occupied,
            empty: self.empty + other.empty,
        }
    }
}

impl Sum for UnitStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingStats {
    pub total_spots: usize,
    pub occupied_spots: usize,
    pub available_spots: usize,
    /// Whole percent in `0..=100`.
    pub occupancy_rate: u8,
    pub guest_vehicles: usize,
}

impl ParkingStats {
    pub fn from_counts(total_spots: usize, occupied_spots: usize, guest_vehicles: usize) -> Self {
        let occupied_spots = occupied_spots.min(total_spots);
        Self {
            total_spots,
            occupied_spots,
            available_spots: total_spots - occupied_spots,
            occupancy_rate: occupancy_rate(occupied_spots, total_spots),
            guest_vehicles,
        }
    }
}

/// `round(occupied / total * 100)` with halves rounded up, `0` without spots.
pub fn occupancy_rate(occupied: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let occupied = occupied.min(total);
    let rate = (occupied * 200 + total) / (total * 2);
    u8::try_from(rate).unwrap_or(100)
}

pub fn unit_stats(graph: &EntityGraph, building: &BuildingId) -> UnitStats {
    graph
        .units_of(building)
        .map(|unit| match graph.unit_status(&unit.id) {
            UnitStatus::Occupied => UnitStats {
                total: 1,
                occupied: 1,
                empty: 0,
            },
            UnitStatus::Empty => UnitStats {
                total: 1,
                occupied: 0,
                empty: 1,
            },
        })
        .sum()
}

/// Spot counts of one building, `(total, occupied)`.
pub fn spot_counts(graph: &EntityGraph, building: &BuildingId) -> (usize, usize) {
    let occupancy = compute_occupancy(graph, building);
    let occupied = occupancy.iter().filter(|spot| spot.is_occupied()).count();
    (occupancy.len(), occupied)
}

/// Present guest visits: every one of them under [`GuestCountScope::Global`],
/// or only those hosted by a unit of `buildings` otherwise.
pub fn guest_vehicle_count(
    graph: &EntityGraph,
    buildings: &[BuildingId],
    scope: GuestCountScope,
) -> usize {
    graph
        .guest_visits()
        .filter(|visit| visit.status.is_present())
        .filter(|visit| match scope {
            GuestCountScope::Global => true,
            GuestCountScope::Building => graph
                .building_of_guest(visit)
                .is_some_and(|host| buildings.contains(host)),
        })
        .count()
}

/// Parking stats summed over several buildings (the all-buildings view).
pub fn parking_stats_for(
    graph: &EntityGraph,
    buildings: &[BuildingId],
    scope: GuestCountScope,
) -> ParkingStats {
    let (total, occupied) = buildings
        .iter()
        .map(|building| spot_counts(graph, building))
        .fold((0, 0), |(total, occupied), (t, o)| (total + t, occupied + o));
    ParkingStats::from_counts(total, occupied, guest_vehicle_count(graph, buildings, scope))
}

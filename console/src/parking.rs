//! Vehicle ↔ parking spot assignment.
//!
//! Resident vehicles reference spots by [`ParkingSpotId`]; the display name on
//! the vehicle is a projection refreshed by the graph. Guest visits are
//! linked by spot name only and claim a spot of their host unit's building.
//! A guest without a host unit claims the spot only when its name exists in
//! exactly one building.

use crate::error::ParkingError;
use crate::error::ValidationError;
use crate::filter::any_field_contains;
use estate_model::BuildingId;
use estate_model::EntityGraph;
use estate_model::GuestVisit;
use estate_model::GuestVisitId;
use estate_model::GuestVisitStatus;
use estate_model::ParkingSpot;
use estate_model::ParkingSpotId;
use estate_model::ResidentId;
use estate_model::Vehicle;
use estate_model::VehicleId;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// A vehicle resolved from a raw id, tagged with its population.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum VehicleRef {
    Guest(GuestVisitId),
    Resident(VehicleId),
}

impl VehicleRef {
    pub fn is_guest(&self) -> bool {
        matches!(self, VehicleRef::Guest(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            VehicleRef::Guest(id) => id.as_str(),
            VehicleRef::Resident(id) => id.as_str(),
        }
    }
}

/// Guests win over residents: an id present in both populations refers to
/// the guest registration.
pub fn resolve_vehicle(graph: &EntityGraph, raw: &str) -> Option<VehicleRef> {
    if let Some(visit) = graph.guest_visit(&GuestVisitId::from(raw)) {
        return Some(VehicleRef::Guest(visit.id.clone()));
    }
    graph
        .vehicle(&VehicleId::from(raw))
        .map(|vehicle| VehicleRef::Resident(vehicle.id.clone()))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotHolder<'g> {
    pub vehicle: VehicleRef,
    pub plate: &'g str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotOccupancy<'g> {
    pub spot: &'g ParkingSpot,
    /// Resident vehicle linked to the spot.
    pub holder: Option<SpotHolder<'g>>,
    /// Present guest visit claiming the spot by name.
    pub guest: Option<SpotHolder<'g>>,
}

impl SpotOccupancy<'_> {
    /// Occupancy statistics count resident vehicles only.
    pub fn is_occupied(&self) -> bool {
        self.holder.is_some()
    }

    pub fn is_free(&self) -> bool {
        self.holder.is_none() && self.guest.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub vehicle: VehicleRef,
    pub spot_id: ParkingSpotId,
    pub spot_name: String,
    pub previous_spot: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unassignment {
    pub vehicle: VehicleRef,
    pub released_spot: Option<String>,
}

/// One row of the merged resident + guest vehicle list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedVehicle<'g> {
    pub vehicle: VehicleRef,
    pub plate: &'g str,
    pub model: &'g str,
    pub holder_name: &'g str,
    pub unit_number: Option<&'g str>,
    pub parking_spot: Option<&'g str>,
    pub is_guest: bool,
    pub guest_status: Option<GuestVisitStatus>,
}

impl UnifiedVehicle<'_> {
    /// `needle` must be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        any_field_contains(
            needle,
            [self.plate, self.holder_name]
                .into_iter()
                .chain(self.unit_number),
        )
    }
}

/// Resident vehicles of `buildings` (in building order) followed by every
/// pending or active guest visit. A non-blank `search` keeps rows whose
/// plate, holder name or unit number contains it, ignoring case.
pub fn build_unified_vehicle_list<'g>(
    graph: &'g EntityGraph,
    buildings: &[BuildingId],
    search: Option<&str>,
) -> Vec<UnifiedVehicle<'g>> {
    let residents = buildings
        .iter()
        .flat_map(|building| graph.vehicles_in(building))
        .map(|vehicle| resident_row(graph, vehicle));
    let guests = graph
        .guest_visits()
        .filter(|visit| visit.status.is_present())
        .map(|visit| guest_row(graph, visit));
    let rows = residents.chain(guests);

    match search.map(str::trim).filter(|term| !term.is_empty()) {
        Some(term) => {
            let needle = term.to_lowercase();
            rows.filter(|row| row.matches(&needle)).collect()
        }
        None => rows.collect(),
    }
}

fn resident_row<'g>(graph: &'g EntityGraph, vehicle: &'g Vehicle) -> UnifiedVehicle<'g> {
    UnifiedVehicle {
        vehicle: VehicleRef::Resident(vehicle.id.clone()),
        plate: &vehicle.plate,
        model: &vehicle.model,
        holder_name: graph
            .resident_of_vehicle(vehicle)
            .map_or("", |resident| resident.name.as_str()),
        unit_number: graph
            .unit_of_vehicle(vehicle)
            .map(|unit| unit.number.as_str()),
        parking_spot: graph.spot_label(vehicle),
        is_guest: false,
        guest_status: None,
    }
}

fn guest_row<'g>(graph: &'g EntityGraph, visit: &'g GuestVisit) -> UnifiedVehicle<'g> {
    UnifiedVehicle {
        vehicle: VehicleRef::Guest(visit.id.clone()),
        plate: &visit.plate,
        model: &visit.model,
        holder_name: &visit.guest_name,
        unit_number: visit
            .unit_id
            .as_ref()
            .and_then(|id| graph.unit(id))
            .map(|unit| unit.number.as_str()),
        parking_spot: visit.parking_spot.as_deref(),
        is_guest: true,
        guest_status: Some(visit.status),
    }
}

/// Per-spot occupancy of one building, in spot order.
pub fn compute_occupancy<'g>(
    graph: &'g EntityGraph,
    building: &BuildingId,
) -> Vec<SpotOccupancy<'g>> {
    let mut holders: HashMap<&ParkingSpotId, SpotHolder<'g>> = HashMap::new();
    for vehicle in graph.vehicles_in(building) {
        if let Some(spot_id) = &vehicle.parking_spot_id {
            holders.entry(spot_id).or_insert_with(|| SpotHolder {
                vehicle: VehicleRef::Resident(vehicle.id.clone()),
                plate: &vehicle.plate,
            });
        }
    }
    let guests = guest_claims(graph, building);

    graph
        .spots_of(building)
        .map(|spot| SpotOccupancy {
            spot,
            holder: holders.remove(&spot.id),
            guest: guests.get(spot.name.as_str()).cloned(),
        })
        .collect()
}

pub fn available_spots<'g>(graph: &'g EntityGraph, building: &BuildingId) -> Vec<&'g ParkingSpot> {
    compute_occupancy(graph, building)
        .into_iter()
        .filter(SpotOccupancy::is_free)
        .map(|occupancy| occupancy.spot)
        .collect()
}

fn guest_claims<'g>(
    graph: &'g EntityGraph,
    building: &BuildingId,
) -> HashMap<&'g str, SpotHolder<'g>> {
    let mut claims = HashMap::new();
    for visit in graph.guest_visits() {
        if !visit.status.is_present() {
            continue;
        }
        let Some(name) = visit.parking_spot.as_deref() else {
            continue;
        };
        if claim_building(graph, visit, name) != Some(building) {
            continue;
        }
        claims.entry(name).or_insert_with(|| SpotHolder {
            vehicle: VehicleRef::Guest(visit.id.clone()),
            plate: &visit.plate,
        });
    }
    claims
}

/// Building in which `visit` claims the spot called `name`.
fn claim_building<'g>(
    graph: &'g EntityGraph,
    visit: &GuestVisit,
    name: &str,
) -> Option<&'g BuildingId> {
    match graph.building_of_guest(visit) {
        Some(host) => Some(host),
        None => sole_building_with_spot(graph, name),
    }
}

/// The only building with a spot called `name`. A hostless guest's claim is
/// pinned there; with zero or several candidates it pins nowhere.
fn sole_building_with_spot<'g>(graph: &'g EntityGraph, name: &str) -> Option<&'g BuildingId> {
    let mut candidates = graph
        .buildings()
        .filter(|building| graph.spots_of(&building.id).any(|spot| spot.name == name))
        .map(|building| &building.id);
    match (candidates.next(), candidates.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

fn holder_of<'g>(graph: &'g EntityGraph, spot: &ParkingSpot) -> Option<SpotHolder<'g>> {
    let resident = graph
        .vehicles_in(&spot.building_id)
        .find(|vehicle| vehicle.parking_spot_id.as_ref() == Some(&spot.id))
        .map(|vehicle| SpotHolder {
            vehicle: VehicleRef::Resident(vehicle.id.clone()),
            plate: &vehicle.plate,
        });
    resident.or_else(|| guest_claims(graph, &spot.building_id).remove(spot.name.as_str()))
}

/// Only pending or active visits park, and a hostless guest needs a spot
/// name that points at a single building.
fn check_guest_can_park(
    graph: &EntityGraph,
    id: &GuestVisitId,
    spot: &ParkingSpot,
) -> Result<(), ParkingError> {
    let visit = graph
        .guest_visit(id)
        .ok_or_else(|| ParkingError::UnknownVehicle(id.to_string()))?;
    if !visit.status.is_present() {
        return Err(ParkingError::GuestNotPresent {
            plate: visit.plate.clone(),
            status: visit.status,
        });
    }
    if graph.building_of_guest(visit).is_none()
        && sole_building_with_spot(graph, &spot.name) != Some(&spot.building_id)
    {
        return Err(ParkingError::AmbiguousSpotName {
            spot: spot.name.clone(),
        });
    }
    Ok(())
}

/// Point a vehicle at `spot_id`. Refused when another vehicle holds the spot
/// or the spot belongs to a different building than the vehicle.
pub fn assign_vehicle_to_spot(
    graph: &mut EntityGraph,
    spot_id: &ParkingSpotId,
    vehicle: &str,
) -> Result<Assignment, ParkingError> {
    let spot = graph
        .spot(spot_id)
        .cloned()
        .ok_or_else(|| ParkingError::UnknownSpot(spot_id.clone()))?;
    let target = resolve_vehicle(graph, vehicle)
        .ok_or_else(|| ParkingError::UnknownVehicle(vehicle.to_string()))?;
    if let VehicleRef::Guest(id) = &target {
        check_guest_can_park(graph, id, &spot)?;
    }

    if let Some(holder) = holder_of(graph, &spot) {
        if holder.vehicle != target {
            return Err(ParkingError::SpotTaken {
                spot: spot.name,
                plate: holder.plate.to_string(),
            });
        }
    }

    let previous_spot = match &target {
        VehicleRef::Guest(id) => {
            let visit = graph
                .guest_visit(id)
                .ok_or_else(|| ParkingError::UnknownVehicle(id.to_string()))?;
            if graph
                .building_of_guest(visit)
                .is_some_and(|host| host != &spot.building_id)
            {
                return Err(ParkingError::WrongBuilding { spot: spot.name });
            }
            let previous = visit.parking_spot.clone();
            let name = spot.name.clone();
            graph.update_guest_visit(id, |visit| visit.parking_spot = Some(name))?;
            previous
        }
        VehicleRef::Resident(id) => {
            let current = graph
                .vehicle(id)
                .ok_or_else(|| ParkingError::UnknownVehicle(id.to_string()))?;
            if graph.building_of_vehicle(current) != Some(&spot.building_id) {
                return Err(ParkingError::WrongBuilding { spot: spot.name });
            }
            let previous = graph.spot_label(current).map(str::to_owned);
            let linked = spot.id.clone();
            graph.update_vehicle(id, |vehicle| {
                vehicle.parking_spot_id = Some(linked);
                vehicle.parking_spot = None;
            })?;
            previous
        }
    };

    info!(vehicle, spot = %spot.name, "vehicle assigned to parking spot");
    Ok(Assignment {
        vehicle: target,
        spot_id: spot.id,
        spot_name: spot.name,
        previous_spot,
    })
}

pub fn unassign_vehicle(
    graph: &mut EntityGraph,
    vehicle: &str,
) -> Result<Unassignment, ParkingError> {
    let target = resolve_vehicle(graph, vehicle)
        .ok_or_else(|| ParkingError::UnknownVehicle(vehicle.to_string()))?;

    let mut released_spot = None;
    match &target {
        VehicleRef::Guest(id) => {
            graph.update_guest_visit(id, |visit| released_spot = visit.parking_spot.take())?;
        }
        VehicleRef::Resident(id) => {
            released_spot = graph
                .vehicle(id)
                .and_then(|current| graph.spot_label(current))
                .map(str::to_owned);
            graph.update_vehicle(id, |vehicle| {
                vehicle.parking_spot_id = None;
                vehicle.parking_spot = None;
            })?;
        }
    }

    info!(vehicle, released = ?released_spot, "vehicle unassigned");
    Ok(Unassignment {
        vehicle: target,
        released_spot,
    })
}

/// Remove a resident vehicle, or drop a guest visit entirely.
pub fn delete_vehicle(graph: &mut EntityGraph, vehicle: &str) -> Result<VehicleRef, ParkingError> {
    let target = resolve_vehicle(graph, vehicle)
        .ok_or_else(|| ParkingError::UnknownVehicle(vehicle.to_string()))?;
    match &target {
        VehicleRef::Guest(id) => {
            graph.remove_guest_visit(id)?;
        }
        VehicleRef::Resident(id) => {
            graph.remove_vehicle(id)?;
        }
    }
    info!(vehicle, "vehicle deleted");
    Ok(target)
}

pub fn add_parking_spot(
    graph: &mut EntityGraph,
    building: &BuildingId,
    floor: i32,
    name: &str,
) -> Result<ParkingSpotId, ParkingError> {
    if graph.building(building).is_none() {
        return Err(ParkingError::UnknownBuilding(building.clone()));
    }
    let name = validate_spot_name(graph, building, name, None)?;
    let id = ParkingSpotId::new(Uuid::new_v4().to_string());
    graph.insert_spot(ParkingSpot {
        id: id.clone(),
        building_id: building.clone(),
        floor,
        name,
    })?;
    info!(%building, spot = %id, "parking spot added");
    Ok(id)
}

/// Rename a spot. Linked resident vehicles follow through the id; guest
/// visits that claimed the old name are moved to the new one.
pub fn rename_parking_spot(
    graph: &mut EntityGraph,
    spot: &ParkingSpotId,
    name: &str,
) -> Result<(), ParkingError> {
    let (building, old_name) = graph
        .spot(spot)
        .map(|current| (current.building_id.clone(), current.name.clone()))
        .ok_or_else(|| ParkingError::UnknownSpot(spot.clone()))?;
    let name = validate_spot_name(graph, &building, name, Some(spot))?;

    let claimed: Vec<GuestVisitId> = graph
        .guest_visits()
        .filter(|visit| visit.parking_spot.as_deref() == Some(old_name.as_str()))
        .filter(|visit| {
            claim_building(graph, visit, &old_name) == Some(&building)
        })
        .map(|visit| visit.id.clone())
        .collect();
    for id in &claimed {
        let renamed = name.clone();
        graph.update_guest_visit(id, |visit| visit.parking_spot = Some(renamed))?;
    }

    graph.rename_spot(spot, name)?;
    info!(spot = %spot, from = %old_name, "parking spot renamed");
    Ok(())
}

pub fn add_vehicle(
    graph: &mut EntityGraph,
    resident: &ResidentId,
    plate: &str,
    model: &str,
) -> Result<VehicleId, ParkingError> {
    if graph.resident(resident).is_none() {
        return Err(ParkingError::UnknownResident(resident.clone()));
    }
    let plate = plate.trim();
    if plate.is_empty() {
        return Err(ValidationError::EmptyPlate.into());
    }
    let id = VehicleId::new(Uuid::new_v4().to_string());
    graph.insert_vehicle(Vehicle {
        id: id.clone(),
        resident_id: Some(resident.clone()),
        plate: plate.to_string(),
        model: model.trim().to_string(),
        parking_spot: None,
        parking_spot_id: None,
    })?;
    info!(%resident, vehicle = %id, "vehicle added");
    Ok(id)
}

fn validate_spot_name(
    graph: &EntityGraph,
    building: &BuildingId,
    name: &str,
    renaming: Option<&ParkingSpotId>,
) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptySpotName);
    }
    let clash = graph
        .spots_of(building)
        .any(|spot| Some(&spot.id) != renaming && spot.name.eq_ignore_ascii_case(name));
    if clash {
        return Err(ValidationError::DuplicateSpotName(name.to_string()));
    }
    Ok(name.to_string())
}

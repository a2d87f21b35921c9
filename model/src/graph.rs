use crate::entity::Building;
use crate::entity::CommunityRequest;
use crate::entity::GuestVisit;
use crate::entity::ParkingSpot;
use crate::entity::Resident;
use crate::entity::Site;
use crate::entity::Unit;
use crate::entity::UnitStatus;
use crate::entity::Vehicle;
use crate::error::ModelError;
use crate::error::Result;
use crate::ids::BuildingId;
use crate::ids::GuestVisitId;
use crate::ids::ParkingSpotId;
use crate::ids::RequestId;
use crate::ids::ResidentId;
use crate::ids::SiteId;
use crate::ids::UnitId;
use crate::ids::VehicleId;
use crate::snapshot::BuildingRecord;
use crate::snapshot::ResidentRecord;
use crate::snapshot::Snapshot;
use crate::snapshot::UnitRecord;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;
use tracing::debug;
use tracing::warn;

/// Normalized arena of every entity, keyed by id.
///
/// Each map keeps snapshot order. Parent → child order is kept in the
/// `*_by_*` indexes so per-building and per-unit listings stay stable
/// without walking the whole arena.
#[derive(Clone, Debug, Default)]
pub struct EntityGraph {
    sites: IndexMap<SiteId, Site>,
    buildings: IndexMap<BuildingId, Building>,
    units: IndexMap<UnitId, Unit>,
    residents: IndexMap<ResidentId, Resident>,
    vehicles: IndexMap<VehicleId, Vehicle>,
    spots: IndexMap<ParkingSpotId, ParkingSpot>,
    guest_visits: IndexMap<GuestVisitId, GuestVisit>,
    requests: IndexMap<RequestId, CommunityRequest>,

    units_by_building: HashMap<BuildingId, Vec<UnitId>>,
    spots_by_building: HashMap<BuildingId, Vec<ParkingSpotId>>,
    residents_by_unit: HashMap<UnitId, Vec<ResidentId>>,
    vehicles_by_resident: HashMap<ResidentId, Vec<VehicleId>>,
}

impl EntityGraph {
    /// Flatten a nested snapshot. Parent ids are taken from the nesting,
    /// duplicate ids keep their first occurrence, and vehicles that only
    /// carry a spot name are linked to the spot of that name when it is
    /// unique within their building.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut graph = Self::default();

        for site in snapshot.sites {
            insert_unique(&mut graph.sites, "site", site.id.clone(), site);
        }

        for record in snapshot.buildings {
            let building_id = record.id.clone();
            let building = Building {
                id: record.id,
                site_id: record.site_id,
                name: record.name,
            };
            if !insert_unique(&mut graph.buildings, "building", building_id.clone(), building) {
                continue;
            }

            for mut spot in record.parking_spots {
                spot.building_id = building_id.clone();
                let spot_id = spot.id.clone();
                if insert_unique(&mut graph.spots, "parking spot", spot_id.clone(), spot) {
                    graph
                        .spots_by_building
                        .entry(building_id.clone())
                        .or_default()
                        .push(spot_id);
                }
            }

            for unit in record.units {
                graph.ingest_unit(&building_id, unit);
            }
        }

        for visit in snapshot.guest_visits {
            insert_unique(&mut graph.guest_visits, "guest visit", visit.id.clone(), visit);
        }
        for request in snapshot.requests {
            insert_unique(&mut graph.requests, "request", request.id.clone(), request);
        }

        graph.link_spot_references();
        debug!(
            sites = graph.sites.len(),
            buildings = graph.buildings.len(),
            vehicles = graph.vehicles.len(),
            spots = graph.spots.len(),
            "entity graph built"
        );
        graph
    }

    fn ingest_unit(&mut self, building_id: &BuildingId, record: UnitRecord) {
        let unit_id = record.id.clone();
        let unit = Unit {
            id: record.id,
            building_id: building_id.clone(),
            number: record.number,
            floor: record.floor,
        };
        if !insert_unique(&mut self.units, "unit", unit_id.clone(), unit) {
            return;
        }
        self.units_by_building
            .entry(building_id.clone())
            .or_default()
            .push(unit_id.clone());

        for resident in record.residents {
            let resident_id = resident.id.clone();
            let entry = Resident {
                id: resident.id,
                unit_id: unit_id.clone(),
                name: resident.name,
                kind: resident.kind,
                phone: resident.phone,
                email: resident.email,
            };
            if !insert_unique(&mut self.residents, "resident", resident_id.clone(), entry) {
                continue;
            }
            self.residents_by_unit
                .entry(unit_id.clone())
                .or_default()
                .push(resident_id.clone());

            for mut vehicle in resident.vehicles {
                vehicle.resident_id = Some(resident_id.clone());
                let vehicle_id = vehicle.id.clone();
                if insert_unique(&mut self.vehicles, "vehicle", vehicle_id.clone(), vehicle) {
                    self.vehicles_by_resident
                        .entry(resident_id.clone())
                        .or_default()
                        .push(vehicle_id);
                }
            }
        }
    }

    /// A spot holds one resident vehicle: later references to an already
    /// linked spot keep their name but not the link.
    fn link_spot_references(&mut self) {
        let mut linked: HashSet<ParkingSpotId> = HashSet::new();
        let links: Vec<(VehicleId, Option<ParkingSpotId>, Option<String>)> = self
            .vehicles
            .values()
            .map(|vehicle| {
                let spot_id = self
                    .resolve_spot_reference(vehicle)
                    .filter(|spot_id| {
                        let first = linked.insert(spot_id.clone());
                        if !first {
                            warn!(
                                vehicle = %vehicle.id,
                                spot = %spot_id,
                                "spot already holds another vehicle; leaving vehicle unlinked"
                            );
                        }
                        first
                    });
                let label = spot_id
                    .as_ref()
                    .and_then(|id| self.spots.get(id))
                    .map(|spot| spot.name.clone())
                    .or_else(|| vehicle.parking_spot.clone());
                (vehicle.id.clone(), spot_id, label)
            })
            .collect();

        for (id, spot_id, label) in links {
            if let Some(vehicle) = self.vehicles.get_mut(&id) {
                vehicle.parking_spot_id = spot_id;
                vehicle.parking_spot = label;
            }
        }
    }

    fn resolve_spot_reference(&self, vehicle: &Vehicle) -> Option<ParkingSpotId> {
        let building = self.building_of_vehicle(vehicle)?;

        if let Some(spot_id) = &vehicle.parking_spot_id {
            return match self.spots.get(spot_id) {
                Some(spot) if &spot.building_id == building => Some(spot_id.clone()),
                Some(_) => {
                    warn!(
                        vehicle = %vehicle.id,
                        spot = %spot_id,
                        "spot belongs to another building; dropping the link"
                    );
                    None
                }
                None => {
                    warn!(
                        vehicle = %vehicle.id,
                        spot = %spot_id,
                        "unknown parking spot id; dropping the link"
                    );
                    None
                }
            };
        }

        let name = vehicle.parking_spot.as_deref()?;
        let mut candidates = self.spots_of(building).filter(|spot| spot.name == name);
        match (candidates.next(), candidates.next()) {
            (Some(spot), None) => Some(spot.id.clone()),
            (Some(_), Some(_)) => {
                warn!(
                    vehicle = %vehicle.id,
                    spot = name,
                    "spot name is ambiguous in building; leaving vehicle unlinked"
                );
                None
            }
            (None, _) => {
                warn!(
                    vehicle = %vehicle.id,
                    spot = name,
                    "no spot with this name in building; leaving vehicle unlinked"
                );
                None
            }
        }
    }

    /// Render the nested form back. Spot display names come from the ids.
    pub fn to_snapshot(&self) -> Snapshot {
        let buildings = self
            .buildings
            .values()
            .map(|building| BuildingRecord {
                id: building.id.clone(),
                site_id: building.site_id.clone(),
                name: building.name.clone(),
                units: self
                    .units_of(&building.id)
                    .map(|unit| self.unit_record(unit))
                    .collect(),
                parking_spots: self.spots_of(&building.id).cloned().collect(),
            })
            .collect();

        Snapshot {
            sites: self.sites.values().cloned().collect(),
            buildings,
            guest_visits: self.guest_visits.values().cloned().collect(),
            requests: self.requests.values().cloned().collect(),
        }
    }

    fn unit_record(&self, unit: &Unit) -> UnitRecord {
        UnitRecord {
            id: unit.id.clone(),
            building_id: Some(unit.building_id.clone()),
            number: unit.number.clone(),
            floor: unit.floor,
            residents: self
                .residents_of(&unit.id)
                .map(|resident| ResidentRecord {
                    id: resident.id.clone(),
                    unit_id: Some(resident.unit_id.clone()),
                    name: resident.name.clone(),
                    kind: resident.kind,
                    phone: resident.phone.clone(),
                    email: resident.email.clone(),
                    vehicles: self.vehicles_of(&resident.id).cloned().collect(),
                })
                .collect(),
        }
    }

    pub fn sites(&self) -> impl Iterator<Item = &Site> {
        self.sites.values()
    }

    pub fn site(&self, id: &SiteId) -> Option<&Site> {
        self.sites.get(id)
    }

    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.values()
    }

    pub fn building(&self, id: &BuildingId) -> Option<&Building> {
        self.buildings.get(id)
    }

    /// Buildings of a site, in snapshot order. A building is only selectable
    /// when its site exists, so an unknown site yields nothing.
    pub fn buildings_of_site(&self, site: &SiteId) -> impl Iterator<Item = &Building> {
        let known = self.sites.contains_key(site);
        self.buildings
            .values()
            .filter(move |building| known && &building.site_id == site)
    }

    pub fn unit(&self, id: &UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn units_of(&self, building: &BuildingId) -> impl Iterator<Item = &Unit> {
        self.units_by_building
            .get(building)
            .into_iter()
            .flatten()
            .filter_map(|id| self.units.get(id))
    }

    pub fn resident_count(&self, unit: &UnitId) -> usize {
        self.residents_by_unit.get(unit).map_or(0, Vec::len)
    }

    pub fn unit_status(&self, unit: &UnitId) -> UnitStatus {
        UnitStatus::from_resident_count(self.resident_count(unit))
    }

    pub fn resident(&self, id: &ResidentId) -> Option<&Resident> {
        self.residents.get(id)
    }

    pub fn residents_of(&self, unit: &UnitId) -> impl Iterator<Item = &Resident> {
        self.residents_by_unit
            .get(unit)
            .into_iter()
            .flatten()
            .filter_map(|id| self.residents.get(id))
    }

    pub fn vehicle(&self, id: &VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    pub fn vehicles_of(&self, resident: &ResidentId) -> impl Iterator<Item = &Vehicle> {
        self.vehicles_by_resident
            .get(resident)
            .into_iter()
            .flatten()
            .filter_map(|id| self.vehicles.get(id))
    }

    pub fn vehicle_count(&self, resident: &ResidentId) -> usize {
        self.vehicles_by_resident.get(resident).map_or(0, Vec::len)
    }

    /// Resident vehicles of a building, ordered unit → resident → vehicle.
    pub fn vehicles_in(&self, building: &BuildingId) -> impl Iterator<Item = &Vehicle> {
        self.units_of(building)
            .flat_map(|unit| self.residents_of(&unit.id))
            .flat_map(|resident| self.vehicles_of(&resident.id))
    }

    pub fn resident_of_vehicle(&self, vehicle: &Vehicle) -> Option<&Resident> {
        vehicle
            .resident_id
            .as_ref()
            .and_then(|id| self.residents.get(id))
    }

    pub fn unit_of_vehicle(&self, vehicle: &Vehicle) -> Option<&Unit> {
        self.resident_of_vehicle(vehicle)
            .and_then(|resident| self.units.get(&resident.unit_id))
    }

    pub fn building_of_vehicle(&self, vehicle: &Vehicle) -> Option<&BuildingId> {
        self.unit_of_vehicle(vehicle).map(|unit| &unit.building_id)
    }

    pub fn building_of_resident(&self, resident: &ResidentId) -> Option<&BuildingId> {
        self.residents
            .get(resident)
            .and_then(|resident| self.units.get(&resident.unit_id))
            .map(|unit| &unit.building_id)
    }

    pub fn spot(&self, id: &ParkingSpotId) -> Option<&ParkingSpot> {
        self.spots.get(id)
    }

    pub fn spots_of(&self, building: &BuildingId) -> impl Iterator<Item = &ParkingSpot> {
        self.spots_by_building
            .get(building)
            .into_iter()
            .flatten()
            .filter_map(|id| self.spots.get(id))
    }

    /// Display name of the vehicle's spot: looked up by id, falling back to
    /// the cached name for vehicles that could not be linked.
    pub fn spot_label<'a>(&'a self, vehicle: &'a Vehicle) -> Option<&'a str> {
        match &vehicle.parking_spot_id {
            Some(id) => self.spots.get(id).map(|spot| spot.name.as_str()),
            None => vehicle.parking_spot.as_deref(),
        }
    }

    pub fn guest_visit(&self, id: &GuestVisitId) -> Option<&GuestVisit> {
        self.guest_visits.get(id)
    }

    pub fn guest_visits(&self) -> impl Iterator<Item = &GuestVisit> {
        self.guest_visits.values()
    }

    /// Host building of a guest visit, if it was registered against a unit.
    pub fn building_of_guest(&self, visit: &GuestVisit) -> Option<&BuildingId> {
        visit
            .unit_id
            .as_ref()
            .and_then(|id| self.units.get(id))
            .map(|unit| &unit.building_id)
    }

    pub fn request(&self, id: &RequestId) -> Option<&CommunityRequest> {
        self.requests.get(id)
    }

    pub fn requests_of(&self, building: &BuildingId) -> impl Iterator<Item = &CommunityRequest> {
        self.requests
            .values()
            .filter(move |request| &request.building_id == building)
    }

    /// Apply `update` to one vehicle in place, then refresh its cached spot
    /// name from the structural reference.
    pub fn update_vehicle(
        &mut self,
        id: &VehicleId,
        update: impl FnOnce(&mut Vehicle),
    ) -> Result<()> {
        let vehicle = self
            .vehicles
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownVehicle(id.clone()))?;
        update(vehicle);
        if let Some(spot) = vehicle
            .parking_spot_id
            .as_ref()
            .and_then(|spot_id| self.spots.get(spot_id))
        {
            vehicle.parking_spot = Some(spot.name.clone());
        }
        Ok(())
    }

    pub fn update_guest_visit(
        &mut self,
        id: &GuestVisitId,
        update: impl FnOnce(&mut GuestVisit),
    ) -> Result<()> {
        let visit = self
            .guest_visits
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownGuestVisit(id.clone()))?;
        update(visit);
        Ok(())
    }

    pub fn insert_vehicle(&mut self, vehicle: Vehicle) -> Result<()> {
        if self.vehicles.contains_key(&vehicle.id) {
            return Err(ModelError::DuplicateId(vehicle.id.to_string()));
        }
        let resident_id = match &vehicle.resident_id {
            Some(id) if self.residents.contains_key(id) => id.clone(),
            Some(id) => return Err(ModelError::UnknownResident(id.clone())),
            None => return Err(ModelError::UnknownResident(ResidentId::new(""))),
        };
        let vehicle_id = vehicle.id.clone();
        self.vehicles.insert(vehicle_id.clone(), vehicle);
        self.vehicles_by_resident
            .entry(resident_id)
            .or_default()
            .push(vehicle_id);
        Ok(())
    }

    pub fn remove_vehicle(&mut self, id: &VehicleId) -> Result<Vehicle> {
        let vehicle = self
            .vehicles
            .shift_remove(id)
            .ok_or_else(|| ModelError::UnknownVehicle(id.clone()))?;
        if let Some(list) = vehicle
            .resident_id
            .as_ref()
            .and_then(|resident| self.vehicles_by_resident.get_mut(resident))
        {
            list.retain(|entry| entry != id);
        }
        Ok(vehicle)
    }

    pub fn remove_guest_visit(&mut self, id: &GuestVisitId) -> Result<GuestVisit> {
        self.guest_visits
            .shift_remove(id)
            .ok_or_else(|| ModelError::UnknownGuestVisit(id.clone()))
    }

    pub fn insert_spot(&mut self, spot: ParkingSpot) -> Result<()> {
        if !self.buildings.contains_key(&spot.building_id) {
            return Err(ModelError::UnknownBuilding(spot.building_id.clone()));
        }
        if self.spots.contains_key(&spot.id) {
            return Err(ModelError::DuplicateId(spot.id.to_string()));
        }
        let spot_id = spot.id.clone();
        self.spots_by_building
            .entry(spot.building_id.clone())
            .or_default()
            .push(spot_id.clone());
        self.spots.insert(spot_id, spot);
        Ok(())
    }

    /// Rename a spot; linked vehicles pick up the new display name.
    pub fn rename_spot(&mut self, id: &ParkingSpotId, name: String) -> Result<()> {
        let spot = self
            .spots
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownSpot(id.clone()))?;
        spot.name = name;
        for vehicle in self.vehicles.values_mut() {
            if vehicle.parking_spot_id.as_ref() == Some(id) {
                vehicle.parking_spot = Some(spot.name.clone());
            }
        }
        Ok(())
    }
}

fn insert_unique<K, V>(map: &mut IndexMap<K, V>, kind: &str, id: K, value: V) -> bool
where
    K: Hash + Eq + Display,
{
    if map.contains_key(&id) {
        warn!(%id, "duplicate {kind} id in snapshot; keeping the first");
        return false;
    }
    map.insert(id, value);
    true
}

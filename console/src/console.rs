use crate::config::ConsoleConfig;
use crate::debounce::Debouncer;
use crate::error::ParkingError;
use crate::fetch::FetchError;
use crate::fetch::FetchState;
use crate::filter::Derived;
use crate::filter::FilterPipeline;
use crate::filter::FilterValue;
use crate::filter::PipelineControls;
use crate::notify::Notice;
use crate::notify::Notifier;
use crate::parking;
use crate::parking::Assignment;
use crate::parking::SpotOccupancy;
use crate::parking::Unassignment;
use crate::parking::UnifiedVehicle;
use crate::parking::VehicleRef;
use crate::selection::BuildingSelectionMode;
use crate::selection::SelectionCoordinator;
use crate::stats;
use crate::stats::ParkingStats;
use crate::stats::UnitStats;
use crate::views::ConsoleTab;
use crate::views::RequestDimension;
use crate::views::RequestRow;
use crate::views::RequestSort;
use crate::views::ResidentDimension;
use crate::views::ResidentRow;
use crate::views::ResidentSort;
use crate::views::UnitDimension;
use crate::views::UnitRow;
use crate::views::UnitSort;
use crate::views::VehicleDimension;
use crate::views::VehicleSort;
use crate::views::request_rows;
use crate::views::resident_rows;
use crate::views::scope_buildings;
use crate::views::unit_rows;
use estate_model::BuildingId;
use estate_model::EntityGraph;
use estate_model::ParkingSpotId;
use estate_model::ResidentId;
use estate_model::SiteId;
use estate_model::Snapshot;
use estate_model::VehicleId;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::unbounded_channel;
use tracing::debug;
use tracing::warn;

/// Events the console posts to itself; feed them back through
/// [`PropertyConsole::handle_event`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleEvent {
    SearchCommitted { tab: ConsoleTab, text: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterChange {
    Residents(ResidentDimension, FilterValue),
    Units(UnitDimension, FilterValue),
    Vehicles(VehicleDimension, FilterValue),
    Requests(RequestDimension, FilterValue),
}

impl FilterChange {
    /// Parse a `dimension` / `value` pair for `tab`. Unknown dimensions
    /// yield `None`.
    pub fn parse(tab: ConsoleTab, dimension: &str, value: &str) -> Option<Self> {
        let value = FilterValue::parse(value);
        let change = match tab {
            ConsoleTab::Residents => {
                FilterChange::Residents(ResidentDimension::from_str(dimension).ok()?, value)
            }
            ConsoleTab::Units => {
                FilterChange::Units(UnitDimension::from_str(dimension).ok()?, value)
            }
            ConsoleTab::Vehicles => {
                FilterChange::Vehicles(VehicleDimension::from_str(dimension).ok()?, value)
            }
            ConsoleTab::Requests => {
                FilterChange::Requests(RequestDimension::from_str(dimension).ok()?, value)
            }
        };
        Some(change)
    }

    pub fn tab(&self) -> ConsoleTab {
        match self {
            FilterChange::Residents(..) => ConsoleTab::Residents,
            FilterChange::Units(..) => ConsoleTab::Units,
            FilterChange::Vehicles(..) => ConsoleTab::Vehicles,
            FilterChange::Requests(..) => ConsoleTab::Requests,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortChange {
    Residents(ResidentSort),
    Units(UnitSort),
    Vehicles(VehicleSort),
    Requests(RequestSort),
}

impl SortChange {
    pub fn parse(tab: ConsoleTab, field: &str) -> Option<Self> {
        let change = match tab {
            ConsoleTab::Residents => SortChange::Residents(ResidentSort::from_str(field).ok()?),
            ConsoleTab::Units => SortChange::Units(UnitSort::from_str(field).ok()?),
            ConsoleTab::Vehicles => SortChange::Vehicles(VehicleSort::from_str(field).ok()?),
            ConsoleTab::Requests => SortChange::Requests(RequestSort::from_str(field).ok()?),
        };
        Some(change)
    }
}

/// Coordinates selection, the per-tab pipelines, parking mutations and
/// stats over one entity graph.
///
/// Every derived value is recomputed from current state on each call. The
/// only asynchronous piece is the search debounce, whose commits arrive as
/// [`ConsoleEvent`]s on the receiver returned by [`PropertyConsole::new`].
pub struct PropertyConsole {
    config: ConsoleConfig,
    graph: EntityGraph,
    is_loading: bool,
    fetch_error: Option<FetchError>,
    site_chosen: bool,
    selection: SelectionCoordinator<SiteId, BuildingId>,
    tab: ConsoleTab,
    residents: FilterPipeline<ResidentDimension, ResidentSort>,
    units: FilterPipeline<UnitDimension, UnitSort>,
    vehicles: FilterPipeline<VehicleDimension, VehicleSort>,
    requests: FilterPipeline<RequestDimension, RequestSort>,
    search_debounce: Debouncer<ConsoleEvent>,
    notifier: Arc<dyn Notifier>,
}

impl PropertyConsole {
    pub fn new(
        config: ConsoleConfig,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, UnboundedReceiver<ConsoleEvent>) {
        let (tx, rx) = unbounded_channel();
        let console = Self {
            graph: EntityGraph::default(),
            is_loading: false,
            fetch_error: None,
            site_chosen: false,
            selection: SelectionCoordinator::new(),
            tab: ConsoleTab::default(),
            residents: FilterPipeline::from_config(&config),
            units: FilterPipeline::from_config(&config),
            vehicles: FilterPipeline::from_config(&config),
            requests: FilterPipeline::from_config(&config),
            search_debounce: Debouncer::new(config.search_debounce(), tx),
            notifier,
            config,
        };
        (console, rx)
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    pub fn snapshot(&self) -> Snapshot {
        self.graph.to_snapshot()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Upstream fetch error, exactly as the collaborator reported it.
    pub fn fetch_error(&self) -> Option<&FetchError> {
        self.fetch_error.as_ref()
    }

    /// Take in a fetch result. New data replaces the graph; a missing site
    /// selection defaults to the first site until the user picks one.
    pub fn apply_fetch(&mut self, state: &FetchState<Snapshot>) {
        self.is_loading = state.is_loading;
        self.fetch_error = state.error.clone();
        let Some(snapshot) = &state.data else {
            return;
        };

        self.graph = EntityGraph::from_snapshot(snapshot.clone());
        if !self.site_chosen && self.selection.active_site().is_none() {
            let first = self.graph.sites().next().map(|site| site.id.clone());
            if first.is_some() {
                self.selection.set_active_site(first);
                self.reset_pages();
            }
        }
        self.reconcile();
    }

    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        self.apply_fetch(&FetchState::ready(snapshot));
    }

    pub fn active_site_id(&self) -> Option<&SiteId> {
        self.selection.active_site()
    }

    pub fn active_building_id(&self) -> Option<&BuildingId> {
        self.selection.active_building()
    }

    pub fn selection_mode(&self) -> BuildingSelectionMode {
        self.selection.mode()
    }

    pub fn set_active_site(&mut self, site: Option<SiteId>) {
        self.site_chosen = true;
        if self.selection.active_site() == site.as_ref() {
            return;
        }
        self.selection.set_active_site(site);
        self.reset_pages();
        self.reconcile();
    }

    /// `None` asks for every building of the site. An id outside the active
    /// site is healed right away.
    pub fn set_active_building(&mut self, building: Option<BuildingId>) {
        let changed = self.selection.active_building() != building.as_ref();
        self.selection.set_active_building(building);
        if changed {
            self.reset_pages();
        }
        self.reconcile();
    }

    fn reconcile(&mut self) {
        let candidates: Vec<BuildingId> = match self.selection.active_site() {
            Some(site) => self
                .graph
                .buildings_of_site(site)
                .map(|building| building.id.clone())
                .collect(),
            None => Vec::new(),
        };
        let outcome = self.selection.reconcile(&candidates);
        debug!(?outcome, "building selection reconciled");
        if outcome.changed_building() {
            self.reset_pages();
        }
    }

    fn reset_pages(&mut self) {
        self.residents.reset_page();
        self.units.reset_page();
        self.vehicles.reset_page();
        self.requests.reset_page();
    }

    /// Buildings the views currently cover.
    pub fn scope(&self) -> Vec<BuildingId> {
        scope_buildings(
            &self.graph,
            self.selection.active_site(),
            self.selection.active_building(),
        )
    }

    pub fn tab(&self) -> ConsoleTab {
        self.tab
    }

    /// Switch tabs. A search still waiting on the debounce is committed to
    /// the tab it was typed in.
    pub fn set_tab(&mut self, tab: ConsoleTab) {
        if self.tab == tab {
            return;
        }
        if self.search_debounce.cancel() {
            let pipeline = self.pipeline_mut(self.tab);
            let text = pipeline.raw_search_text().to_string();
            pipeline.commit_search(text);
        }
        self.tab = tab;
        self.reset_pages();
    }

    fn pipeline(&self, tab: ConsoleTab) -> &dyn PipelineControls {
        match tab {
            ConsoleTab::Residents => &self.residents,
            ConsoleTab::Units => &self.units,
            ConsoleTab::Vehicles => &self.vehicles,
            ConsoleTab::Requests => &self.requests,
        }
    }

    fn pipeline_mut(&mut self, tab: ConsoleTab) -> &mut dyn PipelineControls {
        match tab {
            ConsoleTab::Residents => &mut self.residents,
            ConsoleTab::Units => &mut self.units,
            ConsoleTab::Vehicles => &mut self.vehicles,
            ConsoleTab::Requests => &mut self.requests,
        }
    }

    pub fn residents(&self) -> &FilterPipeline<ResidentDimension, ResidentSort> {
        &self.residents
    }

    pub fn units(&self) -> &FilterPipeline<UnitDimension, UnitSort> {
        &self.units
    }

    pub fn vehicles(&self) -> &FilterPipeline<VehicleDimension, VehicleSort> {
        &self.vehicles
    }

    pub fn requests(&self) -> &FilterPipeline<RequestDimension, RequestSort> {
        &self.requests
    }

    pub fn search_text(&self) -> &str {
        self.pipeline(self.tab).raw_search_text()
    }

    pub fn effective_search_text(&self) -> Option<&str> {
        self.pipeline(self.tab).effective_search_text()
    }

    /// Echo `text` on the active tab and restart the debounce timer.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        let tab = self.tab;
        self.pipeline_mut(tab).set_search_text(text.clone());
        debug!(
            %tab,
            delay = ?self.search_debounce.delay(),
            "search commit scheduled"
        );
        self.search_debounce
            .schedule(ConsoleEvent::SearchCommitted { tab, text });
    }

    /// Commit the active tab's raw search text now.
    pub fn flush_search(&mut self) {
        self.search_debounce.cancel();
        let pipeline = self.pipeline_mut(self.tab);
        let text = pipeline.raw_search_text().to_string();
        pipeline.commit_search(text);
    }

    pub fn handle_event(&mut self, event: ConsoleEvent) {
        match event {
            ConsoleEvent::SearchCommitted { tab, text } => {
                let pipeline = self.pipeline_mut(tab);
                // A later keystroke or flush has superseded this commit.
                if pipeline.raw_search_text() != text {
                    debug!(%tab, "stale search commit ignored");
                    return;
                }
                if pipeline.commit_search(text) {
                    debug!(%tab, "search committed; page reset");
                }
            }
        }
    }

    pub fn set_filter(&mut self, change: FilterChange) {
        match change {
            FilterChange::Residents(dimension, value) => {
                self.residents.set_filter(dimension, value)
            }
            FilterChange::Units(dimension, value) => self.units.set_filter(dimension, value),
            FilterChange::Vehicles(dimension, value) => self.vehicles.set_filter(dimension, value),
            FilterChange::Requests(dimension, value) => self.requests.set_filter(dimension, value),
        }
    }

    pub fn toggle_sort(&mut self, change: SortChange) {
        match change {
            SortChange::Residents(field) => self.residents.toggle_sort(field),
            SortChange::Units(field) => self.units.toggle_sort(field),
            SortChange::Vehicles(field) => self.vehicles.toggle_sort(field),
            SortChange::Requests(field) => self.requests.toggle_sort(field),
        }
    }

    pub fn current_page(&self) -> usize {
        self.pipeline(self.tab).current_page()
    }

    pub fn set_page(&mut self, page: usize) {
        let tab = self.tab;
        self.pipeline_mut(tab).set_page(page);
    }

    pub fn resident_view(&self) -> Derived<ResidentRow<'_>> {
        self.residents
            .derive(resident_rows(&self.graph, &self.scope()))
    }

    pub fn unit_view(&self) -> Derived<UnitRow<'_>> {
        self.units.derive(unit_rows(&self.graph, &self.scope()))
    }

    pub fn vehicle_view(&self) -> Derived<UnifiedVehicle<'_>> {
        self.vehicles.derive(parking::build_unified_vehicle_list(
            &self.graph,
            &self.scope(),
            None,
        ))
    }

    pub fn request_view(&self) -> Derived<RequestRow<'_>> {
        self.requests
            .derive(request_rows(&self.graph, &self.scope()))
    }

    /// Resident vehicles in scope plus present guests, optionally searched.
    pub fn unified_vehicles(&self, search: Option<&str>) -> Vec<UnifiedVehicle<'_>> {
        parking::build_unified_vehicle_list(&self.graph, &self.scope(), search)
    }

    pub fn unit_stats(&self) -> UnitStats {
        self.scope()
            .iter()
            .map(|building| stats::unit_stats(&self.graph, building))
            .sum()
    }

    pub fn parking_stats(&self) -> ParkingStats {
        stats::parking_stats_for(&self.graph, &self.scope(), self.config.guest_count_scope)
    }

    pub fn occupancy(&self) -> Vec<SpotOccupancy<'_>> {
        self.scope()
            .iter()
            .flat_map(|building| parking::compute_occupancy(&self.graph, building))
            .collect()
    }

    pub fn assign_vehicle_to_spot(
        &mut self,
        spot: &ParkingSpotId,
        vehicle: &str,
    ) -> Option<Assignment> {
        let outcome = parking::assign_vehicle_to_spot(&mut self.graph, spot, vehicle);
        self.report(outcome, |assignment| {
            Notice::success(format!("{vehicle} assigned to spot {}", assignment.spot_name))
        })
    }

    pub fn unassign_vehicle(&mut self, vehicle: &str) -> Option<Unassignment> {
        let outcome = parking::unassign_vehicle(&mut self.graph, vehicle);
        self.report(outcome, |unassignment| match &unassignment.released_spot {
            Some(spot) => Notice::success(format!("{vehicle} released spot {spot}")),
            None => Notice::warning(format!("{vehicle} had no spot")),
        })
    }

    pub fn delete_vehicle(&mut self, vehicle: &str) -> Option<VehicleRef> {
        let outcome = parking::delete_vehicle(&mut self.graph, vehicle);
        self.report(outcome, |_| Notice::success(format!("{vehicle} deleted")))
    }

    pub fn add_parking_spot(
        &mut self,
        building: &BuildingId,
        floor: i32,
        name: &str,
    ) -> Option<ParkingSpotId> {
        let outcome = parking::add_parking_spot(&mut self.graph, building, floor, name);
        self.report(outcome, |_| {
            Notice::success(format!("spot {} added", name.trim()))
        })
    }

    pub fn rename_parking_spot(&mut self, spot: &ParkingSpotId, name: &str) -> bool {
        let outcome = parking::rename_parking_spot(&mut self.graph, spot, name);
        self.report(outcome, |_| {
            Notice::success(format!("spot renamed to {}", name.trim()))
        })
        .is_some()
    }

    pub fn add_vehicle(
        &mut self,
        resident: &ResidentId,
        plate: &str,
        model: &str,
    ) -> Option<VehicleId> {
        let outcome = parking::add_vehicle(&mut self.graph, resident, plate, model);
        self.report(outcome, |_| {
            Notice::success(format!("vehicle {} added", plate.trim()))
        })
    }

    fn report<T>(
        &self,
        outcome: Result<T, ParkingError>,
        applied: impl FnOnce(&T) -> Notice,
    ) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.notifier.notify(applied(&value));
                Some(value)
            }
            Err(err) => {
                warn!("parking change refused: {err}");
                self.notifier.notify(Notice::error(err.to_string()));
                None
            }
        }
    }

    /// Cancel the pending debounce; nothing is committed afterwards.
    pub fn shutdown(&mut self) {
        if self.search_debounce.cancel() {
            debug!("pending search commit cancelled");
        }
    }
}

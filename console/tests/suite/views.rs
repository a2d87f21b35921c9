use super::harness;
use super::harness_with;
use estate_console::ConsoleConfig;
use estate_console::ConsoleTab;
use estate_console::FilterChange;
use estate_console::SortChange;
use estate_console::views::UnitSort;
use pretty_assertions::assert_eq;

#[test]
fn filter_change_resets_the_page() {
    let mut harness = harness();
    let console = &mut harness.console;
    console.set_page(2);
    let change = FilterChange::parse(ConsoleTab::Residents, "type", "owner").expect("dimension");
    console.set_filter(change);
    assert_eq!(console.current_page(), 1);

    let names: Vec<String> = console
        .resident_view()
        .filtered()
        .iter()
        .map(|row| row.resident.name.clone())
        .collect();
    assert_eq!(names, vec!["Ana Lima"]);

    // "all" lifts the predicate again.
    console.set_page(2);
    let change = FilterChange::parse(ConsoleTab::Residents, "type", "ALL").expect("dimension");
    console.set_filter(change);
    assert_eq!(console.current_page(), 1);
    assert_eq!(console.resident_view().filtered().len(), 2);
}

#[test]
fn units_sort_toggles_direction() {
    let mut harness = harness();
    let console = &mut harness.console;
    console.set_tab(ConsoleTab::Units);
    console.toggle_sort(SortChange::Units(UnitSort::Number));
    console.toggle_sort(SortChange::Units(UnitSort::Number));

    let numbers: Vec<String> = console
        .unit_view()
        .filtered()
        .iter()
        .map(|row| row.unit.number.clone())
        .collect();
    assert_eq!(numbers, vec!["201", "102", "101"]);
}

#[test]
fn all_buildings_scope_covers_the_site() {
    let mut harness = harness();
    let console = &mut harness.console;
    console.set_active_building(None);
    assert_eq!(console.resident_view().filtered().len(), 3);
    assert_eq!(console.unit_view().filtered().len(), 4);
    assert_eq!(console.request_view().filtered().len(), 4);
}

#[test]
fn requests_filter_by_status_and_sort_by_date() {
    let mut harness = harness();
    let console = &mut harness.console;
    console.set_tab(ConsoleTab::Requests);
    console.toggle_sort(SortChange::parse(ConsoleTab::Requests, "created").expect("field"));
    let ids: Vec<String> = console
        .request_view()
        .filtered()
        .iter()
        .map(|row| row.request.id.to_string())
        .collect();
    assert_eq!(ids, vec!["rq3", "rq2", "rq1"]);

    console.set_filter(
        FilterChange::parse(ConsoleTab::Requests, "status", "in_progress").expect("dimension"),
    );
    let ids: Vec<String> = console
        .request_view()
        .filtered()
        .iter()
        .map(|row| row.request.id.to_string())
        .collect();
    assert_eq!(ids, vec!["rq1"]);
}

#[test]
fn pages_are_clamped_to_the_filtered_rows() {
    let config = ConsoleConfig {
        page_size: 2,
        ..ConsoleConfig::default()
    };
    let mut harness = harness_with(config);
    let console = &mut harness.console;
    console.set_tab(ConsoleTab::Vehicles);
    console.set_page(9);

    let view = console.vehicle_view();
    let page = view.page();
    assert_eq!(page.total_items, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 3);
    let plates: Vec<&str> = view.paginated().iter().map(|row| row.plate).collect();
    assert_eq!(plates, vec!["GST-2"]);
}

#[test]
fn vehicle_holder_filter_separates_guests() {
    let mut harness = harness();
    let console = &mut harness.console;
    console.set_filter(
        FilterChange::parse(ConsoleTab::Vehicles, "holder", "resident").expect("dimension"),
    );
    let plates: Vec<String> = console
        .vehicle_view()
        .filtered()
        .iter()
        .map(|row| row.plate.to_string())
        .collect();
    assert_eq!(plates, vec!["ABC-123", "KLM-77"]);
}

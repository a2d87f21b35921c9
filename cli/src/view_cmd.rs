use crate::render::Output;
use anyhow::Result;
use anyhow::anyhow;
use clap::ArgAction;
use clap::Args;
use estate_console::ConsoleTab;
use estate_console::FilterChange;
use estate_console::PropertyConsole;
use estate_console::SortChange;

#[derive(Debug, Clone, Default, Args)]
pub struct ViewArgs {
    /// Search text; applied when it has at least the configured number of
    /// characters.
    #[arg(long = "search", value_name = "TEXT")]
    pub search: Option<String>,

    /// Categorical filter such as `type=owner` (repeatable).
    #[arg(long = "filter", value_name = "DIM=VALUE", action = ArgAction::Append)]
    pub filters: Vec<String>,

    /// Sort field (repeatable; naming the same field again flips direction).
    #[arg(long = "sort", value_name = "FIELD", action = ArgAction::Append)]
    pub sorts: Vec<String>,

    /// 1-based page, clamped to the available pages.
    #[arg(long = "page", default_value_t = 1)]
    pub page: usize,
}

pub(crate) fn run(
    console: &mut PropertyConsole,
    tab: ConsoleTab,
    args: &ViewArgs,
    output: &Output,
) -> Result<()> {
    console.set_tab(tab);
    apply(console, tab, args)?;

    match tab {
        ConsoleTab::Residents => output.page(tab, &console.resident_view(), |row| {
            format!(
                "{:<20} unit {:<5} floor {:<3} {:<7} vehicles {}",
                row.resident.name,
                row.unit.number,
                row.unit.floor,
                row.resident.kind.to_string(),
                row.vehicle_count
            )
        }),
        ConsoleTab::Units => output.page(tab, &console.unit_view(), |row| {
            format!(
                "{:<6} floor {:<3} {:<8} residents {}",
                row.unit.number,
                row.unit.floor,
                row.status.to_string(),
                row.resident_count
            )
        }),
        ConsoleTab::Vehicles => output.page(tab, &console.vehicle_view(), |row| {
            let holder = if row.is_guest { "guest" } else { "resident" };
            format!(
                "{:<10} {:<20} {:<8} unit {:<5} spot {}",
                row.plate,
                row.holder_name,
                holder,
                row.unit_number.unwrap_or("-"),
                row.parking_spot.unwrap_or("-")
            )
        }),
        ConsoleTab::Requests => output.page(tab, &console.request_view(), |row| {
            format!(
                "{:<6} {:<11} {:<11} {} (unit {})",
                row.request.id.as_str(),
                row.request.status.to_string(),
                row.request.kind.to_string(),
                row.request.title,
                row.unit_number.unwrap_or("-")
            )
        }),
    }
}

/// Search and filters reset the page, so the page goes last.
fn apply(console: &mut PropertyConsole, tab: ConsoleTab, args: &ViewArgs) -> Result<()> {
    if let Some(search) = &args.search {
        console.set_search_text(search.as_str());
        console.flush_search();
    }

    for raw in &args.filters {
        let (dimension, value) = raw
            .split_once('=')
            .ok_or_else(|| anyhow!("filter must look like DIM=VALUE, got `{raw}`"))?;
        let change = FilterChange::parse(tab, dimension.trim(), value)
            .ok_or_else(|| anyhow!("unknown {tab} filter dimension `{dimension}`"))?;
        console.set_filter(change);
    }

    for field in &args.sorts {
        let change = SortChange::parse(tab, field.trim())
            .ok_or_else(|| anyhow!("unknown {tab} sort field `{field}`"))?;
        console.toggle_sort(change);
    }

    console.set_page(args.page);
    Ok(())
}

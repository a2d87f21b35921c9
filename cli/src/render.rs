use anyhow::Result;
use estate_console::ConsoleTab;
use estate_console::Derived;
use estate_console::Notice;
use estate_console::NoticeLevel;
use estate_console::PageWindow;
use estate_console::ParkingStats;
use estate_console::UnitStats;
use estate_console::parking::SpotOccupancy;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;

#[derive(Serialize)]
struct PageOutput<'a, T> {
    tab: ConsoleTab,
    page: PageWindow,
    rows: &'a [T],
}

#[derive(Serialize)]
struct StatsOutput<'a> {
    units: &'a UnitStats,
    parking: &'a ParkingStats,
}

/// Text or JSON on stdout; notices on stderr.
pub(crate) struct Output {
    json: bool,
    color: bool,
}

impl Output {
    pub(crate) fn new(json: bool) -> Self {
        Self {
            json,
            color: std::io::stdout().is_terminal(),
        }
    }

    fn emit_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn stats(&self, units: &UnitStats, parking: &ParkingStats) -> Result<()> {
        if self.json {
            return self.emit_json(&StatsOutput { units, parking });
        }
        println!(
            "{}  total {}  occupied {}  empty {}",
            self.heading("units  "),
            units.total,
            units.occupied,
            units.empty
        );
        println!(
            "{}  spots {}  occupied {}  available {}  rate {}%  guests {}",
            self.heading("parking"),
            parking.total_spots,
            parking.occupied_spots,
            parking.available_spots,
            parking.occupancy_rate,
            parking.guest_vehicles
        );
        Ok(())
    }

    pub(crate) fn page<T: Serialize>(
        &self,
        tab: ConsoleTab,
        view: &Derived<T>,
        line: impl Fn(&T) -> String,
    ) -> Result<()> {
        let page = view.page();
        if self.json {
            return self.emit_json(&PageOutput {
                tab,
                page,
                rows: view.paginated(),
            });
        }
        println!(
            "{}",
            self.heading(&format!(
                "{tab}: page {} of {} ({} rows)",
                page.page, page.total_pages, page.total_items
            ))
        );
        if view.paginated().is_empty() {
            println!("  (no rows)");
        }
        for row in view.paginated() {
            println!("  {}", line(row));
        }
        let nav: Vec<String> = [
            page.has_previous().then(|| format!("previous --page {}", page.page - 1)),
            page.has_next().then(|| format!("next --page {}", page.page + 1)),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !nav.is_empty() {
            println!("  ({})", nav.join(", "));
        }
        Ok(())
    }

    pub(crate) fn occupancy(&self, spots: &[SpotOccupancy<'_>]) -> Result<()> {
        if self.json {
            return self.emit_json(&spots);
        }
        println!("{}", self.heading(&format!("{} spots", spots.len())));
        for entry in spots {
            let state = match (&entry.holder, &entry.guest) {
                (Some(holder), _) => format!("{} (resident)", holder.plate),
                (None, Some(guest)) => format!("{} (guest)", guest.plate),
                (None, None) => "free".to_string(),
            };
            println!(
                "  {:<8} floor {:<3} {}",
                entry.spot.name, entry.spot.floor, state
            );
        }
        Ok(())
    }

    pub(crate) fn notice(&self, notice: &Notice) {
        let color = std::io::stderr().is_terminal();
        let marker = match (notice.level, color) {
            (NoticeLevel::Success, true) => "ok".green().to_string(),
            (NoticeLevel::Warning, true) => "warning".yellow().to_string(),
            (NoticeLevel::Error, true) => "error".red().to_string(),
            (level, false) => level.to_string(),
        };
        eprintln!("{marker}: {}", notice.message);
    }
}

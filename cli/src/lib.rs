//! `estate`: drive the property console over a snapshot file.

mod parking_cmd;
mod render;
mod view_cmd;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap::Subcommand;
use estate_console::CollectionFetcher;
use estate_console::ConsoleConfig;
use estate_console::ConsoleTab;
use estate_console::FetchState;
use estate_console::JsonFileFetcher;
use estate_console::PropertyConsole;
use estate_console::RecordingNotifier;
use estate_console::fetch::Collection;
use estate_model::BuildingId;
use estate_model::SiteId;
use estate_model::Snapshot;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub use parking_cmd::AssignArgs;
pub use parking_cmd::UnassignArgs;
pub use view_cmd::ViewArgs;

use crate::render::Output;

#[derive(Debug, Parser)]
#[command(name = "estate", version, about = "Inspect and edit a property snapshot")]
pub struct Cli {
    /// Snapshot JSON file.
    #[arg(long = "snapshot", value_name = "PATH")]
    pub snapshot: PathBuf,

    /// Console configuration (TOML). Defaults apply when omitted.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Active site; the first site of the snapshot when omitted.
    #[arg(long = "site", value_name = "ID")]
    pub site: Option<String>,

    /// Active building within the site.
    #[arg(long = "building", value_name = "ID", conflicts_with = "all_buildings")]
    pub building: Option<String>,

    /// Cover every building of the active site.
    #[arg(long = "all-buildings")]
    pub all_buildings: bool,

    /// Print JSON instead of text.
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Log at debug level.
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Unit and parking statistics of the active selection.
    Stats,
    /// One page of the residents tab.
    Residents(ViewArgs),
    /// One page of the units tab.
    Units(ViewArgs),
    /// One page of the vehicles tab (resident vehicles and present guests).
    Vehicles(ViewArgs),
    /// One page of the community requests tab.
    Requests(ViewArgs),
    /// Per-spot occupancy of the active selection.
    Occupancy,
    /// Assign a vehicle or guest visit to a parking spot.
    Assign(AssignArgs),
    /// Release the spot of a vehicle or guest visit.
    Unassign(UnassignArgs),
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` wins unless
/// `--verbose` is given.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let notifier = Arc::new(RecordingNotifier::new());
    let (mut console, _events) = PropertyConsole::new(config, notifier.clone());

    let state = fetch_snapshot(&cli.snapshot).await?;
    console.apply_fetch(&state);
    select(&mut console, &cli)?;

    let output = Output::new(cli.json);
    match &cli.command {
        Command::Stats => output.stats(&console.unit_stats(), &console.parking_stats()),
        Command::Residents(args) => {
            view_cmd::run(&mut console, ConsoleTab::Residents, args, &output)
        }
        Command::Units(args) => view_cmd::run(&mut console, ConsoleTab::Units, args, &output),
        Command::Vehicles(args) => view_cmd::run(&mut console, ConsoleTab::Vehicles, args, &output),
        Command::Requests(args) => view_cmd::run(&mut console, ConsoleTab::Requests, args, &output),
        Command::Occupancy => output.occupancy(&console.occupancy()),
        Command::Assign(args) => {
            parking_cmd::assign(&mut console, &notifier, &cli.snapshot, args, &output).await
        }
        Command::Unassign(args) => {
            parking_cmd::unassign(&mut console, &notifier, &cli.snapshot, args, &output).await
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ConsoleConfig> {
    match path {
        Some(path) => ConsoleConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ConsoleConfig::default()),
    }
}

async fn fetch_snapshot(path: &Path) -> Result<FetchState<Snapshot>> {
    let fetcher: Arc<dyn CollectionFetcher<PathBuf, Snapshot>> = Arc::new(JsonFileFetcher);
    let mut collection = Collection::new(fetcher, path.to_path_buf());
    let state = collection.refetch().await.clone();
    if let Some(err) = &state.error {
        return Err(anyhow::Error::new(err.clone())
            .context(format!("failed to load snapshot {}", path.display())));
    }
    Ok(state)
}

fn select(console: &mut PropertyConsole, cli: &Cli) -> Result<()> {
    if let Some(site) = &cli.site {
        let site = SiteId::from(site.as_str());
        if console.graph().site(&site).is_none() {
            bail!("unknown site: {site}");
        }
        console.set_active_site(Some(site));
    }

    if cli.all_buildings {
        console.set_active_building(None);
    } else if let Some(building) = &cli.building {
        let building = BuildingId::from(building.as_str());
        let in_site = console
            .graph()
            .building(&building)
            .is_some_and(|found| Some(&found.site_id) == console.active_site_id());
        if !in_site {
            bail!("building {building} is not part of the active site");
        }
        console.set_active_building(Some(building));
    }
    Ok(())
}

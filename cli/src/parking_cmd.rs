use crate::render::Output;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Args;
use estate_console::NoticeLevel;
use estate_console::PropertyConsole;
use estate_console::RecordingNotifier;
use estate_model::ParkingSpotId;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Args)]
pub struct AssignArgs {
    /// Parking spot id.
    #[arg(long = "spot", value_name = "ID")]
    pub spot: String,

    /// Resident vehicle id or guest visit id.
    #[arg(long = "vehicle", value_name = "ID")]
    pub vehicle: String,

    /// Save the updated snapshot back to the snapshot file.
    #[arg(long = "write")]
    pub write: bool,
}

#[derive(Debug, Clone, Args)]
pub struct UnassignArgs {
    /// Resident vehicle id or guest visit id.
    #[arg(long = "vehicle", value_name = "ID")]
    pub vehicle: String,

    /// Save the updated snapshot back to the snapshot file.
    #[arg(long = "write")]
    pub write: bool,
}

pub(crate) async fn assign(
    console: &mut PropertyConsole,
    notifier: &RecordingNotifier,
    snapshot: &Path,
    args: &AssignArgs,
    output: &Output,
) -> Result<()> {
    let spot = ParkingSpotId::from(args.spot.as_str());
    let applied = console.assign_vehicle_to_spot(&spot, &args.vehicle).is_some();
    finish(console, notifier, snapshot, applied, args.write, output).await
}

pub(crate) async fn unassign(
    console: &mut PropertyConsole,
    notifier: &RecordingNotifier,
    snapshot: &Path,
    args: &UnassignArgs,
    output: &Output,
) -> Result<()> {
    let applied = console.unassign_vehicle(&args.vehicle).is_some();
    finish(console, notifier, snapshot, applied, args.write, output).await
}

/// Report notices, fail on refusal, optionally persist, then show occupancy.
async fn finish(
    console: &PropertyConsole,
    notifier: &RecordingNotifier,
    snapshot: &Path,
    applied: bool,
    write: bool,
    output: &Output,
) -> Result<()> {
    let notices = notifier.take();
    for notice in &notices {
        output.notice(notice);
    }
    if !applied {
        let reason = notices
            .iter()
            .rev()
            .find(|notice| notice.level == NoticeLevel::Error)
            .map_or("parking change refused", |notice| notice.message.as_str());
        bail!("{reason}");
    }

    if write {
        let rendered = serde_json::to_string_pretty(&console.snapshot())?;
        tokio::fs::write(snapshot, rendered)
            .await
            .with_context(|| format!("failed to write snapshot {}", snapshot.display()))?;
        info!(path = %snapshot.display(), "snapshot written");
    }

    output.occupancy(&console.occupancy())
}

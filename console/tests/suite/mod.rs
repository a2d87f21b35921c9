use estate_console::ConsoleConfig;
use estate_console::ConsoleEvent;
use estate_console::PropertyConsole;
use estate_console::RecordingNotifier;
use estate_model::Snapshot;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

mod parking;
mod search;
mod selection;
mod stats;
mod views;

const FIXTURE: &str = include_str!("../fixtures/estate.json");

pub(crate) struct Harness {
    pub console: PropertyConsole,
    pub notifier: Arc<RecordingNotifier>,
    pub events: UnboundedReceiver<ConsoleEvent>,
}

pub(crate) fn snapshot() -> Snapshot {
    serde_json::from_str(FIXTURE).expect("fixture snapshot")
}

pub(crate) fn harness_with(config: ConsoleConfig) -> Harness {
    let notifier = Arc::new(RecordingNotifier::new());
    let (mut console, events) = PropertyConsole::new(config, notifier.clone());
    console.load_snapshot(snapshot());
    Harness {
        console,
        notifier,
        events,
    }
}

pub(crate) fn harness() -> Harness {
    harness_with(ConsoleConfig::default())
}

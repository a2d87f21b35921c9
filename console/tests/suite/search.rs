use super::Harness;
use super::harness;
use estate_console::ConsoleEvent;
use estate_console::ConsoleTab;
use pretty_assertions::assert_eq;
use std::time::Duration;

async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

/// Advance paused time and feed every delivered event back into the console.
async fn advance(harness: &mut Harness, millis: u64) -> usize {
    tokio::time::advance(Duration::from_millis(millis)).await;
    settle().await;
    let mut delivered = 0;
    while let Ok(event) = harness.events.try_recv() {
        harness.console.handle_event(event);
        delivered += 1;
    }
    delivered
}

fn plates(harness: &Harness) -> Vec<String> {
    harness
        .console
        .vehicle_view()
        .filtered()
        .iter()
        .map(|row| row.plate.to_string())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn short_search_is_not_effective() {
    let mut harness = harness();
    harness.console.set_search_text("ab");
    assert_eq!(harness.console.search_text(), "ab");
    assert_eq!(advance(&mut harness, 500).await, 1);

    assert_eq!(harness.console.effective_search_text(), None);
    assert_eq!(harness.console.resident_view().filtered().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn search_commits_after_quiet_period() {
    let mut harness = harness();
    harness.console.set_tab(ConsoleTab::Vehicles);
    harness.console.set_search_text("a");
    assert_eq!(advance(&mut harness, 200).await, 0);
    harness.console.set_search_text("ab");
    assert_eq!(advance(&mut harness, 200).await, 0);
    harness.console.set_search_text("abc");
    assert_eq!(advance(&mut harness, 499).await, 0);
    assert_eq!(harness.console.effective_search_text(), None);
    assert_eq!(plates(&harness).len(), 5);

    assert_eq!(advance(&mut harness, 1).await, 1);
    assert_eq!(harness.console.effective_search_text(), Some("abc"));
    assert_eq!(plates(&harness), vec!["ABC-123"]);
}

#[tokio::test(start_paused = true)]
async fn effective_search_is_trimmed() {
    let mut harness = harness();
    harness.console.set_search_text("  lima  ");
    advance(&mut harness, 500).await;
    assert_eq!(harness.console.effective_search_text(), Some("lima"));
    let names: Vec<String> = harness
        .console
        .resident_view()
        .filtered()
        .iter()
        .map(|row| row.resident.name.clone())
        .collect();
    assert_eq!(names, vec!["Ana Lima"]);
}

#[tokio::test(start_paused = true)]
async fn committed_search_resets_the_page() {
    let mut harness = harness();
    harness.console.set_page(3);
    harness.console.set_search_text("boris");
    advance(&mut harness, 500).await;
    assert_eq!(harness.console.current_page(), 1);
}

#[tokio::test(start_paused = true)]
async fn switching_tabs_commits_to_the_tab_typed_in() {
    let mut harness = harness();
    harness.console.set_search_text("ana");
    harness.console.set_tab(ConsoleTab::Units);

    assert_eq!(
        harness.console.residents().effective_search_text(),
        Some("ana")
    );
    assert_eq!(harness.console.effective_search_text(), None);
    assert_eq!(advance(&mut harness, 1_000).await, 0);
}

#[tokio::test(start_paused = true)]
async fn stale_commit_is_ignored() {
    let mut harness = harness();
    harness.console.set_search_text("boris");
    harness.console.flush_search();
    harness.console.handle_event(ConsoleEvent::SearchCommitted {
        tab: ConsoleTab::Residents,
        text: "chen".to_string(),
    });
    assert_eq!(harness.console.effective_search_text(), Some("boris"));
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_commit() {
    let mut harness = harness();
    harness.console.set_search_text("boris");
    harness.console.shutdown();
    assert_eq!(advance(&mut harness, 2_000).await, 0);
    assert_eq!(harness.console.effective_search_text(), None);
}

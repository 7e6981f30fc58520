//! Sync Orchestrator Tests.
// crates/dex-core/tests/sync.rs
// ============================================================================
// Module: Sync Orchestrator Tests
// Description: Ordering, per-id failure isolation, and resume behavior.
// Purpose: Ensure every acquired record survives and failures stay local.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use dex_core::CatalogId;
use dex_core::CatalogStore;
use dex_core::CatalogSync;
use dex_core::IdRange;
use dex_core::InMemoryCatalogStore;
use dex_core::StoreError;
use dex_core::SyncError;
use dex_core::SyncPhase;

use crate::common::FailingCommitStore;
use crate::common::FaultyStore;
use crate::common::RecordingLog;
use crate::common::ScriptedAssets;
use crate::common::ScriptedFetcher;
use crate::common::sample_entry;

fn span(first: u32, last: u32) -> IdRange {
    IdRange::through(CatalogId::new(first), CatalogId::new(last))
}

#[test]
fn full_range_stores_every_record_then_backfills() {
    let fetcher = ScriptedFetcher::new();
    let assets = ScriptedAssets::new();
    let store = InMemoryCatalogStore::new();
    let sync = CatalogSync::new(&fetcher, &assets, &store);

    let report = sync.synchronize(span(1, 10)).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.stored.len(), 10);
    assert_eq!(report.requested, span(1, 10));
    assert_eq!(fetcher.calls(), (1 ..= 10).collect::<Vec<_>>());
    assert_eq!(store.count().unwrap(), 10);
    assert_eq!(report.backfill.candidates, 10);
    assert_eq!(report.backfill.attached.len(), 10);
    assert!(store.missing_assets().unwrap().is_empty());
}

#[test]
fn resume_fetches_only_the_missing_tail() {
    let fetcher = ScriptedFetcher::new();
    let assets = ScriptedAssets::new();
    let store = InMemoryCatalogStore::new();
    let sync = CatalogSync::new(&fetcher, &assets, &store);

    sync.synchronize(span(1, 50)).unwrap();
    assert_eq!(sync.resume_position().unwrap(), CatalogId::new(51));

    let report = sync.synchronize_remaining(51).unwrap();
    assert_eq!(report.stored, vec![CatalogId::new(51)]);
    assert_eq!(fetcher.calls().len(), 51);
    assert_eq!(fetcher.calls().last(), Some(&51));
    assert_eq!(store.count().unwrap(), 51);
    assert_eq!(report.backfill.attached, vec![CatalogId::new(51)]);
}

#[test]
fn resume_on_complete_catalog_is_a_no_op() {
    let fetcher = ScriptedFetcher::new();
    let assets = ScriptedAssets::new();
    let store = InMemoryCatalogStore::new();
    let sync = CatalogSync::new(&fetcher, &assets, &store);

    sync.synchronize(span(1, 5)).unwrap();
    let report = sync.synchronize_remaining(5).unwrap();
    assert!(report.requested.is_empty());
    assert!(report.stored.is_empty());
    assert_eq!(fetcher.calls().len(), 5);
}

#[test]
fn network_failure_is_isolated_to_one_id() {
    let fetcher = ScriptedFetcher::new().fail_network(37);
    let assets = ScriptedAssets::new();
    let store = InMemoryCatalogStore::new();
    let sync = CatalogSync::new(&fetcher, &assets, &store);

    let report = sync.synchronize(span(1, 40)).unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].id, CatalogId::new(37));
    assert_eq!(report.failures[0].kind, "network");
    assert_eq!(report.failures[0].phase, SyncPhase::Fetch);
    assert_eq!(report.stored.len(), 39);
    assert!(store.get(CatalogId::new(37)).unwrap().is_none());
    assert!(store.get(CatalogId::new(38)).unwrap().is_some());
}

#[test]
fn malformed_payload_is_reported_and_skipped() {
    let fetcher = ScriptedFetcher::new().fail_malformed(2);
    let assets = ScriptedAssets::new();
    let store = InMemoryCatalogStore::new();
    let sync = CatalogSync::new(&fetcher, &assets, &store);

    let report = sync.synchronize(span(1, 3)).unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, "malformed_payload");
    assert_eq!(report.stored, vec![CatalogId::new(1), CatalogId::new(3)]);
}

fn gapped_store() -> InMemoryCatalogStore {
    InMemoryCatalogStore::with_entries([
        sample_entry(1, "bulbasaur"),
        sample_entry(2, "ivysaur"),
        sample_entry(4, "charmander"),
        sample_entry(5, "charmeleon"),
    ])
}

#[test]
fn stored_ids_are_skipped_without_fetching() {
    let fetcher = ScriptedFetcher::new();
    let assets = ScriptedAssets::new();
    let store = gapped_store();
    let sync = CatalogSync::new(&fetcher, &assets, &store);

    let report = sync.synchronize(span(1, 5)).unwrap();
    assert!(report.is_clean());
    assert_eq!(fetcher.calls(), vec![3]);
    assert_eq!(report.stored, vec![CatalogId::new(3)]);
    assert_eq!(
        report.present,
        vec![CatalogId::new(1), CatalogId::new(2), CatalogId::new(4), CatalogId::new(5)]
    );
    assert_eq!(store.count().unwrap(), 5);
    assert_eq!(store.get(CatalogId::new(4)).unwrap().unwrap().name, "charmander");
}

#[test]
fn resume_retries_an_earlier_gap() {
    let fetcher = ScriptedFetcher::new();
    let assets = ScriptedAssets::new();
    let store = gapped_store();
    let sync = CatalogSync::new(&fetcher, &assets, &store);

    assert_eq!(sync.resume_position().unwrap(), CatalogId::new(3));
    let report = sync.synchronize_remaining(6).unwrap();
    assert_eq!(report.requested, span(3, 6));
    assert_eq!(fetcher.calls(), vec![3, 6]);
    assert_eq!(report.present, vec![CatalogId::new(4), CatalogId::new(5)]);
    assert_eq!(sync.resume_position().unwrap(), CatalogId::new(7));
}

#[test]
fn failed_id_is_retried_by_the_next_resume() {
    let failing = ScriptedFetcher::new().fail_network(37);
    let assets = ScriptedAssets::new();
    let store = InMemoryCatalogStore::new();
    CatalogSync::new(&failing, &assets, &store).synchronize(span(1, 40)).unwrap();
    assert_eq!(store.count().unwrap(), 39);

    let fetcher = ScriptedFetcher::new();
    let sync = CatalogSync::new(&fetcher, &assets, &store);
    assert_eq!(sync.resume_position().unwrap(), CatalogId::new(37));
    let report = sync.synchronize_remaining(40).unwrap();
    assert!(report.is_clean());
    assert_eq!(fetcher.calls(), vec![37]);
    assert_eq!(store.count().unwrap(), 40);
}

#[test]
fn duplicate_key_race_is_reported_and_skipped() {
    let fetcher = ScriptedFetcher::new();
    let assets = ScriptedAssets::new();
    let store =
        FaultyStore::new(InMemoryCatalogStore::with_entries([sample_entry(3, "venusaur")]))
            .with_stale_lookups();
    let sync = CatalogSync::new(&fetcher, &assets, &store);

    let report = sync.synchronize(span(1, 5)).unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].id, CatalogId::new(3));
    assert_eq!(report.failures[0].kind, "duplicate_key");
    assert_eq!(report.failures[0].phase, SyncPhase::Store);
    assert_eq!(report.stored.len(), 4);
    assert!(report.present.is_empty());
    assert_eq!(store.get(CatalogId::new(3)).unwrap().unwrap().name, "venusaur");
}

#[test]
fn persistence_failure_aborts_the_pass() {
    let fetcher = ScriptedFetcher::new();
    let assets = ScriptedAssets::new();
    let store = FailingCommitStore::new(InMemoryCatalogStore::new(), 2);
    let sync = CatalogSync::new(&fetcher, &assets, &store);

    let err = sync.synchronize(span(1, 5)).unwrap_err();
    assert_eq!(err, SyncError::Store(StoreError::Persistence("disk full".to_string())));
    assert_eq!(fetcher.calls(), vec![1, 2, 3]);
    assert_eq!(store.inner.count().unwrap(), 2);
    assert!(assets.calls().is_empty());
}

#[test]
fn empty_range_still_runs_backfill() {
    let fetcher = ScriptedFetcher::new();
    let assets = ScriptedAssets::new();
    let store = InMemoryCatalogStore::with_entries([sample_entry(1, "bulbasaur")]);
    let sync = CatalogSync::new(&fetcher, &assets, &store);

    let report = sync.synchronize(IdRange::new(CatalogId::new(5), CatalogId::new(5))).unwrap();
    assert!(report.stored.is_empty());
    assert!(fetcher.calls().is_empty());
    assert_eq!(report.backfill.attached, vec![CatalogId::new(1)]);
}

#[test]
fn present_ids_log_without_fetch_events() {
    let fetcher = ScriptedFetcher::new();
    let assets = ScriptedAssets::new();
    let store = InMemoryCatalogStore::with_entries([sample_entry(1, "bulbasaur")]);
    let log = RecordingLog::default();
    let sync = CatalogSync::new(&fetcher, &assets, &store).with_log(&log);

    sync.synchronize(span(1, 2)).unwrap();
    assert_eq!(&log.names()[.. 3], ["record_present", "record_stored", "sync_pass_finished"]);
    assert_eq!(fetcher.calls(), vec![2]);
}

#[test]
fn events_follow_processing_order() {
    let fetcher = ScriptedFetcher::new().fail_network(2);
    let assets = ScriptedAssets::new();
    let store = InMemoryCatalogStore::new();
    let log = RecordingLog::default();
    let sync = CatalogSync::new(&fetcher, &assets, &store).with_log(&log);

    sync.synchronize(span(1, 2)).unwrap();
    assert_eq!(
        log.names(),
        vec![
            "record_stored",
            "record_failed",
            "sync_pass_finished",
            "assets_attached",
            "backfill_pass_finished"
        ]
    );
    let events = log.events.lock().unwrap();
    assert_eq!(events[1].id, Some(CatalogId::new(2)));
    assert_eq!(events[1].error_kind, Some("network"));
}

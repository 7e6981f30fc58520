// crates/dex-core/src/runtime/sync.rs
// ============================================================================
// Module: Dex Sync Orchestrator
// Description: Sequential fetch-and-persist loop over a catalog id range.
// Purpose: Acquire remote records one id at a time with per-record commits.
// Dependencies: crate::{core, interfaces}, serde, thiserror
// ============================================================================

//! ## Overview
//! [`CatalogSync`] walks an [`IdRange`] in ascending order. Each id is fetched,
//! converted into a fresh [`CatalogEntry`], inserted, and committed before the
//! next id is requested, so an interrupted run keeps every record it already
//! acquired. Ids already committed are skipped without a fetch. Per-id fetch
//! failures and insert races on a duplicate key are logged and reported
//! without stopping the pass; store persistence failures abort the pass and
//! surface to the caller. The asset backfill pass always runs after the range
//! completes.
//!
//! Resume position: the lowest id with no committed entry. With contiguous
//! ids this is `stored count + 1`; an id that failed in an earlier pass pulls
//! the position back so it is retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::core::CatalogEntry;
use crate::core::CatalogId;
use crate::core::IdRange;
use crate::interfaces::AssetFetcher;
use crate::interfaces::CatalogStore;
use crate::interfaces::FetchError;
use crate::interfaces::RecordFetcher;
use crate::interfaces::StoreError;
use crate::runtime::backfill::BackfillReport;
use crate::runtime::log::NoopSyncLog;
use crate::runtime::log::SyncEvent;
use crate::runtime::log::SyncLogSink;
use crate::runtime::log::SyncPhase;

// ============================================================================
// SECTION: Reports
// ============================================================================

/// One per-id failure recorded during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    /// Record identifier that failed.
    pub id: CatalogId,
    /// Stage that failed.
    pub phase: SyncPhase,
    /// Normalized error kind label.
    pub kind: &'static str,
    /// Failure detail.
    pub message: String,
}

impl SyncFailure {
    /// Builds a failure from a fetch error.
    pub(crate) fn from_fetch(id: CatalogId, phase: SyncPhase, error: &FetchError) -> Self {
        Self {
            id,
            phase,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Outcome of a synchronization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Range that was walked.
    pub requested: IdRange,
    /// Ids stored and committed during the pass, ascending.
    pub stored: Vec<CatalogId>,
    /// Ids already committed before the pass and not fetched, ascending.
    pub present: Vec<CatalogId>,
    /// Ids that failed, ascending.
    pub failures: Vec<SyncFailure>,
    /// Report of the backfill pass triggered at the end of the range.
    pub backfill: BackfillReport,
}

impl SyncReport {
    /// Returns true when every id in the range was stored.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Pass-level failure that aborts synchronization or backfill.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The catalog store failed; progress tracking may be unreliable.
    #[error("catalog store failure: {0}")]
    Store(#[from] StoreError),
}

/// Successful outcome of processing a single id.
enum StepOutcome {
    /// The record was fetched and committed.
    Stored,
    /// The record was already committed; nothing was fetched.
    Present,
}

/// Failed outcome of processing a single id.
enum StepError {
    /// The id failed but the pass continues.
    Skipped(SyncFailure),
    /// The pass must stop.
    Fatal(StoreError),
}

// ============================================================================
// SECTION: Orchestrator
// ============================================================================

/// Sink used when no log sink is supplied.
static NOOP_LOG: NoopSyncLog = NoopSyncLog;

/// Drives record synchronization and asset backfill against one store.
///
/// # Invariants
/// - Ids are processed strictly sequentially in ascending order.
/// - Every stored record is committed before the next fetch starts.
pub struct CatalogSync<'a, F: ?Sized, A: ?Sized, S: ?Sized> {
    /// Remote record source.
    pub(crate) fetcher: &'a F,
    /// Remote asset source.
    pub(crate) assets: &'a A,
    /// Local catalog store.
    pub(crate) store: &'a S,
    /// Structured event sink.
    pub(crate) log: &'a dyn SyncLogSink,
}

impl<'a, F, A, S> CatalogSync<'a, F, A, S>
where
    F: RecordFetcher + ?Sized,
    A: AssetFetcher + ?Sized,
    S: CatalogStore + ?Sized,
{
    /// Creates an orchestrator that discards log events.
    #[must_use]
    pub fn new(fetcher: &'a F, assets: &'a A, store: &'a S) -> Self {
        Self {
            fetcher,
            assets,
            store,
            log: &NOOP_LOG,
        }
    }

    /// Routes log events to `log`.
    #[must_use]
    pub fn with_log(mut self, log: &'a dyn SyncLogSink) -> Self {
        self.log = log;
        self
    }

    /// Returns the next id to fetch: the lowest id with no committed entry.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when the store cannot be read.
    pub fn resume_position(&self) -> Result<CatalogId, SyncError> {
        Ok(first_missing(self.store)?)
    }

    /// Synchronizes from the resume position through `expected_total`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when the store fails.
    pub fn synchronize_remaining(&self, expected_total: u32) -> Result<SyncReport, SyncError> {
        let start = self.resume_position()?;
        self.synchronize(IdRange::through(start, CatalogId::new(expected_total)))
    }

    /// Fetches and stores every id in `range`, then runs the backfill pass.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when a read, insert, or commit fails for a reason
    /// other than a duplicate key. Per-id fetch failures are reported in the
    /// returned [`SyncReport`] instead.
    pub fn synchronize(&self, range: IdRange) -> Result<SyncReport, SyncError> {
        let mut stored = Vec::new();
        let mut present = Vec::new();
        let mut failures = Vec::new();
        for id in range.iter() {
            match self.sync_one(id) {
                Ok(StepOutcome::Stored) => stored.push(id),
                Ok(StepOutcome::Present) => present.push(id),
                Err(StepError::Skipped(failure)) => failures.push(failure),
                Err(StepError::Fatal(error)) => {
                    self.log.record(&SyncEvent::error(
                        "sync_pass_aborted",
                        SyncPhase::Pass,
                        Some(id),
                        error.kind(),
                        error.to_string(),
                    ));
                    return Err(SyncError::Store(error));
                }
            }
        }
        self.log.record(&SyncEvent::ok("sync_pass_finished", SyncPhase::Pass, None).with_message(
            format!(
                "range {range}: {} stored, {} present, {} failed",
                stored.len(),
                present.len(),
                failures.len()
            ),
        ));
        let backfill = self.backfill_assets()?;
        Ok(SyncReport {
            requested: range,
            stored,
            present,
            failures,
            backfill,
        })
    }

    /// Fetches, inserts, and commits one id unless it is already committed.
    fn sync_one(&self, id: CatalogId) -> Result<StepOutcome, StepError> {
        if self.store.contains(id).map_err(StepError::Fatal)? {
            self.log.record(&SyncEvent::ok("record_present", SyncPhase::Store, Some(id)));
            return Ok(StepOutcome::Present);
        }
        let record = match self.fetcher.fetch_record(id) {
            Ok(record) => record,
            Err(error) => {
                self.log.record(&SyncEvent::error(
                    "record_failed",
                    SyncPhase::Fetch,
                    Some(id),
                    error.kind(),
                    error.to_string(),
                ));
                return Err(StepError::Skipped(SyncFailure::from_fetch(
                    id,
                    SyncPhase::Fetch,
                    &error,
                )));
            }
        };
        let entry = CatalogEntry::from_remote(record);
        match self.store.insert(entry) {
            Ok(()) => {}
            Err(error @ StoreError::DuplicateKey {
                ..
            }) => {
                self.log.record(&SyncEvent::error(
                    "record_failed",
                    SyncPhase::Store,
                    Some(id),
                    error.kind(),
                    error.to_string(),
                ));
                return Err(StepError::Skipped(SyncFailure {
                    id,
                    phase: SyncPhase::Store,
                    kind: error.kind(),
                    message: error.to_string(),
                }));
            }
            Err(error) => return Err(StepError::Fatal(error)),
        }
        self.store.commit().map_err(StepError::Fatal)?;
        self.log.record(&SyncEvent::ok("record_stored", SyncPhase::Store, Some(id)));
        Ok(StepOutcome::Stored)
    }
}

// ============================================================================
// SECTION: Resume Position
// ============================================================================

/// Returns the lowest id, starting at 1, with no committed entry.
///
/// Only ids up to the stored count can be gaps; past that the answer is
/// `stored count + 1`.
pub(crate) fn first_missing<S>(store: &S) -> Result<CatalogId, StoreError>
where
    S: CatalogStore + ?Sized,
{
    let stored = u32::try_from(store.count()?).unwrap_or(u32::MAX);
    for id in IdRange::through(CatalogId::new(1), CatalogId::new(stored)).iter() {
        if !store.contains(id)? {
            return Ok(id);
        }
    }
    Ok(CatalogId::new(stored.saturating_add(1)))
}

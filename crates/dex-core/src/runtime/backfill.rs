// crates/dex-core/src/runtime/backfill.rs
// ============================================================================
// Module: Dex Asset Backfill
// Description: Second pass that downloads artwork for stored entries.
// Purpose: Attach sprite blobs to entries that are still missing them.
// Dependencies: crate::{core, interfaces}, serde
// ============================================================================

//! ## Overview
//! The backfill pass selects every committed entry whose sprite is absent,
//! downloads the default artwork and then the shiny artwork, and commits both
//! blobs together. A failed download leaves that entry untouched and the pass
//! moves on; the entry is picked up again by the next pass. Store failures
//! abort the pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::CatalogEntry;
use crate::core::CatalogId;
use crate::interfaces::AssetFetcher;
use crate::interfaces::CatalogStore;
use crate::interfaces::RecordFetcher;
use crate::interfaces::StoreError;
use crate::runtime::log::SyncEvent;
use crate::runtime::log::SyncPhase;
use crate::runtime::sync::CatalogSync;
use crate::runtime::sync::SyncError;
use crate::runtime::sync::SyncFailure;

// ============================================================================
// SECTION: Report
// ============================================================================

/// Outcome of an asset backfill pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    /// Number of entries that were missing assets when the pass began.
    pub candidates: usize,
    /// Ids whose assets were attached and committed, ascending.
    pub attached: Vec<CatalogId>,
    /// Ids whose downloads failed, ascending.
    pub failures: Vec<SyncFailure>,
}

// ============================================================================
// SECTION: Backfill
// ============================================================================

impl<F, A, S> CatalogSync<'_, F, A, S>
where
    F: RecordFetcher + ?Sized,
    A: AssetFetcher + ?Sized,
    S: CatalogStore + ?Sized,
{
    /// Downloads and attaches artwork for every entry missing its sprite.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when the store cannot be read or an attach or
    /// commit fails.
    /// Download failures are reported in the returned [`BackfillReport`].
    pub fn backfill_assets(&self) -> Result<BackfillReport, SyncError> {
        let candidates = self.store.missing_assets()?;
        let mut report = BackfillReport {
            candidates: candidates.len(),
            ..BackfillReport::default()
        };
        for entry in &candidates {
            match self.download_pair(entry) {
                Ok((sprite, shiny)) => {
                    self.store
                        .attach_assets(entry.id, sprite, shiny)
                        .map_err(|error| self.abort(entry.id, error))?;
                    self.store.commit().map_err(|error| self.abort(entry.id, error))?;
                    self.log.record(&SyncEvent::ok(
                        "assets_attached",
                        SyncPhase::Backfill,
                        Some(entry.id),
                    ));
                    report.attached.push(entry.id);
                }
                Err(failure) => report.failures.push(failure),
            }
        }
        self.log.record(
            &SyncEvent::ok("backfill_pass_finished", SyncPhase::Pass, None).with_message(format!(
                "{} candidates: {} attached, {} failed",
                report.candidates,
                report.attached.len(),
                report.failures.len()
            )),
        );
        Ok(report)
    }

    /// Fetches the default artwork, then the shiny artwork.
    fn download_pair(&self, entry: &CatalogEntry) -> Result<(Vec<u8>, Vec<u8>), SyncFailure> {
        let fetch = |url| {
            self.assets.fetch_asset(url).map_err(|error| {
                self.log.record(&SyncEvent::error(
                    "assets_failed",
                    SyncPhase::Backfill,
                    Some(entry.id),
                    error.kind(),
                    error.to_string(),
                ));
                SyncFailure::from_fetch(entry.id, SyncPhase::Backfill, &error)
            })
        };
        let sprite = fetch(&entry.sprite_url)?;
        let shiny = fetch(&entry.shiny_url)?;
        Ok((sprite, shiny))
    }

    /// Logs a pass-aborting store failure and converts it.
    fn abort(&self, id: CatalogId, error: StoreError) -> SyncError {
        self.log.record(&SyncEvent::error(
            "backfill_pass_aborted",
            SyncPhase::Backfill,
            Some(id),
            error.kind(),
            error.to_string(),
        ));
        SyncError::Store(error)
    }
}

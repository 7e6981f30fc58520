// crates/dex-core/src/runtime/catalog.rs
// ============================================================================
// Module: Dex Catalog Operations
// Description: Favorite toggling, search, status, and spotlight selection.
// Purpose: Give front ends one entry point per user-facing catalog action.
// Dependencies: crate::{core, interfaces}, rand
// ============================================================================

//! ## Overview
//! These helpers sit between a front end and a [`CatalogStore`]. Each one is a
//! short read or a single staged mutation followed by a commit, so a favorite
//! toggle is durable as soon as it returns.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::CatalogEntry;
use crate::core::CatalogId;
use crate::core::CatalogQuery;
use crate::core::CatalogStatus;
use crate::core::IdRange;
use crate::interfaces::AssetFetcher;
use crate::interfaces::CatalogStore;
use crate::interfaces::RecordFetcher;
use crate::interfaces::StoreError;
use crate::runtime::sync::CatalogSync;
use crate::runtime::sync::SyncError;
use crate::runtime::sync::SyncReport;
use crate::runtime::sync::first_missing;

// ============================================================================
// SECTION: Store Operations
// ============================================================================

/// Flips the favorite flag of `id` and commits; returns the new value.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] when the entry does not exist, or the
/// commit error when persistence fails.
pub fn toggle_favorite<S>(store: &S, id: CatalogId) -> Result<bool, StoreError>
where
    S: CatalogStore + ?Sized,
{
    let entry = store.get(id)?.ok_or(StoreError::NotFound {
        id,
    })?;
    let favorite = !entry.favorite;
    store.set_favorite(id, favorite)?;
    store.commit()?;
    Ok(favorite)
}

/// Lists entries whose name contains `text` (case-insensitive).
///
/// # Errors
///
/// Returns [`StoreError`] when the read fails.
pub fn search<S>(
    store: &S,
    text: Option<&str>,
    favorites_only: bool,
) -> Result<Vec<CatalogEntry>, StoreError>
where
    S: CatalogStore + ?Sized,
{
    store.query_matching(&CatalogQuery::new(text, favorites_only))
}

/// Summarizes how much of the expected catalog is stored.
///
/// # Errors
///
/// Returns [`StoreError`] when the read fails.
pub fn catalog_status<S>(store: &S, expected: usize) -> Result<CatalogStatus, StoreError>
where
    S: CatalogStore + ?Sized,
{
    Ok(CatalogStatus {
        stored: store.count()?,
        expected,
        missing_assets: store.missing_assets()?.len(),
        resume_at: first_missing(store)?,
    })
}

/// Picks one stored entry uniformly at random; `None` when the catalog is empty.
///
/// # Errors
///
/// Returns [`StoreError`] when the read fails.
pub fn random_entry<S, R>(store: &S, rng: &mut R) -> Result<Option<CatalogEntry>, StoreError>
where
    S: CatalogStore + ?Sized,
    R: Rng + ?Sized,
{
    let entries = store.query_all()?;
    Ok(entries.choose(rng).cloned())
}

// ============================================================================
// SECTION: Sync Triggers
// ============================================================================

impl<F, A, S> CatalogSync<'_, F, A, S>
where
    F: RecordFetcher + ?Sized,
    A: AssetFetcher + ?Sized,
    S: CatalogStore + ?Sized,
{
    /// Runs the first-launch sync from `from` through `expected_total`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when the store fails.
    pub fn trigger_initial_sync(
        &self,
        from: CatalogId,
        expected_total: u32,
    ) -> Result<SyncReport, SyncError> {
        self.synchronize(IdRange::through(from, CatalogId::new(expected_total)))
    }

    /// Fetches the rest of an incomplete catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when the store fails.
    pub fn trigger_resync(&self, expected_total: u32) -> Result<SyncReport, SyncError> {
        self.synchronize_remaining(expected_total)
    }
}

// crates/dex-core/src/lib.rs
// ============================================================================
// Module: Dex Core Library
// Description: Public API surface for the Dex catalog core.
// Purpose: Expose catalog types, interfaces, and synchronization runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Dex core owns the catalog data model, the wire-format decoder, and the
//! synchronization pipeline that fetches records by id, persists them one at a
//! time, and backfills sprite assets in a second pass. Transport and storage
//! backends plug in through the traits in [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::AssetFetcher;
pub use interfaces::CatalogStore;
pub use interfaces::FetchError;
pub use interfaces::PendingMutation;
pub use interfaces::RecordFetcher;
pub use interfaces::StoreError;
pub use runtime::BackfillReport;
pub use runtime::CatalogSync;
pub use runtime::catalog_status;
pub use runtime::FileSyncLog;
pub use runtime::InMemoryCatalogStore;
pub use runtime::NoopSyncLog;
pub use runtime::random_entry;
pub use runtime::search;
pub use runtime::StderrSyncLog;
pub use runtime::SyncError;
pub use runtime::SyncEvent;
pub use runtime::SyncFailure;
pub use runtime::SyncLogSink;
pub use runtime::SyncOutcome;
pub use runtime::SyncPhase;
pub use runtime::SyncReport;
pub use runtime::toggle_favorite;

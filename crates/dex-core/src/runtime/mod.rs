// crates/dex-core/src/runtime/mod.rs
// ============================================================================
// Module: Dex Runtime
// Description: Synchronization, backfill, and catalog operations.
// Purpose: Drive fetchers and stores through the catalog lifecycle.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime owns the sequential sync loop, the asset backfill pass, the
//! user-facing catalog helpers, structured sync logging, and an in-memory
//! store for tests.

pub mod backfill;
pub mod catalog;
pub mod log;
pub mod store;
pub mod sync;

pub use backfill::BackfillReport;
pub use catalog::catalog_status;
pub use catalog::random_entry;
pub use catalog::search;
pub use catalog::toggle_favorite;
pub use log::FileSyncLog;
pub use log::NoopSyncLog;
pub use log::StderrSyncLog;
pub use log::SyncEvent;
pub use log::SyncLogSink;
pub use log::SyncOutcome;
pub use log::SyncPhase;
pub use store::InMemoryCatalogStore;
pub use sync::CatalogSync;
pub use sync::SyncError;
pub use sync::SyncFailure;
pub use sync::SyncReport;

// crates/dex-store-sqlite/src/lib.rs
// ============================================================================
// Module: Dex SQLite Catalog Store
// Description: Durable CatalogStore backend using SQLite WAL.
// Purpose: Persist catalog entries and artwork across runs.
// Dependencies: dex-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`dex_core::CatalogStore`]. Mutations
//! are staged in memory and applied in a single transaction on commit, so a
//! crash between commits never leaves a half-written entry. Stored rows are
//! validated on read and fail closed on corruption.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_ASSET_BLOB_BYTES;
pub use store::SqliteCatalogStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;

// crates/dex-core/src/core/mod.rs
// ============================================================================
// Module: Dex Core Types
// Description: Catalog identifiers, records, and the wire decoder.
// Purpose: Provide stable, serializable types shared by every backend.
// Dependencies: serde, serde_json, url
// ============================================================================

//! ## Overview
//! Core types define the transient [`RemoteRecord`] produced by the decoder and
//! the persisted [`CatalogEntry`] owned by catalog stores. These types are the
//! canonical source of truth for the CLI and storage layouts.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod decode;
pub mod entry;
pub mod identifiers;
pub mod query;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use decode::DecodeError;
pub use decode::decode_record;
pub use decode::decode_value;
pub use entry::BaseStats;
pub use entry::CatalogEntry;
pub use entry::RemoteRecord;
pub use entry::StatKind;
pub use identifiers::CatalogId;
pub use identifiers::IdRange;
pub use query::CatalogQuery;
pub use query::CatalogStatus;

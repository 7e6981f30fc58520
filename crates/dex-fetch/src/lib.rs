// crates/dex-fetch/src/lib.rs
// ============================================================================
// Module: Dex Fetch Library
// Description: HTTP transport for catalog records and artwork.
// Purpose: Implement the core fetch interfaces over blocking HTTP.
// Dependencies: dex-core, reqwest, url
// ============================================================================

//! ## Overview
//! This crate provides [`HttpCatalogClient`], a bounded blocking HTTP client
//! that implements both [`dex_core::RecordFetcher`] and
//! [`dex_core::AssetFetcher`]. Remote content is treated as untrusted: bodies
//! are size-capped, schemes are restricted, and redirects are bounded.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::HttpCatalogClient;
pub use client::HttpCatalogConfig;

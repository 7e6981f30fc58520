// crates/dex-cli/src/lib.rs
// ============================================================================
// Module: Dex CLI Library
// Description: Shared helpers for the `dex` binary.
// Purpose: Expose the message catalog and output rendering for reuse and tests.
// Dependencies: dex-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The `dex` binary keeps its user-facing strings in [`i18n`] and its entry
//! and report formatting in [`render`], so both can be exercised without
//! spawning the binary.

pub mod i18n;
pub mod render;

// crates/dex-config/src/lib.rs
// ============================================================================
// Module: Dex Config Library
// Description: Configuration model and loader for the Dex catalog tools.
// Purpose: Provide one validated source of runtime settings.
// Dependencies: dex-fetch, dex-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! [`DexConfig`] is parsed from `dex.toml`, validated fail-closed, and then
//! converted into the HTTP client and SQLite store configurations.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CONFIG_ENV_VAR;
pub use config::CatalogConfig;
pub use config::ConfigError;
pub use config::DEFAULT_CONFIG_NAME;
pub use config::DexConfig;
pub use config::LogConfig;
pub use config::LogSinkKind;
pub use config::SourceConfig;
pub use config::StoreConfig;

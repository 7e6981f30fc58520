// crates/dex-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared builders for dex-config integration tests.
// Purpose: Parse config fixtures without running validation.
// =============================================================================

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use dex_config::DexConfig;

/// Parses TOML into a config without validating it.
pub fn config_from_toml(content: &str) -> Result<DexConfig, String> {
    toml::from_str(content).map_err(|err| err.to_string())
}

/// Returns the all-defaults config.
pub fn minimal_config() -> Result<DexConfig, String> {
    config_from_toml("")
}

// crates/dex-config/src/config.rs
// ============================================================================
// Module: Dex Configuration
// Description: Configuration loading and validation for the Dex tools.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: dex-fetch, dex-store-sqlite, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! An explicit path (argument or `DEX_CONFIG`) must exist; when neither is
//! given and `dex.toml` is absent, built-in defaults apply. Every section is
//! optional and unknown keys are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use dex_fetch::HttpCatalogConfig;
use dex_fetch::client::DEFAULT_BASE_URL;
use dex_fetch::client::DEFAULT_MAX_ASSET_BYTES;
use dex_fetch::client::DEFAULT_MAX_RECORD_BYTES;
use dex_fetch::client::DEFAULT_MAX_REDIRECTS;
use dex_fetch::client::DEFAULT_TIMEOUT_MS;
use dex_fetch::client::DEFAULT_USER_AGENT;
use dex_store_sqlite::SqliteStoreConfig;
use dex_store_sqlite::SqliteStoreMode;
use dex_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "dex.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DEX_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for request timeouts.
const MAX_TIMEOUT_MS: u64 = 300_000;
/// Upper bound for any response body cap.
const MAX_BODY_LIMIT_BYTES: usize = 64 * 1024 * 1024;
/// Upper bound for the redirect budget.
const MAX_REDIRECT_LIMIT: usize = 20;
/// Upper bound for the user agent length.
const MAX_USER_AGENT_LENGTH: usize = 256;
/// Upper bound for the expected catalog size.
const MAX_EXPECTED_TOTAL: u32 = 100_000;
/// Upper bound for the `SQLite` busy timeout.
const MAX_BUSY_TIMEOUT_MS: u64 = 600_000;
/// Expected catalog size of the first generation.
const DEFAULT_EXPECTED_TOTAL: u32 = 151;
/// Default database filename.
const DEFAULT_STORE_PATH: &str = "dex.sqlite";
/// Default busy timeout for `SQLite` connections.
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level Dex configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DexConfig {
    /// Upstream record source.
    #[serde(default)]
    pub source: SourceConfig,
    /// Catalog expectations.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Local store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Sync log sink.
    #[serde(default)]
    pub log: LogConfig,
}

impl DexConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        load_resolved(&resolved, explicit)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.source.validate()?;
        self.catalog.validate()?;
        self.store.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

/// Upstream record source configuration.
///
/// # Invariants
/// - `base_url` is absolute; `http` requires `allow_http = true`.
/// - Limits are non-zero and bounded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Record endpoint; the id is appended as a path segment.
    pub base_url: String,
    /// Whole-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum record body size in bytes.
    pub max_record_bytes: usize,
    /// Maximum artwork body size in bytes.
    pub max_asset_bytes: usize,
    /// Allow cleartext HTTP.
    pub allow_http: bool,
    /// Maximum redirects followed per request.
    pub max_redirects: usize,
    /// User agent for outbound requests.
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
            max_asset_bytes: DEFAULT_MAX_ASSET_BYTES,
            allow_http: false,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SourceConfig {
    /// Validates source settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|err| ConfigError::Invalid(format!("source.base_url is invalid: {err}")))?;
        match url.scheme() {
            "https" => {}
            "http" if self.allow_http => {}
            "http" => {
                return Err(ConfigError::Invalid(
                    "source.base_url uses http but source.allow_http is false".to_string(),
                ));
            }
            scheme => {
                return Err(ConfigError::Invalid(format!(
                    "source.base_url has unsupported scheme: {scheme}"
                )));
            }
        }
        if url.cannot_be_a_base() {
            return Err(ConfigError::Invalid("source.base_url cannot carry a path".to_string()));
        }
        if self.timeout_ms == 0 || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "source.timeout_ms must be between 1 and {MAX_TIMEOUT_MS}"
            )));
        }
        validate_body_limit("source.max_record_bytes", self.max_record_bytes)?;
        validate_body_limit("source.max_asset_bytes", self.max_asset_bytes)?;
        if self.max_redirects > MAX_REDIRECT_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "source.max_redirects must be at most {MAX_REDIRECT_LIMIT}"
            )));
        }
        let agent = self.user_agent.trim();
        if agent.is_empty() || agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "source.user_agent must be 1 to {MAX_USER_AGENT_LENGTH} characters"
            )));
        }
        Ok(())
    }

    /// Converts to the HTTP client configuration.
    #[must_use]
    pub fn to_client_config(&self) -> HttpCatalogConfig {
        HttpCatalogConfig {
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
            max_record_bytes: self.max_record_bytes,
            max_asset_bytes: self.max_asset_bytes,
            allow_http: self.allow_http,
            max_redirects: self.max_redirects,
            user_agent: self.user_agent.trim().to_string(),
        }
    }
}

/// Catalog expectations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Number of entries the full catalog holds; ids run from 1 through this.
    pub expected_total: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            expected_total: DEFAULT_EXPECTED_TOTAL,
        }
    }
}

impl CatalogConfig {
    /// Validates catalog settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.expected_total == 0 || self.expected_total > MAX_EXPECTED_TOTAL {
            return Err(ConfigError::Invalid(format!(
                "catalog.expected_total must be between 1 and {MAX_EXPECTED_TOTAL}"
            )));
        }
        Ok(())
    }
}

/// Local store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Validates store settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("store.path", &self.path.to_string_lossy())?;
        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "store.busy_timeout_ms must be at most {MAX_BUSY_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }

    /// Converts to the `SQLite` store configuration.
    #[must_use]
    pub fn to_sqlite_config(&self) -> SqliteStoreConfig {
        SqliteStoreConfig {
            path: self.path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        }
    }
}

/// Sync log sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `log.path`.
    File,
    /// Discard events.
    None,
}

/// Sync log configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Sink kind.
    pub sink: LogSinkKind,
    /// Log file path, required for the file sink.
    pub path: Option<PathBuf>,
}

impl LogConfig {
    /// Validates log settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (LogSinkKind::File, None) => {
                Err(ConfigError::Invalid("log.path is required when log.sink = \"file\"".to_string()))
            }
            (_, Some(path)) => validate_path_string("log.path", &path.to_string_lossy()),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path; the flag is true when the path was requested.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Reads and validates a resolved config path.
fn load_resolved(resolved: &Path, explicit: bool) -> Result<DexConfig, ConfigError> {
    validate_path(resolved)?;
    if !explicit && !resolved.exists() {
        return Ok(DexConfig::default());
    }
    let bytes = fs::read(resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
    DexConfig::from_toml_str(content)
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a response body cap.
fn validate_body_limit(field: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_BODY_LIMIT_BYTES {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between 1 and {MAX_BODY_LIMIT_BYTES}"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

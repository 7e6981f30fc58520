// crates/dex-fetch/src/client.rs
// ============================================================================
// Module: Dex HTTP Catalog Client
// Description: Bounded blocking HTTP client for records and artwork.
// Purpose: Fetch one record per id and raw artwork bytes with strict limits.
// Dependencies: dex-core, reqwest, url
// ============================================================================

//! ## Overview
//! [`HttpCatalogClient`] issues one GET per call. Record bodies are handed to
//! the core decoder; artwork bodies are returned as opaque bytes. Transport
//! failures never carry payload bodies in their messages.
//! Security posture: upstream content is untrusted, so every body is read
//! through a byte cap and cleartext HTTP is refused unless enabled.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use dex_core::AssetFetcher;
use dex_core::CatalogId;
use dex_core::FetchError;
use dex_core::RecordFetcher;
use dex_core::RemoteRecord;
use dex_core::decode_record;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default upstream record endpoint.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/pokemon";
/// Default whole-request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Default cap for record bodies.
pub const DEFAULT_MAX_RECORD_BYTES: usize = 1024 * 1024;
/// Default cap for artwork bodies.
pub const DEFAULT_MAX_ASSET_BYTES: usize = 4 * 1024 * 1024;
/// Default redirect budget.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
/// Default user agent.
pub const DEFAULT_USER_AGENT: &str = "dex-catalog/0.1";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the HTTP catalog client.
///
/// # Invariants
/// - `allow_http = false` blocks cleartext `http://` URLs, including redirect targets.
/// - `max_record_bytes` and `max_asset_bytes` are hard upper bounds on bodies.
/// - `timeout_ms` applies to the full request lifecycle.
/// - `max_redirects = 0` disables redirect following.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCatalogConfig {
    /// Record endpoint; the id is appended as a final path segment.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum record body size, in bytes.
    pub max_record_bytes: usize,
    /// Maximum artwork body size, in bytes.
    pub max_asset_bytes: usize,
    /// Allow cleartext HTTP (disabled by default).
    pub allow_http: bool,
    /// Maximum redirects followed per request.
    pub max_redirects: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpCatalogConfig {
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

// ============================================================================
// SECTION: Client
// ============================================================================

/// Blocking HTTP client for catalog records and artwork.
///
/// # Invariants
/// - No retries are attempted; each call issues exactly one request.
/// - A record whose decoded id differs from the requested id is rejected.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    /// Client configuration.
    config: HttpCatalogConfig,
    /// Parsed record endpoint.
    base_url: Url,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl HttpCatalogClient {
    /// Creates a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] when the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: HttpCatalogConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|err| FetchError::Client(format!("invalid base url: {err}")))?;
        check_scheme(&base_url, config.allow_http).map_err(FetchError::Client)?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::Client("base url cannot carry a path".to_string()));
        }
        let client = build_http_client(&config)?;
        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpCatalogConfig {
        &self.config
    }

    /// Returns the record URL for `id`: `{base_url}/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] when the base URL cannot take segments.
    pub fn record_url(&self, id: CatalogId) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::Client("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }

    /// Issues a GET and returns the body, capped at `max_bytes`.
    fn get_limited(&self, url: &Url, max_bytes: usize) -> Result<Vec<u8>, String> {
        let mut response = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|err| format!("request failed: {err}"))?;
        if !response.status().is_success() {
            return Err(format!("http status {}", response.status()));
        }
        read_response_limited(&mut response, max_bytes)
    }
}

impl RecordFetcher for HttpCatalogClient {
    fn fetch_record(&self, id: CatalogId) -> Result<RemoteRecord, FetchError> {
        let url = self.record_url(id)?;
        let bytes = self.get_limited(&url, self.config.max_record_bytes).map_err(|cause| {
            FetchError::Network {
                id,
                cause,
            }
        })?;
        let record = decode_record(&bytes).map_err(|err| FetchError::MalformedPayload {
            id,
            reason: err.0,
        })?;
        if record.id != id {
            return Err(FetchError::MalformedPayload {
                id,
                reason: format!("$.id: expected {id}, found {}", record.id),
            });
        }
        Ok(record)
    }
}

impl AssetFetcher for HttpCatalogClient {
    fn fetch_asset(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let asset_error = |cause| FetchError::Asset {
            url: url.to_string(),
            cause,
        };
        check_scheme(url, self.config.allow_http).map_err(asset_error)?;
        self.get_limited(url, self.config.max_asset_bytes).map_err(asset_error)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the URL scheme against the cleartext policy.
fn check_scheme(url: &Url, allow_http: bool) -> Result<(), String> {
    match url.scheme() {
        "https" => Ok(()),
        "http" if allow_http => Ok(()),
        scheme => Err(format!("unsupported url scheme: {scheme}")),
    }
}

/// Builds the HTTP client with timeout, user agent, and redirect policy.
fn build_http_client(config: &HttpCatalogConfig) -> Result<Client, FetchError> {
    let allow_http = config.allow_http;
    let max_redirects = config.max_redirects;
    let policy = if max_redirects == 0 {
        Policy::none()
    } else {
        Policy::custom(move |attempt| {
            if attempt.previous().len() >= max_redirects {
                attempt.error("too many redirects")
            } else if check_scheme(attempt.url(), allow_http).is_err() {
                attempt.error("redirect to disallowed scheme")
            } else {
                attempt.follow()
            }
        })
    };
    Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .user_agent(config.user_agent.clone())
        .redirect(policy)
        .build()
        .map_err(|err| FetchError::Client(format!("http client build failed: {err}")))
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(response: &mut Response, max_bytes: usize) -> Result<Vec<u8>, String> {
    let expected_len = response.content_length();
    let max_bytes_u64 =
        u64::try_from(max_bytes).map_err(|_| "response size limit exceeds u64".to_string())?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(format!("response exceeds size limit of {max_bytes} bytes"));
    }
    let mut buf = Vec::new();
    let mut handle = response.take(max_bytes_u64.saturating_add(1));
    handle.read_to_end(&mut buf).map_err(|err| format!("failed to read response: {err}"))?;
    if buf.len() > max_bytes {
        return Err(format!("response exceeds size limit of {max_bytes} bytes"));
    }
    if let Some(expected) = expected_len {
        let expected =
            usize::try_from(expected).map_err(|_| "invalid response length".to_string())?;
        if buf.len() < expected {
            return Err("response truncated".to_string());
        }
    }
    Ok(buf)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

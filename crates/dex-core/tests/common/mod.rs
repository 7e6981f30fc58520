// crates/dex-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared payloads, scripted fetchers, and store wrappers.
// Purpose: Drive the sync runtime deterministically without network access.
// Dependencies: dex-core
// ============================================================================

//! ## Overview
//! Scripted fetchers answer every id with a generated record unless a failure
//! has been registered for it. [`FailingCommitStore`] wraps the in-memory
//! store and starts failing commits after a configured number of successes.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use dex_core::AssetFetcher;
use dex_core::CatalogEntry;
use dex_core::CatalogId;
use dex_core::CatalogQuery;
use dex_core::CatalogStore;
use dex_core::FetchError;
use dex_core::InMemoryCatalogStore;
use dex_core::RecordFetcher;
use dex_core::RemoteRecord;
use dex_core::StoreError;
use dex_core::SyncEvent;
use dex_core::SyncLogSink;
use dex_core::decode_value;
use serde_json::Value;
use serde_json::json;
use url::Url;

// ============================================================================
// SECTION: Payloads
// ============================================================================

/// Builds an upstream payload with one type and fixed stats.
#[must_use]
pub fn record_json(id: u32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "types": [{"slot": 1, "type": {"name": "fire", "url": "https://api.example/type/10"}}],
        "stats": [
            {"base_stat": 39, "effort": 0, "stat": {"name": "hp"}},
            {"base_stat": 52, "effort": 0, "stat": {"name": "attack"}},
            {"base_stat": 43, "effort": 0, "stat": {"name": "defense"}},
            {"base_stat": 60, "effort": 1, "stat": {"name": "special-attack"}},
            {"base_stat": 50, "effort": 0, "stat": {"name": "special-defense"}},
            {"base_stat": 65, "effort": 0, "stat": {"name": "speed"}}
        ],
        "sprites": {
            "front_default": sprite_url(id).as_str(),
            "front_shiny": shiny_url(id).as_str(),
            "back_default": null
        }
    })
}

/// Decodes [`record_json`] into a record.
#[must_use]
pub fn sample_record(id: u32, name: &str) -> RemoteRecord {
    decode_value(&record_json(id, name)).unwrap()
}

/// Builds a fresh catalog entry.
#[must_use]
pub fn sample_entry(id: u32, name: &str) -> CatalogEntry {
    CatalogEntry::from_remote(sample_record(id, name))
}

/// Default artwork URL for `id`.
#[must_use]
pub fn sprite_url(id: u32) -> Url {
    Url::parse(&format!("https://img.example/sprites/{id}.png")).unwrap()
}

/// Shiny artwork URL for `id`.
#[must_use]
pub fn shiny_url(id: u32) -> Url {
    Url::parse(&format!("https://img.example/sprites/shiny/{id}.png")).unwrap()
}

/// Bytes served by [`ScriptedAssets`] for `url`.
#[must_use]
pub fn asset_bytes(url: &Url) -> Vec<u8> {
    url.path().as_bytes().to_vec()
}

// ============================================================================
// SECTION: Fetchers
// ============================================================================

/// Record fetcher that answers every id unless a failure is registered.
#[derive(Default)]
pub struct ScriptedFetcher {
    /// Names keyed by id; unnamed ids get `creature-{id}`.
    names: BTreeMap<u32, String>,
    /// Failures keyed by id.
    failures: BTreeMap<u32, FetchError>,
    /// Requested ids in call order.
    calls: Mutex<Vec<u32>>,
}

impl ScriptedFetcher {
    /// Creates a fetcher with no failures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a name to `id`.
    #[must_use]
    pub fn with_name(mut self, id: u32, name: &str) -> Self {
        self.names.insert(id, name.to_string());
        self
    }

    /// Registers a network failure for `id`.
    #[must_use]
    pub fn fail_network(mut self, id: u32) -> Self {
        self.failures.insert(
            id,
            FetchError::Network {
                id: CatalogId::new(id),
                cause: "connection reset".to_string(),
            },
        );
        self
    }

    /// Registers a malformed payload failure for `id`.
    #[must_use]
    pub fn fail_malformed(mut self, id: u32) -> Self {
        self.failures.insert(
            id,
            FetchError::MalformedPayload {
                id: CatalogId::new(id),
                reason: "$.stats: expected 6 entries, found 5".to_string(),
            },
        );
        self
    }

    /// Returns the ids requested so far.
    #[must_use]
    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

impl RecordFetcher for ScriptedFetcher {
    fn fetch_record(&self, id: CatalogId) -> Result<RemoteRecord, FetchError> {
        self.calls.lock().unwrap().push(id.get());
        if let Some(error) = self.failures.get(&id.get()) {
            return Err(error.clone());
        }
        let name = self.names.get(&id.get()).cloned().unwrap_or_else(|| format!("creature-{id}"));
        Ok(sample_record(id.get(), &name))
    }
}

/// Asset fetcher that serves path bytes unless the URL is registered as failing.
#[derive(Default)]
pub struct ScriptedAssets {
    /// URLs that fail.
    failing: BTreeSet<String>,
    /// Requested URLs in call order.
    calls: Mutex<Vec<String>>,
}

impl ScriptedAssets {
    /// Creates an asset fetcher with no failures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `url` as failing.
    #[must_use]
    pub fn fail(mut self, url: &Url) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Returns the URLs requested so far.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl AssetFetcher for ScriptedAssets {
    fn fetch_asset(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        if self.failing.contains(url.as_str()) {
            return Err(FetchError::Asset {
                url: url.to_string(),
                cause: "status 404".to_string(),
            });
        }
        Ok(asset_bytes(url))
    }
}

// ============================================================================
// SECTION: Logs
// ============================================================================

/// Sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingLog {
    /// Events in emission order.
    pub events: Mutex<Vec<SyncEvent>>,
}

impl RecordingLog {
    /// Returns the event names in emission order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|event| event.event).collect()
    }
}

impl SyncLogSink for RecordingLog {
    fn record(&self, event: &SyncEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ============================================================================
// SECTION: Stores
// ============================================================================

/// In-memory store whose commits fail after a number of successes.
pub struct FailingCommitStore {
    /// Wrapped store.
    pub inner: InMemoryCatalogStore,
    /// Commits allowed before failures start.
    allowed: usize,
    /// Commits attempted so far.
    attempts: AtomicUsize,
}

impl FailingCommitStore {
    /// Wraps `inner`, allowing `allowed` successful commits.
    #[must_use]
    pub const fn new(inner: InMemoryCatalogStore, allowed: usize) -> Self {
        Self {
            inner,
            allowed,
            attempts: AtomicUsize::new(0),
        }
    }
}

impl CatalogStore for FailingCommitStore {
    fn insert(&self, entry: CatalogEntry) -> Result<(), StoreError> {
        self.inner.insert(entry)
    }

    fn attach_assets(
        &self,
        id: CatalogId,
        sprite: Vec<u8>,
        shiny: Vec<u8>,
    ) -> Result<(), StoreError> {
        self.inner.attach_assets(id, sprite, shiny)
    }

    fn set_favorite(&self, id: CatalogId, favorite: bool) -> Result<(), StoreError> {
        self.inner.set_favorite(id, favorite)
    }

    fn commit(&self) -> Result<(), StoreError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt >= self.allowed {
            return Err(StoreError::Persistence("disk full".to_string()));
        }
        self.inner.commit()
    }

    fn get(&self, id: CatalogId) -> Result<Option<CatalogEntry>, StoreError> {
        self.inner.get(id)
    }

    fn count(&self) -> Result<usize, StoreError> {
        self.inner.count()
    }

    fn query_all(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        self.inner.query_all()
    }

    fn query_matching(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>, StoreError> {
        self.inner.query_matching(query)
    }

    fn missing_assets(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        self.inner.missing_assets()
    }
}

/// In-memory store with switchable faults on lookups and artwork attachment.
#[derive(Default)]
pub struct FaultyStore {
    /// Wrapped store.
    pub inner: InMemoryCatalogStore,
    /// Report every id as absent, as if another writer raced the lookup.
    stale_lookups: bool,
    /// Fail every artwork attachment with a persistence error.
    failing_attach: bool,
}

impl FaultyStore {
    /// Wraps `inner` with no faults enabled.
    #[must_use]
    pub fn new(inner: InMemoryCatalogStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Makes `contains` answer false for every id.
    #[must_use]
    pub const fn with_stale_lookups(mut self) -> Self {
        self.stale_lookups = true;
        self
    }

    /// Makes `attach_assets` fail.
    #[must_use]
    pub const fn with_failing_attach(mut self) -> Self {
        self.failing_attach = true;
        self
    }
}

impl CatalogStore for FaultyStore {
    fn insert(&self, entry: CatalogEntry) -> Result<(), StoreError> {
        self.inner.insert(entry)
    }

    fn attach_assets(
        &self,
        id: CatalogId,
        sprite: Vec<u8>,
        shiny: Vec<u8>,
    ) -> Result<(), StoreError> {
        if self.failing_attach {
            return Err(StoreError::Persistence("blob write rejected".to_string()));
        }
        self.inner.attach_assets(id, sprite, shiny)
    }

    fn set_favorite(&self, id: CatalogId, favorite: bool) -> Result<(), StoreError> {
        self.inner.set_favorite(id, favorite)
    }

    fn commit(&self) -> Result<(), StoreError> {
        self.inner.commit()
    }

    fn get(&self, id: CatalogId) -> Result<Option<CatalogEntry>, StoreError> {
        self.inner.get(id)
    }

    fn contains(&self, id: CatalogId) -> Result<bool, StoreError> {
        if self.stale_lookups {
            return Ok(false);
        }
        self.inner.contains(id)
    }

    fn count(&self) -> Result<usize, StoreError> {
        self.inner.count()
    }

    fn query_all(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        self.inner.query_all()
    }

    fn query_matching(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>, StoreError> {
        self.inner.query_matching(query)
    }

    fn missing_assets(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        self.inner.missing_assets()
    }
}

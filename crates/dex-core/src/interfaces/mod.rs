// crates/dex-core/src/interfaces/mod.rs
// ============================================================================
// Module: Dex Interfaces
// Description: Backend-agnostic traits for fetching and catalog storage.
// Purpose: Define the seams between the sync runtime and its backends.
// Dependencies: crate::core, thiserror, url
// ============================================================================

//! ## Overview
//! Interfaces describe how the synchronizer reaches the remote catalog and the
//! local store without binding to a transport or database. Implementations
//! must be deterministic with respect to their inputs and must report
//! failures through the typed errors below rather than panicking.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use url::Url;

use crate::core::CatalogEntry;
use crate::core::CatalogId;
use crate::core::CatalogQuery;
use crate::core::RemoteRecord;

// ============================================================================
// SECTION: Fetching
// ============================================================================

/// Fetch errors for remote records and assets.
///
/// # Invariants
/// - `Network` failures are transient; a later pass may succeed.
/// - `MalformedPayload` failures repeat until the upstream data changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport failure: connect, DNS, timeout, non-success status, or body read.
    #[error("network error fetching record {id}: {cause}")]
    Network {
        /// Requested record identifier.
        id: CatalogId,
        /// Transport failure description.
        cause: String,
    },
    /// Upstream payload did not match the expected shape.
    #[error("malformed payload for record {id}: {reason}")]
    MalformedPayload {
        /// Requested record identifier.
        id: CatalogId,
        /// Decoder failure description.
        reason: String,
    },
    /// Asset download failure.
    #[error("asset fetch failed for {url}: {cause}")]
    Asset {
        /// Asset URL.
        url: String,
        /// Failure description.
        cause: String,
    },
    /// Client construction or configuration failure.
    #[error("fetch client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Returns a stable label for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network {
                ..
            } => "network",
            Self::MalformedPayload {
                ..
            } => "malformed_payload",
            Self::Asset {
                ..
            } => "asset",
            Self::Client(_) => "client",
        }
    }
}

/// Fetches one catalog record by id.
pub trait RecordFetcher {
    /// Fetches and decodes the record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] for transport failures and
    /// [`FetchError::MalformedPayload`] when the body cannot be decoded.
    fn fetch_record(&self, id: CatalogId) -> Result<RemoteRecord, FetchError>;
}

/// Fetches opaque binary assets.
pub trait AssetFetcher {
    /// Downloads the bytes at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Asset`] when the download fails.
    fn fetch_asset(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

// ============================================================================
// SECTION: Catalog Store
// ============================================================================

/// Catalog store errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An entry with this id already exists or is already staged.
    #[error("catalog entry {id} already exists")]
    DuplicateKey {
        /// Conflicting identifier.
        id: CatalogId,
    },
    /// No entry exists with this id.
    #[error("catalog entry {id} not found")]
    NotFound {
        /// Missing identifier.
        id: CatalogId,
    },
    /// Durable write failed.
    #[error("catalog store persistence error: {0}")]
    Persistence(String),
    /// Stored data failed integrity checks.
    #[error("catalog store corruption: {0}")]
    Corrupt(String),
    /// Stored schema version is incompatible.
    #[error("catalog store version mismatch: {0}")]
    VersionMismatch(String),
    /// Input or stored data is invalid.
    #[error("catalog store invalid data: {0}")]
    Invalid(String),
}

impl StoreError {
    /// Returns a stable label for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateKey {
                ..
            } => "duplicate_key",
            Self::NotFound {
                ..
            } => "not_found",
            Self::Persistence(_) => "persistence",
            Self::Corrupt(_) => "corrupt",
            Self::VersionMismatch(_) => "version_mismatch",
            Self::Invalid(_) => "invalid",
        }
    }
}

/// Mutation staged by a store until the next commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingMutation {
    /// Insert a new entry.
    Insert(CatalogEntry),
    /// Attach both artwork blobs to an existing entry.
    AttachAssets {
        /// Target entry.
        id: CatalogId,
        /// Default artwork bytes.
        sprite: Vec<u8>,
        /// Shiny artwork bytes.
        shiny: Vec<u8>,
    },
    /// Set the favorite flag on an existing entry.
    SetFavorite {
        /// Target entry.
        id: CatalogId,
        /// New flag value.
        favorite: bool,
    },
}

impl PendingMutation {
    /// Returns the entry id touched by the mutation.
    #[must_use]
    pub const fn id(&self) -> CatalogId {
        match self {
            Self::Insert(entry) => entry.id,
            Self::AttachAssets {
                id, ..
            }
            | Self::SetFavorite {
                id, ..
            } => *id,
        }
    }
}

/// Durable keyed collection of catalog entries.
///
/// Mutations are staged and become visible to queries only after
/// [`CatalogStore::commit`] applies them atomically.
pub trait CatalogStore {
    /// Stages a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] when the id is stored or staged.
    fn insert(&self, entry: CatalogEntry) -> Result<(), StoreError>;

    /// Stages artwork bytes for an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the entry does not exist.
    fn attach_assets(&self, id: CatalogId, sprite: Vec<u8>, shiny: Vec<u8>)
    -> Result<(), StoreError>;

    /// Stages a favorite flag change for an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the entry does not exist.
    fn set_favorite(&self, id: CatalogId, favorite: bool) -> Result<(), StoreError>;

    /// Durably applies all staged mutations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] when the write fails; staged
    /// mutations are kept for a later attempt.
    fn commit(&self) -> Result<(), StoreError>;

    /// Returns the committed entry for `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn get(&self, id: CatalogId) -> Result<Option<CatalogEntry>, StoreError>;

    /// Returns true when an entry for `id` is committed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn contains(&self, id: CatalogId) -> Result<bool, StoreError> {
        Ok(self.get(id)?.is_some())
    }

    /// Returns the number of committed entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn count(&self) -> Result<usize, StoreError>;

    /// Returns all committed entries in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn query_all(&self) -> Result<Vec<CatalogEntry>, StoreError>;

    /// Returns committed entries matching `query` in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn query_matching(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>, StoreError>;

    /// Returns committed entries whose sprite is absent, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn missing_assets(&self) -> Result<Vec<CatalogEntry>, StoreError>;
}

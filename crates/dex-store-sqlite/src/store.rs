// crates/dex-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Catalog Store
// Description: Durable CatalogStore backed by SQLite WAL.
// Purpose: Persist catalog entries with staged, transactional commits.
// Dependencies: dex-core, rusqlite, serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! This module implements a durable [`CatalogStore`] using `SQLite`. Inserts,
//! artwork attachments, and favorite changes are queued in memory and written
//! in one transaction by [`CatalogStore::commit`]. A failed transaction rolls
//! back and leaves the queue intact for a later attempt. Rows are validated on
//! read: type lists, stat ranges, and URLs that fail their invariants surface
//! as corruption instead of producing a partial entry.

// ============================================================================//
// SECTION: Imports
// ============================================================================//

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use dex_core::CatalogEntry;
use dex_core::CatalogId;
use dex_core::CatalogQuery;
use dex_core::CatalogStore;
use dex_core::PendingMutation;
use dex_core::StoreError;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Params;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::params;
use rusqlite::params_from_iter;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================//
// SECTION: Constants
// ============================================================================//

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum size of a single artwork blob accepted by the store.
pub const MAX_ASSET_BLOB_BYTES: usize = 16 * 1024 * 1024;
/// Maximum ids bound into one `IN (...)` clause.
const MAX_BOUND_IDS: usize = 500;
/// Column list shared by every entry query.
const ENTRY_COLUMNS: &str = "id, name, types_json, hp, attack, defense, special_attack, \
                             special_defense, speed, sprite_url, shiny_url, sprite, shiny, \
                             favorite";

// ============================================================================//
// SECTION: Config
// ============================================================================//

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` catalog store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a config for `path` with default pragmas.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================//
// SECTION: Errors
// ============================================================================//

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored row failed validation.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store input.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Artwork blob exceeded the size limit.
    #[error("sqlite store blob too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual blob size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) | SqliteStoreError::Db(message) => {
                Self::Persistence(message)
            }
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "artwork blob exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

// ============================================================================//
// SECTION: Store
// ============================================================================//

/// `SQLite`-backed catalog store with WAL support.
///
/// # Invariants
/// - Queries only observe committed rows.
/// - The pending queue is cleared only after its transaction commits.
/// - Lock order is pending queue, then connection.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
    /// Mutations staged since the last commit.
    pending: Arc<Mutex<Vec<PendingMutation>>>,
}

impl SqliteCatalogStore {
    /// Opens an `SQLite`-backed catalog store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
            pending: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Returns the number of staged, uncommitted mutations.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the queue mutex is poisoned.
    pub fn pending_len(&self) -> Result<usize, SqliteStoreError> {
        Ok(self.lock_pending()?.len())
    }

    /// Locks the pending mutation queue.
    fn lock_pending(&self) -> Result<MutexGuard<'_, Vec<PendingMutation>>, SqliteStoreError> {
        self.pending.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }

    /// Locks the connection.
    fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }

    /// Returns true when `id` is committed.
    fn is_committed(&self, id: CatalogId) -> Result<bool, SqliteStoreError> {
        let guard = self.lock_connection()?;
        let found: Option<i64> = guard
            .query_row(
                "SELECT id FROM catalog_entries WHERE id = ?1",
                params![i64::from(id.get())],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(found.is_some())
    }

    /// Returns true when `id` is committed or staged for insertion.
    fn is_known(
        &self,
        pending: &[PendingMutation],
        id: CatalogId,
    ) -> Result<bool, SqliteStoreError> {
        let staged = pending
            .iter()
            .any(|mutation| matches!(mutation, PendingMutation::Insert(entry) if entry.id == id));
        Ok(staged || self.is_committed(id)?)
    }

    /// Stages a mutation against an id that must already exist.
    fn stage_update(&self, mutation: PendingMutation) -> Result<(), StoreError> {
        let mut pending = self.lock_pending()?;
        let id = mutation.id();
        if !self.is_known(&pending, id)? {
            return Err(StoreError::NotFound {
                id,
            });
        }
        pending.push(mutation);
        drop(pending);
        Ok(())
    }

    /// Applies all staged mutations in one transaction.
    fn commit_pending(&self) -> Result<(), SqliteStoreError> {
        let mut pending = self.lock_pending()?;
        if pending.is_empty() {
            return Ok(());
        }
        let now = unix_millis();
        {
            let mut guard = self.lock_connection()?;
            let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            for mutation in pending.iter() {
                apply_mutation(&tx, mutation, now)?;
            }
            tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            drop(guard);
        }
        pending.clear();
        drop(pending);
        Ok(())
    }

    /// Returns ids of committed rows matching `query` without reading blobs.
    fn matching_ids(&self, query: &CatalogQuery) -> Result<Vec<i64>, SqliteStoreError> {
        let guard = self.lock_connection()?;
        let mut statement = guard
            .prepare(
                "SELECT id, name, favorite FROM catalog_entries WHERE ?1 = 0 OR favorite = 1 \
                 ORDER BY id",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = statement
            .query_map(params![query.favorites_only], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, bool>(2)?))
            })
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut ids = Vec::new();
        for row in rows {
            let (id, name, favorite) = row.map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            if query.matches_fields(&name, favorite) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Loads committed rows matching an SQL filter, ascending by id.
    fn load_entries<P: Params>(
        &self,
        filter: &str,
        bindings: P,
    ) -> Result<Vec<CatalogEntry>, SqliteStoreError> {
        let guard = self.lock_connection()?;
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM catalog_entries WHERE {filter} ORDER BY id");
        let mut statement =
            guard.prepare(&sql).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = statement
            .query_map(bindings, StoredRow::read)
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut entries = Vec::new();
        for row in rows {
            let row = row.map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            entries.push(row.into_entry()?);
        }
        Ok(entries)
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn insert(&self, entry: CatalogEntry) -> Result<(), StoreError> {
        validate_entry(&entry)?;
        let mut pending = self.lock_pending()?;
        if self.is_known(&pending, entry.id)? {
            return Err(StoreError::DuplicateKey {
                id: entry.id,
            });
        }
        pending.push(PendingMutation::Insert(entry));
        drop(pending);
        Ok(())
    }

    fn attach_assets(
        &self,
        id: CatalogId,
        sprite: Vec<u8>,
        shiny: Vec<u8>,
    ) -> Result<(), StoreError> {
        enforce_blob_limit(&sprite)?;
        enforce_blob_limit(&shiny)?;
        self.stage_update(PendingMutation::AttachAssets {
            id,
            sprite,
            shiny,
        })
    }

    fn set_favorite(&self, id: CatalogId, favorite: bool) -> Result<(), StoreError> {
        self.stage_update(PendingMutation::SetFavorite {
            id,
            favorite,
        })
    }

    fn commit(&self) -> Result<(), StoreError> {
        self.commit_pending().map_err(StoreError::from)
    }

    fn get(&self, id: CatalogId) -> Result<Option<CatalogEntry>, StoreError> {
        let guard = self.lock_connection()?;
        let row = guard
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM catalog_entries WHERE id = ?1"),
                params![i64::from(id.get())],
                StoredRow::read,
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(row.map(StoredRow::into_entry).transpose()?)
    }

    fn contains(&self, id: CatalogId) -> Result<bool, StoreError> {
        Ok(self.is_committed(id)?)
    }

    fn count(&self) -> Result<usize, StoreError> {
        let guard = self.lock_connection()?;
        let count: i64 = guard
            .query_row("SELECT COUNT(*) FROM catalog_entries", params![], |row| row.get(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        usize::try_from(count)
            .map_err(|_| StoreError::Corrupt(format!("invalid entry count: {count}")))
    }

    fn query_all(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        Ok(self.load_entries("1 = 1", params![])?)
    }

    fn query_matching(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>, StoreError> {
        let ids = self.matching_ids(query)?;
        let mut entries = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(MAX_BOUND_IDS) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            entries.extend(
                self.load_entries(&format!("id IN ({placeholders})"), params_from_iter(chunk))?,
            );
        }
        Ok(entries)
    }

    fn missing_assets(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        Ok(self.load_entries("sprite IS NULL", params![])?)
    }
}

// ============================================================================//
// SECTION: Rows
// ============================================================================//

/// Raw column values of one `catalog_entries` row.
struct StoredRow {
    /// Entry id.
    id: i64,
    /// Entry name.
    name: String,
    /// JSON array of type names.
    types_json: String,
    /// Stats in canonical order.
    stats: [i64; 6],
    /// Default artwork URL.
    sprite_url: String,
    /// Shiny artwork URL.
    shiny_url: String,
    /// Default artwork bytes.
    sprite: Option<Vec<u8>>,
    /// Shiny artwork bytes.
    shiny: Option<Vec<u8>>,
    /// Favorite flag.
    favorite: bool,
}

impl StoredRow {
    /// Reads a row selected with [`ENTRY_COLUMNS`].
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            types_json: row.get(2)?,
            stats: [row.get(3)?, row.get(4)?, row.get(5)?, row.get(6)?, row.get(7)?, row.get(8)?],
            sprite_url: row.get(9)?,
            shiny_url: row.get(10)?,
            sprite: row.get(11)?,
            shiny: row.get(12)?,
            favorite: row.get(13)?,
        })
    }

    /// Validates the row and converts it into an entry.
    fn into_entry(self) -> Result<CatalogEntry, SqliteStoreError> {
        let id = u32::try_from(self.id)
            .map(CatalogId::new)
            .map_err(|_| SqliteStoreError::Corrupt(format!("invalid entry id: {}", self.id)))?;
        let types: Vec<String> = serde_json::from_str(&self.types_json)
            .map_err(|err| SqliteStoreError::Corrupt(format!("entry {id}: types_json: {err}")))?;
        if types.is_empty() || types.len() > 2 {
            return Err(SqliteStoreError::Corrupt(format!(
                "entry {id}: expected one or two types, found {}",
                types.len()
            )));
        }
        let mut stats = [0_i16; 6];
        for (target, raw) in stats.iter_mut().zip(self.stats) {
            *target = i16::try_from(raw)
                .map_err(|_| SqliteStoreError::Corrupt(format!("entry {id}: stat {raw} out of range")))?;
        }
        let [hp, attack, defense, special_attack, special_defense, speed] = stats;
        Ok(CatalogEntry {
            id,
            name: self.name,
            types,
            hp,
            attack,
            defense,
            special_attack,
            special_defense,
            speed,
            sprite_url: parse_url(id, &self.sprite_url)?,
            shiny_url: parse_url(id, &self.shiny_url)?,
            sprite: self.sprite,
            shiny: self.shiny,
            favorite: self.favorite,
        })
    }
}

/// Parses a stored artwork URL.
fn parse_url(id: CatalogId, raw: &str) -> Result<Url, SqliteStoreError> {
    Url::parse(raw).map_err(|err| SqliteStoreError::Corrupt(format!("entry {id}: url: {err}")))
}

/// Writes one staged mutation inside a transaction.
fn apply_mutation(
    tx: &Transaction<'_>,
    mutation: &PendingMutation,
    now: i64,
) -> Result<(), SqliteStoreError> {
    match mutation {
        PendingMutation::Insert(entry) => {
            let types_json = serde_json::to_string(&entry.types)
                .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
            tx.execute(
                "INSERT INTO catalog_entries (id, name, types_json, hp, attack, defense, \
                 special_attack, special_defense, speed, sprite_url, shiny_url, sprite, shiny, \
                 favorite, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, \
                 ?10, ?11, ?12, ?13, ?14, ?15, ?15)",
                params![
                    i64::from(entry.id.get()),
                    entry.name,
                    types_json,
                    entry.hp,
                    entry.attack,
                    entry.defense,
                    entry.special_attack,
                    entry.special_defense,
                    entry.speed,
                    entry.sprite_url.as_str(),
                    entry.shiny_url.as_str(),
                    entry.sprite,
                    entry.shiny,
                    entry.favorite,
                    now
                ],
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        PendingMutation::AttachAssets {
            id,
            sprite,
            shiny,
        } => {
            let changed = tx
                .execute(
                    "UPDATE catalog_entries SET sprite = ?2, shiny = ?3, updated_at = ?4 WHERE id \
                     = ?1",
                    params![i64::from(id.get()), sprite, shiny, now],
                )
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            ensure_updated(*id, changed)?;
        }
        PendingMutation::SetFavorite {
            id,
            favorite,
        } => {
            let changed = tx
                .execute(
                    "UPDATE catalog_entries SET favorite = ?2, updated_at = ?3 WHERE id = ?1",
                    params![i64::from(id.get()), favorite, now],
                )
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            ensure_updated(*id, changed)?;
        }
    }
    Ok(())
}

/// Fails when an update touched no row.
fn ensure_updated(id: CatalogId, changed: usize) -> Result<(), SqliteStoreError> {
    if changed == 0 {
        return Err(SqliteStoreError::Db(format!("entry {id} vanished before commit")));
    }
    Ok(())
}

// ============================================================================//
// SECTION: Helpers
// ============================================================================//

/// Checks entry invariants before staging.
fn validate_entry(entry: &CatalogEntry) -> Result<(), SqliteStoreError> {
    if entry.types.is_empty() || entry.types.len() > 2 {
        return Err(SqliteStoreError::Invalid(format!(
            "entry {}: expected one or two types, found {}",
            entry.id,
            entry.types.len()
        )));
    }
    if let Some(sprite) = &entry.sprite {
        enforce_blob_limit(sprite)?;
    }
    if let Some(shiny) = &entry.shiny {
        enforce_blob_limit(shiny)?;
    }
    Ok(())
}

/// Rejects artwork blobs above [`MAX_ASSET_BLOB_BYTES`].
fn enforce_blob_limit(blob: &[u8]) -> Result<(), SqliteStoreError> {
    if blob.len() > MAX_ASSET_BLOB_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_ASSET_BLOB_BYTES,
            actual_bytes: blob.len(),
        });
    }
    Ok(())
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS catalog_entries (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    types_json TEXT NOT NULL,
                    hp INTEGER NOT NULL,
                    attack INTEGER NOT NULL,
                    defense INTEGER NOT NULL,
                    special_attack INTEGER NOT NULL,
                    special_defense INTEGER NOT NULL,
                    speed INTEGER NOT NULL,
                    sprite_url TEXT NOT NULL,
                    shiny_url TEXT NOT NULL,
                    sprite BLOB,
                    shiny BLOB,
                    favorite INTEGER NOT NULL DEFAULT 0,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_catalog_entries_missing_sprite
                    ON catalog_entries (id) WHERE sprite IS NULL;",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

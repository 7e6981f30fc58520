// crates/dex-core/src/runtime/store.rs
// ============================================================================
// Module: Dex In-Memory Store
// Description: Simple in-memory catalog store for tests and examples.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of [`CatalogStore`] with
//! the same staging semantics as the durable backends: mutations queue until
//! commit, and queries only observe committed state. It is not intended for
//! production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::CatalogEntry;
use crate::core::CatalogId;
use crate::core::CatalogQuery;
use crate::interfaces::CatalogStore;
use crate::interfaces::PendingMutation;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Committed entries plus the queue of staged mutations.
#[derive(Debug, Default)]
struct InMemoryState {
    /// Entries visible to queries.
    committed: BTreeMap<CatalogId, CatalogEntry>,
    /// Mutations awaiting commit, in staging order.
    pending: Vec<PendingMutation>,
}

impl InMemoryState {
    /// Returns true when `id` is committed or staged for insertion.
    fn knows(&self, id: CatalogId) -> bool {
        self.committed.contains_key(&id)
            || self
                .pending
                .iter()
                .any(|mutation| matches!(mutation, PendingMutation::Insert(entry) if entry.id == id))
    }
}

/// In-memory catalog store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogStore {
    /// Store state protected by a mutex.
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryCatalogStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with committed entries.
    ///
    /// Later entries with a repeated id replace earlier ones.
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let committed = entries.into_iter().map(|entry| (entry.id, entry)).collect();
        Self {
            state: Arc::new(Mutex::new(InMemoryState {
                committed,
                pending: Vec::new(),
            })),
        }
    }

    /// Returns the number of staged, uncommitted mutations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn pending_len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.pending.len())
    }

    /// Locks the store state.
    fn lock(&self) -> Result<MutexGuard<'_, InMemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Persistence("catalog store mutex poisoned".to_string()))
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn insert(&self, entry: CatalogEntry) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if guard.knows(entry.id) {
            return Err(StoreError::DuplicateKey {
                id: entry.id,
            });
        }
        guard.pending.push(PendingMutation::Insert(entry));
        Ok(())
    }

    fn attach_assets(
        &self,
        id: CatalogId,
        sprite: Vec<u8>,
        shiny: Vec<u8>,
    ) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if !guard.knows(id) {
            return Err(StoreError::NotFound {
                id,
            });
        }
        guard.pending.push(PendingMutation::AttachAssets {
            id,
            sprite,
            shiny,
        });
        Ok(())
    }

    fn set_favorite(&self, id: CatalogId, favorite: bool) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if !guard.knows(id) {
            return Err(StoreError::NotFound {
                id,
            });
        }
        guard.pending.push(PendingMutation::SetFavorite {
            id,
            favorite,
        });
        Ok(())
    }

    fn commit(&self) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if guard.pending.is_empty() {
            return Ok(());
        }
        let mut next = guard.committed.clone();
        for mutation in &guard.pending {
            apply_mutation(&mut next, mutation)?;
        }
        guard.committed = next;
        guard.pending.clear();
        Ok(())
    }

    fn get(&self, id: CatalogId) -> Result<Option<CatalogEntry>, StoreError> {
        Ok(self.lock()?.committed.get(&id).cloned())
    }

    fn contains(&self, id: CatalogId) -> Result<bool, StoreError> {
        Ok(self.lock()?.committed.contains_key(&id))
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.committed.len())
    }

    fn query_all(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        Ok(self.lock()?.committed.values().cloned().collect())
    }

    fn query_matching(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>, StoreError> {
        Ok(self.lock()?.committed.values().filter(|entry| query.matches(entry)).cloned().collect())
    }

    fn missing_assets(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        Ok(self
            .lock()?
            .committed
            .values()
            .filter(|entry| entry.sprite.is_none())
            .cloned()
            .collect())
    }
}

/// Applies one staged mutation to a working copy of committed state.
fn apply_mutation(
    entries: &mut BTreeMap<CatalogId, CatalogEntry>,
    mutation: &PendingMutation,
) -> Result<(), StoreError> {
    match mutation {
        PendingMutation::Insert(entry) => {
            if entries.contains_key(&entry.id) {
                return Err(StoreError::DuplicateKey {
                    id: entry.id,
                });
            }
            entries.insert(entry.id, entry.clone());
        }
        PendingMutation::AttachAssets {
            id,
            sprite,
            shiny,
        } => {
            let entry = entries.get_mut(id).ok_or(StoreError::NotFound {
                id: *id,
            })?;
            entry.sprite = Some(sprite.clone());
            entry.shiny = Some(shiny.clone());
        }
        PendingMutation::SetFavorite {
            id,
            favorite,
        } => {
            let entry = entries.get_mut(id).ok_or(StoreError::NotFound {
                id: *id,
            })?;
            entry.favorite = *favorite;
        }
    }
    Ok(())
}

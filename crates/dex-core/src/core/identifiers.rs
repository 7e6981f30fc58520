// crates/dex-core/src/core/identifiers.rs
// ============================================================================
// Module: Dex Identifiers
// Description: Catalog identifiers and half-open id ranges.
// Purpose: Provide strongly typed ids with stable numeric forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Catalog ids are the upstream numeric record ids. They are stable across
//! runs and serialize as plain integers. [`IdRange`] describes the half-open
//! span walked by a synchronization pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Catalog record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(u32);

impl CatalogId {
    /// Creates a new catalog identifier.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw numeric identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the following identifier, saturating at `u32::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u32> for CatalogId {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Ranges
// ============================================================================

/// Half-open range of catalog ids: `[start, end)`.
///
/// # Invariants
/// - A range whose `end` is not greater than `start` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRange {
    /// First id included in the range.
    pub start: CatalogId,
    /// First id excluded from the range.
    pub end: CatalogId,
}

impl IdRange {
    /// Creates a range covering `[start, end)`.
    #[must_use]
    pub const fn new(start: CatalogId, end: CatalogId) -> Self {
        Self {
            start,
            end,
        }
    }

    /// Creates a range from `start` through `last` inclusive.
    #[must_use]
    pub const fn through(start: CatalogId, last: CatalogId) -> Self {
        Self::new(start, last.next())
    }

    /// Returns the number of ids in the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.get().saturating_sub(self.start.get()) as usize
    }

    /// Returns true when the range contains no ids.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end.get() <= self.start.get()
    }

    /// Returns true when `id` falls inside the range.
    #[must_use]
    pub const fn contains(&self, id: CatalogId) -> bool {
        id.get() >= self.start.get() && id.get() < self.end.get()
    }

    /// Iterates ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = CatalogId> + use<> {
        (self.start.get() .. self.end.get()).map(CatalogId::new)
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

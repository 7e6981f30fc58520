// crates/dex-core/src/core/query.rs
// ============================================================================
// Module: Dex Catalog Queries
// Description: Search filters and catalog completeness summaries.
// Purpose: Share one predicate definition across every store backend.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`CatalogQuery`] combines an optional case-insensitive name fragment with an
//! optional favorites filter. Both filters are conjunctive; an empty query
//! matches every entry. [`CatalogStatus`] reports whether the local catalog
//! covers the expected id span so callers can offer a resume action.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::entry::CatalogEntry;
use crate::core::identifiers::CatalogId;

// ============================================================================
// SECTION: Query
// ============================================================================

/// Name and favorite filter for catalog listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive name fragment; blank values are ignored.
    pub name_contains: Option<String>,
    /// Restrict results to favorites.
    pub favorites_only: bool,
}

impl CatalogQuery {
    /// Returns a query that matches every entry.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a query from raw search text and the favorites toggle.
    #[must_use]
    pub fn new(text: Option<&str>, favorites_only: bool) -> Self {
        Self {
            name_contains: text.map(str::to_string),
            favorites_only,
        }
    }

    /// Returns the lowercase name fragment when one is set and non-blank.
    ///
    /// Surrounding whitespace is kept; only an all-blank fragment is ignored.
    #[must_use]
    pub fn normalized_pattern(&self) -> Option<String> {
        self.name_contains
            .as_deref()
            .filter(|pattern| !pattern.trim().is_empty())
            .map(str::to_lowercase)
    }

    /// Returns true when `entry` satisfies every active filter.
    #[must_use]
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        self.matches_fields(&entry.name, entry.favorite)
    }

    /// Returns true when an entry with this name and favorite flag satisfies
    /// every active filter.
    #[must_use]
    pub fn matches_fields(&self, name: &str, favorite: bool) -> bool {
        if self.favorites_only && !favorite {
            return false;
        }
        self.normalized_pattern().is_none_or(|pattern| name.to_lowercase().contains(&pattern))
    }
}

// ============================================================================
// SECTION: Status
// ============================================================================

/// Completeness summary of the local catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStatus {
    /// Number of entries stored locally.
    pub stored: usize,
    /// Number of entries the full catalog is expected to hold.
    pub expected: usize,
    /// Number of stored entries still waiting for sprite assets.
    pub missing_assets: usize,
    /// Lowest id not yet stored.
    pub resume_at: CatalogId,
}

impl CatalogStatus {
    /// Returns true when the store holds at least the expected entry count.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.stored >= self.expected
    }

    /// Returns the resume position: the lowest id not yet stored.
    ///
    /// Equals the stored count plus one when stored ids are contiguous.
    #[must_use]
    pub const fn next_id(&self) -> CatalogId {
        self.resume_at
    }

    /// Returns the number of entries still to fetch.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.expected.saturating_sub(self.stored)
    }
}

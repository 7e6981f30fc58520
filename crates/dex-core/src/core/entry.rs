// crates/dex-core/src/core/entry.rs
// ============================================================================
// Module: Dex Catalog Records
// Description: Wire-derived records and persisted catalog entries.
// Purpose: Normalize upstream creature data into a flat, typed layout.
// Dependencies: serde, url
// ============================================================================

//! ## Overview
//! A [`RemoteRecord`] is produced once per successful decode and is never
//! persisted directly. The synchronizer converts it into a [`CatalogEntry`],
//! which adds local-only state: optional sprite blobs and the favorite flag.
//! Invariants:
//! - `types` holds one or two names.
//! - All six base stats are always populated.
//! - `sprite` and `shiny` stay `None` until the backfill pass attaches them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::core::identifiers::CatalogId;

// ============================================================================
// SECTION: Stats
// ============================================================================

/// Base stat kinds in canonical upstream order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatKind {
    /// Hit points.
    Hp,
    /// Physical attack.
    Attack,
    /// Physical defense.
    Defense,
    /// Special attack.
    SpecialAttack,
    /// Special defense.
    SpecialDefense,
    /// Speed.
    Speed,
}

impl StatKind {
    /// All stat kinds in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Hp,
        Self::Attack,
        Self::Defense,
        Self::SpecialAttack,
        Self::SpecialDefense,
        Self::Speed,
    ];

    /// Returns a stable label for the stat.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hp => "hp",
            Self::Attack => "attack",
            Self::Defense => "defense",
            Self::SpecialAttack => "special-attack",
            Self::SpecialDefense => "special-defense",
            Self::Speed => "speed",
        }
    }
}

/// The six base stats of a catalog record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    /// Hit points.
    pub hp: i16,
    /// Physical attack.
    pub attack: i16,
    /// Physical defense.
    pub defense: i16,
    /// Special attack.
    pub special_attack: i16,
    /// Special defense.
    pub special_defense: i16,
    /// Speed.
    pub speed: i16,
}

impl BaseStats {
    /// Builds stats from values in canonical order
    /// `[hp, attack, defense, special_attack, special_defense, speed]`.
    #[must_use]
    pub const fn from_array(values: [i16; 6]) -> Self {
        let [hp, attack, defense, special_attack, special_defense, speed] = values;
        Self {
            hp,
            attack,
            defense,
            special_attack,
            special_defense,
            speed,
        }
    }

    /// Returns the stats in canonical order.
    #[must_use]
    pub const fn to_array(self) -> [i16; 6] {
        [self.hp, self.attack, self.defense, self.special_attack, self.special_defense, self.speed]
    }
}

// ============================================================================
// SECTION: Remote Record
// ============================================================================

/// Normalized record decoded from a single upstream payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRecord {
    /// Upstream record identifier.
    pub id: CatalogId,
    /// Record name as published upstream.
    pub name: String,
    /// One or two type names in display order.
    pub types: Vec<String>,
    /// Base stats in canonical order.
    pub base_stats: BaseStats,
    /// Default artwork URL.
    pub sprite_url: Url,
    /// Shiny artwork URL.
    pub shiny_url: Url,
}

// ============================================================================
// SECTION: Catalog Entry
// ============================================================================

/// Persisted catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique record identifier.
    pub id: CatalogId,
    /// Record name.
    pub name: String,
    /// One or two type names in display order.
    pub types: Vec<String>,
    /// Hit points.
    pub hp: i16,
    /// Physical attack.
    pub attack: i16,
    /// Physical defense.
    pub defense: i16,
    /// Special attack.
    pub special_attack: i16,
    /// Special defense.
    pub special_defense: i16,
    /// Speed.
    pub speed: i16,
    /// Default artwork URL.
    pub sprite_url: Url,
    /// Shiny artwork URL.
    pub shiny_url: Url,
    /// Default artwork bytes, once backfilled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<Vec<u8>>,
    /// Shiny artwork bytes, once backfilled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shiny: Option<Vec<u8>>,
    /// User favorite flag.
    #[serde(default)]
    pub favorite: bool,
}

impl CatalogEntry {
    /// Builds a fresh entry from a decoded record: not a favorite, no assets.
    #[must_use]
    pub fn from_remote(record: RemoteRecord) -> Self {
        let stats = record.base_stats;
        Self {
            id: record.id,
            name: record.name,
            types: record.types,
            hp: stats.hp,
            attack: stats.attack,
            defense: stats.defense,
            special_attack: stats.special_attack,
            special_defense: stats.special_defense,
            speed: stats.speed,
            sprite_url: record.sprite_url,
            shiny_url: record.shiny_url,
            sprite: None,
            shiny: None,
            favorite: false,
        }
    }

    /// Returns the base stats as a grouped value.
    #[must_use]
    pub const fn base_stats(&self) -> BaseStats {
        BaseStats {
            hp: self.hp,
            attack: self.attack,
            defense: self.defense,
            special_attack: self.special_attack,
            special_defense: self.special_defense,
            speed: self.speed,
        }
    }

    /// Returns labeled stats in canonical order.
    #[must_use]
    pub fn stats(&self) -> [(StatKind, i16); 6] {
        let values = self.base_stats().to_array();
        let mut labeled = [(StatKind::Hp, 0); 6];
        for (slot, (kind, value)) in labeled.iter_mut().zip(StatKind::ALL.into_iter().zip(values)) {
            *slot = (kind, value);
        }
        labeled
    }

    /// Returns the highest stat; the earliest stat wins ties.
    #[must_use]
    pub fn highest_stat(&self) -> (StatKind, i16) {
        let stats = self.stats();
        let mut best = stats[0];
        for candidate in stats.into_iter().skip(1) {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }
        best
    }

    /// Returns the sum of all six stats.
    #[must_use]
    pub fn total_stats(&self) -> i32 {
        self.base_stats().to_array().into_iter().map(i32::from).sum()
    }

    /// Returns true when both artwork blobs are attached.
    #[must_use]
    pub const fn has_assets(&self) -> bool {
        self.sprite.is_some() && self.shiny.is_some()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

// crates/dex-cli/src/render.rs
// ============================================================================
// Module: CLI Output Rendering
// Description: Text and JSON views of entries, status, and pass reports.
// Purpose: Format catalog data for the terminal without touching stdout.
// Dependencies: dex-core, serde
// ============================================================================

//! ## Overview
//! Renderers return lines; the binary decides where they go. JSON output uses
//! [`EntryView`], which reports whether artwork is stored instead of
//! embedding the blobs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use dex_core::BackfillReport;
use dex_core::CatalogEntry;
use dex_core::CatalogStatus;
use dex_core::SyncFailure;
use dex_core::SyncReport;
use serde::Serialize;

use crate::t;

// ============================================================================
// SECTION: Views
// ============================================================================

/// One base stat in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatView {
    /// Stat label.
    pub stat: &'static str,
    /// Base value.
    pub value: i16,
}

/// Serializable summary of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    /// Catalog id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Ordered type names.
    pub types: Vec<String>,
    /// Base stats in canonical order.
    pub stats: Vec<StatView>,
    /// Sum of base stats.
    pub total: i32,
    /// Default artwork location.
    pub sprite_url: String,
    /// Shiny artwork location.
    pub shiny_url: String,
    /// True once both artwork blobs are stored.
    pub has_artwork: bool,
    /// Favorite flag.
    pub favorite: bool,
}

impl From<&CatalogEntry> for EntryView {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.get(),
            name: entry.name.clone(),
            types: entry.types.clone(),
            stats: entry
                .stats()
                .iter()
                .map(|(kind, value)| StatView {
                    stat: kind.as_str(),
                    value: *value,
                })
                .collect(),
            total: entry.total_stats(),
            sprite_url: entry.sprite_url.to_string(),
            shiny_url: entry.shiny_url.to_string(),
            has_artwork: entry.has_assets(),
            favorite: entry.favorite,
        }
    }
}

// ============================================================================
// SECTION: Entries
// ============================================================================

/// Renders the one-line listing form of an entry.
#[must_use]
pub fn entry_line(entry: &CatalogEntry) -> String {
    let marker = if entry.favorite { t!("list.favorite_marker") } else { String::new() };
    t!(
        "list.entry",
        id = entry.id,
        name = entry.name,
        types = entry.types.join("/"),
        marker = marker
    )
}

/// Renders the detail view of an entry.
#[must_use]
pub fn entry_detail(entry: &CatalogEntry) -> Vec<String> {
    let (highest, _) = entry.highest_stat();
    let mut lines = vec![
        t!("show.header", id = entry.id, name = entry.name),
        t!("show.types", types = entry.types.join(", ")),
        t!("show.stats_header", total = entry.total_stats(), highest = highest.as_str()),
    ];
    for (kind, value) in entry.stats() {
        lines.push(t!("show.stat", stat = kind.as_str(), value = value));
    }
    let artwork =
        if entry.has_assets() { t!("show.artwork.stored") } else { t!("show.artwork.missing") };
    lines.push(t!("show.artwork", status = artwork));
    let favorite = if entry.favorite { t!("show.favorite.yes") } else { t!("show.favorite.no") };
    lines.push(t!("show.favorite", value = favorite));
    lines
}

// ============================================================================
// SECTION: Status and Reports
// ============================================================================

/// Renders the catalog status summary.
#[must_use]
pub fn status_lines(status: &CatalogStatus) -> Vec<String> {
    let summary = t!(
        "status.summary",
        stored = status.stored,
        expected = status.expected,
        missing = status.missing_assets
    );
    let detail = if status.is_complete() {
        t!("status.complete")
    } else {
        t!("status.incomplete", remaining = status.remaining(), next = status.next_id())
    };
    vec![summary, detail]
}

/// Renders a sync pass report, including its backfill pass.
#[must_use]
pub fn sync_lines(report: &SyncReport) -> Vec<String> {
    let mut lines = vec![t!(
        "sync.summary",
        range = report.requested,
        stored = report.stored.len(),
        present = report.present.len(),
        failed = report.failures.len()
    )];
    lines.extend(report.failures.iter().map(failure_line));
    lines.extend(backfill_lines(&report.backfill));
    lines
}

/// Renders a backfill pass report.
#[must_use]
pub fn backfill_lines(report: &BackfillReport) -> Vec<String> {
    let mut lines = vec![t!(
        "backfill.summary",
        attached = report.attached.len(),
        candidates = report.candidates,
        failed = report.failures.len()
    )];
    lines.extend(report.failures.iter().map(failure_line));
    lines
}

/// Renders one per-id failure.
fn failure_line(failure: &SyncFailure) -> String {
    t!(
        "sync.failure.entry",
        id = failure.id,
        phase = failure.phase.as_str(),
        kind = failure.kind,
        message = failure.message
    )
}

// crates/dex-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Message catalog and translation utilities for the CLI.
// Purpose: Keep user-facing strings in one place with named placeholders.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! Every line the `dex` binary prints is looked up by key in a static catalog
//! and formatted with named `{placeholder}` arguments. Route output through
//! the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
/// - `value` is preformatted and safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "dex {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.json_failed", "Failed to render JSON output: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config OK (source {base_url}, store {store}, {total} entries expected)."),
    ("store.open_failed", "Failed to open the catalog store at {path}: {error}"),
    ("store.read_failed", "Failed to read the catalog store: {error}"),
    ("fetch.init_failed", "Failed to initialize the HTTP client: {error}"),
    ("log.open_failed", "Failed to open the sync log at {path}: {error}"),
    ("sync.invalid_id", "Invalid {field} value: {value}. Must be >= 1."),
    ("sync.failed", "Sync aborted: {error}"),
    (
        "sync.summary",
        "Sync {range}: {stored} stored, {present} already present, {failed} failed.",
    ),
    ("sync.failure.entry", "- #{id} ({phase}, {kind}): {message}"),
    ("backfill.failed", "Backfill aborted: {error}"),
    (
        "backfill.summary",
        "Backfill: {attached} of {candidates} entries received artwork, {failed} failed.",
    ),
    (
        "status.summary",
        "Catalog: {stored}/{expected} entries stored, {missing} missing artwork.",
    ),
    ("status.complete", "Catalog complete."),
    (
        "status.incomplete",
        "Catalog incomplete: {remaining} entries remaining. Run `dex sync` to resume from #{next}.",
    ),
    ("list.none", "No entries match."),
    ("list.entry", "#{id} {name} [{types}]{marker}"),
    ("list.favorite_marker", " *"),
    ("show.not_found", "No entry with id {id}."),
    ("show.header", "#{id} {name}"),
    ("show.types", "Types: {types}"),
    ("show.stats_header", "Base stats (total {total}, highest {highest}):"),
    ("show.stat", "  {stat}: {value}"),
    ("show.artwork", "Artwork: {status}"),
    ("show.artwork.stored", "stored"),
    ("show.artwork.missing", "missing"),
    ("show.favorite", "Favorite: {value}"),
    ("show.favorite.yes", "yes"),
    ("show.favorite.no", "no"),
    ("favorite.on", "#{id} {name} is now a favorite."),
    ("favorite.off", "#{id} {name} is no longer a favorite."),
    ("favorite.failed", "Failed to toggle favorite for #{id}: {error}"),
    ("random.empty", "The catalog is empty. Run `dex sync` first."),
];

/// Returns the message catalog.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Looks up `key` and substitutes `args` into its placeholders.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}

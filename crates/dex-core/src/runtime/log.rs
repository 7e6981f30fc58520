// crates/dex-core/src/runtime/log.rs
// ============================================================================
// Module: Dex Sync Logging
// Description: Structured events for synchronization and backfill passes.
// Purpose: Emit JSON-line sync logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every per-record outcome of a sync or backfill pass is reported as a
//! [`SyncEvent`] to a [`SyncLogSink`]. Sinks serialize events as one JSON
//! object per line so deployments can route them to their preferred logging
//! pipeline. Events never carry asset bytes or raw payload bodies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::CatalogId;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Pipeline stage that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// Remote record fetch and decode.
    Fetch,
    /// Local store insert or commit.
    Store,
    /// Asset backfill for one entry.
    Backfill,
    /// Whole-pass summary.
    Pass,
}

impl SyncPhase {
    /// Returns the serialized label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Store => "store",
            Self::Backfill => "backfill",
            Self::Pass => "pass",
        }
    }
}

/// Event outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The step succeeded.
    Ok,
    /// The step failed.
    Error,
}

/// Structured sync log event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Pipeline stage.
    pub phase: SyncPhase,
    /// Record identifier when the event concerns one record.
    pub id: Option<CatalogId>,
    /// Step outcome.
    pub outcome: SyncOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Human-readable detail.
    pub message: Option<String>,
}

impl SyncEvent {
    /// Creates a success event with a consistent timestamp.
    #[must_use]
    pub fn ok(event: &'static str, phase: SyncPhase, id: Option<CatalogId>) -> Self {
        Self {
            event,
            timestamp_ms: now_millis(),
            phase,
            id,
            outcome: SyncOutcome::Ok,
            error_kind: None,
            message: None,
        }
    }

    /// Creates a failure event with a consistent timestamp.
    #[must_use]
    pub fn error(
        event: &'static str,
        phase: SyncPhase,
        id: Option<CatalogId>,
        error_kind: &'static str,
        message: String,
    ) -> Self {
        Self {
            event,
            timestamp_ms: now_millis(),
            phase,
            id,
            outcome: SyncOutcome::Error,
            error_kind: Some(error_kind),
            message: Some(message),
        }
    }

    /// Attaches a detail message.
    #[must_use]
    pub fn with_message(mut self, message: String) -> Self {
        self.message = Some(message);
        self
    }
}

/// Returns the current unix epoch in milliseconds.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for sync log events.
pub trait SyncLogSink: Send + Sync {
    /// Records a sync event.
    fn record(&self, event: &SyncEvent);
}

/// Sink that discards events.
pub struct NoopSyncLog;

impl SyncLogSink for NoopSyncLog {
    fn record(&self, _event: &SyncEvent) {}
}

/// Sink that logs JSON lines to stderr.
pub struct StderrSyncLog;

impl SyncLogSink for StderrSyncLog {
    fn record(&self, event: &SyncEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileSyncLog {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileSyncLog {
    /// Opens the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl SyncLogSink for FileSyncLog {
    fn record(&self, event: &SyncEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

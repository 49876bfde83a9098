//! Engine types
//!
//! Configuration, statistics and outcome of a full sync.

use crate::types::JsonObject;
use serde::Serialize;

/// Configuration for sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Maximum pages to fetch (0 = unlimited)
    pub max_pages: usize,
    /// Stop after the page that reaches this many records (0 = unlimited)
    pub max_records: usize,
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max pages
    #[must_use]
    pub fn with_max_pages(mut self, max: usize) -> Self {
        self.max_pages = max;
        self
    }

    /// Set max records
    #[must_use]
    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = max;
        self
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Total records synced
    pub records_synced: usize,
    /// Successful pages fetched
    pub pages_fetched: usize,
    /// Successful pages that carried no records
    pub empty_pages: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful page
    pub fn add_page(&mut self, records: usize) {
        self.pages_fetched += 1;
        self.records_synced += records;
        if records == 0 {
            self.empty_pages += 1;
        }
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Why a sync run stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncStatus {
    /// The adapter returned the terminal empty cursor
    Complete,
    /// The vendor answered with a non-2xx status
    Interrupted {
        /// Vendor HTTP status
        status_code: u16,
        /// Vendor `Retry-After` header
        retry_after: Option<String>,
    },
    /// A page or record limit was reached first
    LimitReached,
}

/// Result of a sync run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncOutcome {
    /// Why the run stopped
    pub status: SyncStatus,
    /// Records in page order
    pub objects: Vec<JsonObject>,
    /// Cursor to resume with, empty once complete
    pub resume_cursor: String,
    /// Statistics for this run
    pub stats: SyncStats,
}

impl SyncOutcome {
    /// The full sync finished
    pub fn is_complete(&self) -> bool {
        self.status == SyncStatus::Complete
    }
}

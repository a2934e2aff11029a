//! Result records for a migration run.

use crate::error::PostError;
use serde::{Deserialize, Serialize};

/// What happened to one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOutcome {
    /// 0-indexed position in the export.
    pub index: usize,
    pub title: String,
    /// Number of raw (and therefore converted) lines.
    pub line_count: usize,
    /// HTTP status returned by the server, if the request went out.
    pub status: Option<u16>,
    /// Set when the page could not be sent.
    pub error: Option<PostError>,
}

impl PageOutcome {
    /// The request reached the server (whatever it answered).
    pub fn is_published(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStats {
    pub total_pages: usize,
    /// Pages whose create-post call got an HTTP response.
    pub published_pages: usize,
    /// Pages that failed to encode, build, or send.
    pub failed_pages: usize,
    /// Published pages whose response status was not 2xx.
    pub rejected_pages: usize,
    pub total_duration_ms: u64,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Scrapbox project name from the export header.
    pub export_name: String,
    pub pages: Vec<PageOutcome>,
    pub stats: MigrationStats,
}

impl MigrationReport {
    /// Pages that failed to publish, in export order.
    pub fn failed(&self) -> impl Iterator<Item = &PageOutcome> {
        self.pages.iter().filter(|p| !p.is_published())
    }
}

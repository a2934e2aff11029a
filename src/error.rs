//! Error types for the scrapbox2esa library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`MigrateError`] — **Fatal**: the migration cannot start at all (the
//!   export file is missing or malformed, the configuration is invalid).
//!   Returned as `Err(MigrateError)` from the top-level `migrate*` functions,
//!   always before the first post is sent.
//!
//! * [`PostError`] — **Non-fatal**: publishing a single page failed (payload
//!   encoding, request construction, network). Stored inside
//!   [`crate::output::PageOutcome`]; the remaining pages are still published.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the scrapbox2esa library.
///
/// Page-level publishing failures use [`PostError`] and are stored in
/// [`crate::output::PageOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum MigrateError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Export file was not found at the given path.
    #[error("Export file not found: '{path}'\nCheck the path exists and is readable.")]
    ExportNotFound { path: PathBuf },

    /// Process does not have read permission on the export file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading the export failed for another I/O reason.
    #[error("Failed to read export '{path}': {source}")]
    ExportUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export was read but is not a well-formed Scrapbox export.
    #[error("Export '{path}' is not a valid Scrapbox export: {detail}")]
    MalformedExport { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A built-in markup rule failed to compile.
    #[error("Markup rule '{rule}' failed to compile: {source}")]
    InvalidPattern {
        rule: &'static str,
        #[source]
        source: regex::Error,
    },

    // ── HTTP errors ───────────────────────────────────────────────────────
    /// The HTTP client could not be initialised (TLS backend etc.).
    #[error("Failed to initialise HTTP client: {0}")]
    HttpClient(String),
}

/// A non-fatal error for a single page.
///
/// Stored alongside [`crate::output::PageOutcome`] when publishing fails.
/// The migration moves on to the next page regardless; nothing is retried.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PostError {
    /// The post payload could not be JSON-encoded.
    #[error("'{title}': failed to encode post payload: {detail}")]
    Encode { title: String, detail: String },

    /// The HTTP request could not be built.
    #[error("'{title}': failed to build request: {detail}")]
    Request { title: String, detail: String },

    /// The request was sent but the transport failed (DNS, connect, TLS, timeout).
    #[error("'{title}': request failed: {detail}")]
    Transport { title: String, detail: String },
}

impl PostError {
    /// Title of the page the failure belongs to.
    pub fn title(&self) -> &str {
        match self {
            PostError::Encode { title, .. }
            | PostError::Request { title, .. }
            | PostError::Transport { title, .. } => title,
        }
    }
}

//! Progress-callback trait for per-page migration events.
//!
//! Inject an [`Arc<dyn MigrationProgressCallback>`] via
//! [`crate::config::MigrationConfigBuilder::progress_callback`] to receive
//! events as each page is converted and posted. The CLI uses this to drive its
//! progress bar; library callers can forward events wherever they like.
//!
//! # Example
//!
//! ```rust
//! use scrapbox2esa::{MigrationConfig, MigrationProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     published: AtomicUsize,
//! }
//!
//! impl MigrationProgressCallback for CountingCallback {
//!     fn on_page_published(&self, index: usize, total: usize, title: &str, status: u16) {
//!         self.published.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {title}: HTTP {status}", index + 1, total);
//!     }
//! }
//!
//! let cb = Arc::new(CountingCallback { published: AtomicUsize::new(0) });
//! let config = MigrationConfig::builder("team", "token")
//!     .progress_callback(cb as Arc<dyn MigrationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the migration driver as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Pages are processed one at a time, in export order.
pub trait MigrationProgressCallback: Send + Sync {
    /// Called once after the export is loaded, before the first page.
    fn on_migration_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page's post is sent.
    ///
    /// # Arguments
    /// * `index` — 0-indexed position in the export
    /// * `total_pages` — pages in the export
    /// * `title` — page title
    fn on_page_start(&self, index: usize, total_pages: usize, title: &str) {
        let _ = (index, total_pages, title);
    }

    /// Called when the server answered the create-post call (any status).
    fn on_page_published(&self, index: usize, total_pages: usize, title: &str, status: u16) {
        let _ = (index, total_pages, title, status);
    }

    /// Called when a page could not be sent.
    fn on_page_error(&self, index: usize, total_pages: usize, title: &str, error: &str) {
        let _ = (index, total_pages, title, error);
    }

    /// Called once after every page has been attempted.
    fn on_migration_complete(&self, total_pages: usize, published: usize) {
        let _ = (total_pages, published);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl MigrationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::MigrationConfig`].
pub type ProgressCallback = Arc<dyn MigrationProgressCallback>;

//! # scrapbox2esa
//!
//! Move a Scrapbox project to esa.io: convert every page of a Scrapbox JSON
//! export to esa Markdown and create one esa post per page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! export.json
//!  │
//!  ├─ 1. Export         decode pages (fatal on failure)
//!  ├─ 2. Transliterate  indentation + 8 rewrite rules per line
//!  ├─ 3. Assemble       first line → `# title`, lines joined with '\n'
//!  └─ 4. Publish        POST /v1/teams/{team}/posts, one page at a time
//! ```
//!
//! ## Markup mapping
//!
//! | Scrapbox | esa Markdown |
//! |----------|--------------|
//! | leading spaces | tabs, last tab → `* ` bullet |
//! | `[#Page]` | `[***Page***](/#)` (fix the target by hand) |
//! | `[* text]` | `**text**` |
//! | `[** text]` | `## text` |
//! | `[label http://…]`, `[http://… label]` | `[label](http://…)` |
//! | `[https://gyazo.com/…]`, `[http://….png]` | `![image](…)` |
//! | `[- text]` | `~~text~~` |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrapbox2esa::{migrate, MigrationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let token = std::env::var("ESA_ACCESS_TOKEN")?;
//!     let config = MigrationConfig::builder("my-team", token).build()?;
//!     let report = migrate("export.json", &config).await?;
//!     eprintln!("{}/{} pages published",
//!         report.stats.published_pages,
//!         report.stats.total_pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `scrapbox2esa` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod migrate;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{MigrationConfig, MigrationConfigBuilder};
pub use error::{MigrateError, PostError};
pub use migrate::{convert_export, migrate, migrate_pages, migrate_with, ConvertedPage};
pub use output::{MigrationReport, MigrationStats, PageOutcome};
pub use pipeline::assemble::{assemble_body, assemble_post};
pub use pipeline::export::{parse_export, read_export, Export, Page};
pub use pipeline::publish::{EsaClient, Post, PublishReceipt, Publisher};
pub use pipeline::transliterate::Transliterator;
pub use progress::{MigrationProgressCallback, NoopProgressCallback, ProgressCallback};

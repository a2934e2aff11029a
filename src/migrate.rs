//! Migration entry points: read the export, convert each page, post it.
//!
//! Pages are handled strictly one after another. A fatal problem (export
//! missing or malformed, bad config) is returned before any post is sent; a
//! problem posting one page is logged, recorded in its [`PageOutcome`], and
//! the run carries on with the next page.

use crate::config::MigrationConfig;
use crate::error::MigrateError;
use crate::output::{MigrationReport, MigrationStats, PageOutcome};
use crate::pipeline::assemble::{assemble_body, assemble_post};
use crate::pipeline::export::{read_export, Page};
use crate::pipeline::publish::{EsaClient, Publisher};
use crate::pipeline::transliterate::Transliterator;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Migrate a Scrapbox export file to esa.
///
/// # Errors
/// Returns `Err(MigrateError)` only for fatal errors:
/// - export file not found / unreadable / malformed
/// - the HTTP client cannot be created
///
/// Per-page publish failures are reported in the returned
/// [`MigrationReport`].
pub async fn migrate(
    export_path: impl AsRef<Path>,
    config: &MigrationConfig,
) -> Result<MigrationReport, MigrateError> {
    let client = EsaClient::new(config)?;
    info!("Publishing to {}", client.posts_url());
    migrate_with(export_path, &client, config).await
}

/// Like [`migrate`], but posting through any [`Publisher`].
pub async fn migrate_with<P: Publisher>(
    export_path: impl AsRef<Path>,
    publisher: &P,
    config: &MigrationConfig,
) -> Result<MigrationReport, MigrateError> {
    let transliterator = Transliterator::new()?;
    let export = read_export(export_path)?;

    let mut report = migrate_pages(&export.pages, &transliterator, publisher, config).await;
    report.export_name = export.name;
    Ok(report)
}

/// Convert and post already-decoded pages, one at a time, in order.
pub async fn migrate_pages<P: Publisher>(
    pages: &[Page],
    transliterator: &Transliterator,
    publisher: &P,
    config: &MigrationConfig,
) -> MigrationReport {
    let start = Instant::now();
    let total = pages.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_migration_start(total);
    }

    let mut outcomes = Vec::with_capacity(total);
    let mut stats = MigrationStats {
        total_pages: total,
        ..Default::default()
    };

    for (index, page) in pages.iter().enumerate() {
        info!("[{}/{}] {}", index + 1, total, page.title);
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(index, total, &page.title);
        }

        let post = assemble_post(transliterator, page, config);
        debug!(
            "'{}': {} lines, {} bytes of markdown",
            page.title,
            page.lines.len(),
            post.body_md.len()
        );

        let mut outcome = PageOutcome {
            index,
            title: page.title.clone(),
            line_count: page.lines.len(),
            status: None,
            error: None,
        };

        match publisher.publish(&post).await {
            Ok(receipt) => {
                if receipt.is_success() {
                    info!(status = receipt.status, "'{}': {}", page.title, receipt.body);
                } else {
                    warn!(
                        status = receipt.status,
                        "'{}' rejected by server: {}",
                        page.title,
                        receipt.body
                    );
                    stats.rejected_pages += 1;
                }
                stats.published_pages += 1;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_published(index, total, &page.title, receipt.status);
                }
                outcome.status = Some(receipt.status);
            }
            Err(e) => {
                // ERROR so the failure survives `--quiet`.
                error!(index = index + 1, total, "Skipping page: {}", e);
                stats.failed_pages += 1;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(index, total, &page.title, &e.to_string());
                }
                outcome.error = Some(e);
            }
        }

        outcomes.push(outcome);
    }

    stats.total_duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Migration complete: {}/{} pages published, {} failed, {}ms",
        stats.published_pages, total, stats.failed_pages, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_migration_complete(total, stats.published_pages);
    }

    MigrationReport {
        export_name: String::new(),
        pages: outcomes,
        stats,
    }
}

/// A page converted to esa Markdown without being posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedPage {
    pub title: String,
    pub body_md: String,
}

/// Convert every page of an export without publishing anything.
pub fn convert_export(export_path: impl AsRef<Path>) -> Result<Vec<ConvertedPage>, MigrateError> {
    let transliterator = Transliterator::new()?;
    let export = read_export(export_path)?;
    Ok(export
        .pages
        .iter()
        .map(|page| ConvertedPage {
            title: page.title.clone(),
            body_md: assemble_body(&transliterator, &page.lines),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PostError;
    use crate::pipeline::publish::{Post, PublishReceipt};
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Answers with the given statuses in order; `None` means transport failure.
    struct ScriptedPublisher {
        script: Mutex<Vec<Option<u16>>>,
        seen: Mutex<Vec<Post>>,
    }

    impl ScriptedPublisher {
        fn new(mut script: Vec<Option<u16>>) -> Self {
            script.reverse();
            Self {
                script: Mutex::new(script),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Publisher for ScriptedPublisher {
        async fn publish(&self, post: &Post) -> Result<PublishReceipt, PostError> {
            self.seen.lock().unwrap().push(post.clone());
            match self.script.lock().unwrap().pop().flatten() {
                Some(status) => Ok(PublishReceipt {
                    status,
                    body: "{}".into(),
                }),
                None => Err(PostError::Transport {
                    title: post.name.clone(),
                    detail: "connection reset".into(),
                }),
            }
        }
    }

    fn page(title: &str, lines: &[&str]) -> Page {
        Page {
            title: title.into(),
            created: 0,
            updated: 0,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn config() -> MigrationConfig {
        MigrationConfig::builder("team", "token").build().unwrap()
    }

    /// In-memory log sink for asserting on emitted events.
    #[derive(Clone, Default)]
    struct LogBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuf {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    /// Run `migrate_pages` with only events at `level` or above captured.
    fn run_logged(pages: &[Page], script: Vec<Option<u16>>, level: tracing::Level) -> String {
        let logs = LogBuf::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        let publisher = ScriptedPublisher::new(script);
        let t = Transliterator::new().unwrap();

        tracing::subscriber::with_default(subscriber, || {
            tokio_test::block_on(migrate_pages(pages, &t, &publisher, &config()))
        });
        logs.text()
    }

    #[test]
    fn stats_count_published_failed_and_rejected() {
        let pages = vec![
            page("a", &["a"]),
            page("b", &["b"]),
            page("c", &["c"]),
            page("d", &["d"]),
        ];
        let publisher = ScriptedPublisher::new(vec![Some(201), None, Some(400), Some(201)]);
        let t = Transliterator::new().unwrap();

        let report = tokio_test::block_on(migrate_pages(&pages, &t, &publisher, &config()));

        assert_eq!(report.stats.total_pages, 4);
        assert_eq!(report.stats.published_pages, 3);
        assert_eq!(report.stats.failed_pages, 1);
        assert_eq!(report.stats.rejected_pages, 1);
        assert_eq!(report.pages[1].error.as_ref().map(|e| e.title()), Some("b"));
        assert_eq!(report.pages[2].status, Some(400));
        assert_eq!(report.failed().count(), 1);
    }

    #[test]
    fn posts_are_sent_in_export_order() {
        let pages = vec![page("first", &["first"]), page("second", &["second", " x"])];
        let publisher = ScriptedPublisher::new(vec![Some(201), Some(201)]);
        let t = Transliterator::new().unwrap();

        tokio_test::block_on(migrate_pages(&pages, &t, &publisher, &config()));

        let seen = publisher.seen.lock().unwrap();
        let names: Vec<_> = seen.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert_eq!(seen[1].body_md, "# second\n* x\n");
    }

    #[test]
    fn failed_page_is_logged_at_error_level() {
        let pages = vec![page("Kept", &["Kept"]), page("LostPage", &["LostPage"])];

        let logs = run_logged(&pages, vec![Some(201), None], tracing::Level::ERROR);

        assert!(logs.contains("ERROR"), "logs: {logs}");
        assert!(logs.contains("'LostPage'"), "logs: {logs}");
        assert!(logs.contains("connection reset"), "logs: {logs}");
        assert!(!logs.contains("Kept"), "only the failure passes an error filter: {logs}");
    }

    #[test]
    fn rejected_page_logs_response_body_at_warn_level() {
        let pages = vec![page("Denied", &["Denied"])];

        let logs = run_logged(&pages, vec![Some(403)], tracing::Level::WARN);

        assert!(logs.contains("WARN"), "logs: {logs}");
        assert!(logs.contains("'Denied' rejected by server: {}"), "logs: {logs}");
        assert!(logs.contains("status=403"), "logs: {logs}");
    }

    #[test]
    fn empty_export_publishes_nothing() {
        let publisher = ScriptedPublisher::new(vec![]);
        let t = Transliterator::new().unwrap();
        let report = tokio_test::block_on(migrate_pages(&[], &t, &publisher, &config()));
        assert_eq!(report.stats, MigrationStats {
            total_duration_ms: report.stats.total_duration_ms,
            ..Default::default()
        });
        assert!(publisher.seen.lock().unwrap().is_empty());
    }
}

//! CLI binary for scrapbox2esa.
//!
//! A thin shim over the library crate that maps arguments to
//! `MigrationConfig`, runs the migration, and prints a summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use scrapbox2esa::{migrate, MigrationConfig, MigrationProgressCallback, ProgressCallback};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the whole export plus a log line
/// per page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>4}/{len} pages  ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        bar.set_prefix("Publishing");
        Arc::new(Self { bar })
    }
}

/// Shorten long titles and error messages to keep one page per terminal line.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}\u{2026}")
    } else {
        s.to_string()
    }
}

impl MigrationProgressCallback for CliProgressCallback {
    fn on_migration_start(&self, total_pages: usize) {
        // Not ticking before this point: a fatal export error must not leave a spinner.
        self.bar.set_length(total_pages as u64);
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_page_start(&self, _index: usize, _total: usize, title: &str) {
        self.bar.set_message(truncate(title, 40));
    }

    fn on_page_published(&self, index: usize, total: usize, title: &str, status: u16) {
        let mark = if (200..300).contains(&status) {
            green("✓")
        } else {
            yellow("⚠")
        };
        self.bar.println(format!(
            "  {} {:>4}/{:<4} {}  {}",
            mark,
            index + 1,
            total,
            truncate(title, 60),
            dim(&format!("HTTP {status}")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, index: usize, total: usize, title: &str, error: &str) {
        self.bar.println(format!(
            "  {} {:>4}/{:<4} {}  {}",
            red("✗"),
            index + 1,
            total,
            truncate(title, 60),
            red(&truncate(error, 80)),
        ));
        self.bar.inc(1);
    }

    fn on_migration_complete(&self, _total_pages: usize, _published: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Publish every page of a Scrapbox export to https://my-team.esa.io
  export ESA_ACCESS_TOKEN=...
  scrapbox2esa my-team ./my-project.json

  # Show per-rule rewrite details
  scrapbox2esa -v my-team ./my-project.json

ENVIRONMENT VARIABLES:
  ESA_ACCESS_TOKEN   esa.io personal access token (write scope), sent as a Bearer token
  RUST_LOG           Override the log filter (e.g. scrapbox2esa=debug)

NOTES:
  Every run creates new posts; running twice creates duplicates.
  Links between pages become [***Title***](/#) and must be fixed by hand,
  because esa numbers posts in creation order.
"#;

/// Publish a Scrapbox export to esa.io.
#[derive(Parser, Debug)]
#[command(
    name = "scrapbox2esa",
    version,
    about = "Convert a Scrapbox JSON export to esa Markdown and publish each page as a post",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// esa team name (the `my-team` in my-team.esa.io).
    team: String,

    /// Path to the Scrapbox JSON export.
    export: PathBuf,

    /// esa access token, read from ESA_ACCESS_TOKEN.
    #[arg(
        long,
        env = "ESA_ACCESS_TOKEN",
        value_name = "ESA_ACCESS_TOKEN",
        hide = true,
        hide_env_values = true
    )]
    access_token: String,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs unless --verbose asks for them.
    let show_progress = !cli.quiet && !cli.verbose;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter(&cli))),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn MigrationProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    let report = migrate(&cli.export, &config)
        .await
        .with_context(|| format!("Migration of {:?} failed", cli.export))?;

    if !cli.quiet {
        let stats = &report.stats;
        eprintln!(
            "{}  {}/{} pages published to {}  {}ms",
            if stats.failed_pages == 0 && stats.rejected_pages == 0 {
                green("✔")
            } else {
                yellow("⚠")
            },
            bold(&stats.published_pages.to_string()),
            stats.total_pages,
            bold(&format!("{}.esa.io", cli.team)),
            stats.total_duration_ms,
        );
        if stats.rejected_pages > 0 {
            eprintln!("   {} pages rejected by the server", yellow(&stats.rejected_pages.to_string()));
        }
        for page in report.failed() {
            if let Some(ref e) = page.error {
                eprintln!("   {} {}", red("✗"), e);
            }
        }
    }

    Ok(())
}

/// Log filter used when `RUST_LOG` is unset.
///
/// Failed pages are logged at ERROR, so they show even with `--quiet`;
/// the default keeps WARN for the response body of rejected posts.
fn default_log_filter(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    }
}

/// Map CLI args to `MigrationConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<MigrationConfig> {
    let mut builder = MigrationConfig::builder(&cli.team, &cli.access_token);
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_is_a_usage_error() {
        let err = Cli::try_parse_from(["scrapbox2esa"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn missing_export_path_is_a_usage_error() {
        let err = Cli::try_parse_from(["scrapbox2esa", "my-team", "--access-token", "t"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn missing_access_token_is_a_usage_error() {
        // Only this test touches the variable.
        std::env::remove_var("ESA_ACCESS_TOKEN");

        let err = Cli::try_parse_from(["scrapbox2esa", "my-team", "export.json"]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
        assert!(err.to_string().contains("ESA_ACCESS_TOKEN"), "{err}");
    }

    #[test]
    fn token_flag_is_hidden_from_help() {
        let help = Cli::command().render_long_help().to_string();
        assert!(!help.contains("--access-token"), "{help}");
    }

    #[test]
    fn positional_arguments_map_to_config() {
        let cli = Cli::try_parse_from([
            "scrapbox2esa",
            "my-team",
            "export.json",
            "--access-token",
            "secret",
        ])
        .unwrap();

        assert_eq!(cli.export, PathBuf::from("export.json"));
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.team, "my-team");
        assert_eq!(config.access_token, "secret");
    }

    #[test]
    fn quiet_still_lets_page_failures_through() {
        let quiet = Cli::try_parse_from(["scrapbox2esa", "-q", "t", "e.json", "--access-token", "x"])
            .unwrap();
        let default = Cli::try_parse_from(["scrapbox2esa", "t", "e.json", "--access-token", "x"])
            .unwrap();
        let verbose = Cli::try_parse_from(["scrapbox2esa", "-v", "t", "e.json", "--access-token", "x"])
            .unwrap();

        assert_eq!(default_log_filter(&quiet), "error");
        assert_eq!(default_log_filter(&default), "warn");
        assert_eq!(default_log_filter(&verbose), "debug");
    }
}

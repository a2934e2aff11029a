//! Configuration types for a Scrapbox → esa migration.
//!
//! Everything a run needs is carried in [`MigrationConfig`], built via
//! [`MigrationConfigBuilder`]. The destination team and the bearer credential
//! are required; the rest has defaults that match what esa expects from an
//! import bot.

use crate::error::MigrateError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Default esa API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.esa.io/v1";

/// Category every imported post is filed under.
pub const DEFAULT_CATEGORY: &str = "scrapbox";

/// Screen name posts are created as.
pub const DEFAULT_USER: &str = "esa_bot";

/// Configuration for a migration run.
///
/// # Example
/// ```rust
/// use scrapbox2esa::MigrationConfig;
///
/// let config = MigrationConfig::builder("my-team", "token")
///     .timeout_secs(10)
///     .build()
///     .unwrap();
/// assert_eq!(config.category, "scrapbox");
/// ```
#[derive(Clone)]
pub struct MigrationConfig {
    /// esa team name (the `{team}` in `{team}.esa.io`).
    pub team: String,

    /// Bearer credential sent with every create-post call.
    pub access_token: String,

    /// API root. Default: `https://api.esa.io/v1`.
    pub api_base_url: String,

    /// Category assigned to every post. Default: `scrapbox`.
    pub category: String,

    /// Screen name of the submitting user. Default: `esa_bot`.
    pub user: String,

    /// Create posts as work in progress. Default: false.
    pub wip: bool,

    /// Tags attached to every post. Default: none.
    pub tags: Vec<String>,

    /// Change message recorded with every post. Default: none.
    pub message: Option<String>,

    /// Per-request timeout in seconds. Default: 30.
    pub timeout_secs: u64,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for MigrationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationConfig")
            .field("team", &self.team)
            .field("access_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("category", &self.category)
            .field("user", &self.user)
            .field("wip", &self.wip)
            .field("tags", &self.tags)
            .field("message", &self.message)
            .field("timeout_secs", &self.timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn MigrationProgressCallback>"),
            )
            .finish()
    }
}

impl MigrationConfig {
    /// Create a new builder for `MigrationConfig`.
    pub fn builder(team: impl Into<String>, access_token: impl Into<String>) -> MigrationConfigBuilder {
        MigrationConfigBuilder {
            config: MigrationConfig {
                team: team.into(),
                access_token: access_token.into(),
                api_base_url: DEFAULT_API_BASE_URL.to_string(),
                category: DEFAULT_CATEGORY.to_string(),
                user: DEFAULT_USER.to_string(),
                wip: false,
                tags: Vec::new(),
                message: None,
                timeout_secs: crate::pipeline::publish::DEFAULT_TIMEOUT_SECS,
                progress_callback: None,
            },
        }
    }
}

/// Builder for [`MigrationConfig`].
#[derive(Debug)]
pub struct MigrationConfigBuilder {
    config: MigrationConfig,
}

impl MigrationConfigBuilder {
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.config.category = category.into();
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.user = user.into();
        self
    }

    pub fn wip(mut self, v: bool) -> Self {
        self.config.wip = v;
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.config.tags = tags;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.config.message = Some(message.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<MigrationConfig, MigrateError> {
        let c = &self.config;
        if c.team.trim().is_empty() {
            return Err(MigrateError::InvalidConfig("team name must not be empty".into()));
        }
        if c.team.contains('/') {
            return Err(MigrateError::InvalidConfig(format!(
                "team name must not contain '/', got '{}'",
                c.team
            )));
        }
        if c.access_token.trim().is_empty() {
            return Err(MigrateError::InvalidConfig(
                "access token must not be empty (set ESA_ACCESS_TOKEN)".into(),
            ));
        }
        if !c.api_base_url.starts_with("http://") && !c.api_base_url.starts_with("https://") {
            return Err(MigrateError::InvalidConfig(format!(
                "API base URL must be http(s), got '{}'",
                c.api_base_url
            )));
        }
        if c.timeout_secs == 0 {
            return Err(MigrateError::InvalidConfig("timeout must be ≥ 1 second".into()));
        }
        Ok(self.config)
    }
}

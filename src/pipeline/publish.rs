//! Publishing: submit one post per page to the esa.io API.
//!
//! This is the only stage with network I/O. A failed post is reported as a
//! [`PostError`] for that page; the caller logs it and moves on. Whatever the
//! server answers (any status) is handed back as a [`PublishReceipt`] for
//! logging only.

use crate::config::MigrationConfig;
use crate::error::{MigrateError, PostError};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// A new esa post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub name: String,
    pub body_md: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub category: String,
    pub wip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: String,
}

/// Request envelope expected by `POST /v1/teams/{team}/posts`.
#[derive(Serialize)]
struct CreatePostRequest<'a> {
    post: &'a Post,
}

impl Post {
    /// JSON request body for the create-post call.
    pub fn to_request_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&CreatePostRequest { post: self })
    }
}

/// What the server answered. Not inspected beyond logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub status: u16,
    pub body: String,
}

impl PublishReceipt {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Destination for converted pages.
///
/// [`EsaClient`] is the production implementation; tests substitute their own.
pub trait Publisher {
    fn publish(&self, post: &Post) -> impl Future<Output = Result<PublishReceipt, PostError>> + Send;
}

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// esa.io REST API client.
pub struct EsaClient {
    client: reqwest::Client,
    posts_url: String,
    access_token: String,
}

impl EsaClient {
    /// Create a client for the team and credential in `config`.
    pub fn new(config: &MigrationConfig) -> Result<Self, MigrateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MigrateError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            posts_url: posts_url(&config.api_base_url, &config.team),
            access_token: config.access_token.clone(),
        })
    }

    /// The create-post endpoint this client submits to.
    pub fn posts_url(&self) -> &str {
        &self.posts_url
    }
}

impl Publisher for EsaClient {
    async fn publish(&self, post: &Post) -> Result<PublishReceipt, PostError> {
        let body = post.to_request_json().map_err(|e| PostError::Encode {
            title: post.name.clone(),
            detail: e.to_string(),
        })?;

        let request = self
            .client
            .post(&self.posts_url)
            .bearer_auth(&self.access_token)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .build()
            .map_err(|e| PostError::Request {
                title: post.name.clone(),
                detail: e.to_string(),
            })?;

        debug!("POST {} ({:?})", self.posts_url, post.name);

        let transport = |e: reqwest::Error| PostError::Transport {
            title: post.name.clone(),
            detail: e.to_string(),
        };
        let response = self.client.execute(request).await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;

        Ok(PublishReceipt { status, body })
    }
}

/// `{base}/teams/{team}/posts`, tolerating a trailing slash on `base`.
pub fn posts_url(api_base_url: &str, team: &str) -> String {
    format!("{}/teams/{}/posts", api_base_url.trim_end_matches('/'), team)
}

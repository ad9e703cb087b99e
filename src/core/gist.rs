//! Gist publishing.
//!
//! Uploads an encrypted payload as a private GitHub gist and returns the URL
//! of its raw content, which can then be used as a secrets URL.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, trace};

use crate::core::constants;
use crate::error::{PublishError, Result};

const SCOPES_HEADER: &str = "x-oauth-scopes";
const GIST_SCOPE: &str = "gist";

/// Hosted-document publisher.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Upload `content` and return a URL from which it can be retrieved.
    async fn publish(&self, content: &str) -> Result<String>;
}

#[derive(Deserialize)]
struct GistResponse {
    html_url: String,
}

/// Publisher backed by the GitHub gists API.
pub struct GistPublisher {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl GistPublisher {
    /// Create a publisher for the given API base and token.
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("fnsecrets/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(PublishError::Transport)?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Check that the token may create gists.
    ///
    /// Classic tokens report their scopes in a response header; fine-grained
    /// tokens send no such header and are accepted as-is.
    async fn check_scope(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/user", self.api_url))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(PublishError::Transport)?;

        if !response.status().is_success() {
            return Err(PublishError::Unauthorized(response.status()).into());
        }

        if let Some(scopes) = response.headers().get(SCOPES_HEADER) {
            let scopes = scopes.to_str().unwrap_or_default();
            trace!(scopes, "token scopes");
            if !scopes.split(',').any(|s| s.trim() == GIST_SCOPE) {
                return Err(PublishError::MissingScope(scopes.to_string()).into());
            }
        }

        Ok(())
    }
}

/// File name for a gist created now.
pub fn gist_file_name() -> String {
    format!(
        "{}-{}.json",
        constants::GIST_FILE_PREFIX,
        chrono::Utc::now().timestamp_millis()
    )
}

#[async_trait]
impl Publisher for GistPublisher {
    async fn publish(&self, content: &str) -> Result<String> {
        self.check_scope().await?;

        let file_name = gist_file_name();
        let mut files = serde_json::Map::new();
        files.insert(file_name.clone(), json!({ "content": content }));
        let body = json!({ "public": false, "files": files });

        trace!(file = %file_name, content_len = content.len(), "creating gist");

        let response = self
            .client
            .post(format!("{}/gists", self.api_url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(PublishError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::CreateFailed { status, body }.into());
        }

        let gist: GistResponse = response.json().await.map_err(PublishError::Transport)?;
        let url = format!("{}/raw", gist.html_url);

        debug!(url = %url, "gist created");
        Ok(url)
    }
}

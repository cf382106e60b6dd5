//! GitHub REST client implementing [`CheckRunSource`].

use async_trait::async_trait;
use enforcer_core::{CheckRun, CheckRunSource, CommitRef, SourceResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{GitHubError, Result};
use crate::models::{ApiMessage, Branch, CheckRunsPage};

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Largest page size the check-runs endpoint accepts.
pub const MAX_PER_PAGE: u8 = 100;

const API_VERSION: &str = "2022-11-28";

/// Connection settings for [`GitHubClient`].
#[derive(Clone)]
pub struct GitHubConfig {
    /// API base URL (GitHub Enterprise servers use `https://host/api/v3`)
    pub api_url: String,
    owner: String,
    repo: String,
    token: String,
    /// Check runs requested per page
    pub per_page: u8,
}

impl GitHubConfig {
    /// Settings for `owner/name` against the public API.
    pub fn new(repository: &str, token: &str) -> Result<Self> {
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty() && !r.contains('/'))
            .ok_or_else(|| GitHubError::InvalidRepository(repository.to_string()))?;

        Ok(Self {
            api_url: DEFAULT_API_URL.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
            per_page: MAX_PER_PAGE,
        })
    }

    /// Point at a different API base URL.
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_url", &self.api_url)
            .field("repository", &self.repository())
            .field("token", &"<redacted>")
            .field("per_page", &self.per_page)
            .finish()
    }
}

/// Read-only GitHub client for branch heads and check runs.
pub struct GitHubClient {
    config: GitHubConfig,
    http_client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(API_VERSION),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| GitHubError::ClientBuild(format!("invalid token: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("pr-enforcer/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| GitHubError::ClientBuild(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    /// `{api_url}/repos/{owner}/{repo}/{tail...}` with each segment escaped.
    pub(crate) fn repo_url(&self, tail: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.api_url)
            .map_err(|e| GitHubError::InvalidUrl(format!("{}: {e}", self.config.api_url)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| GitHubError::InvalidUrl(self.config.api_url.clone()))?;
            segments
                .pop_if_empty()
                .extend(["repos", self.config.owner.as_str(), self.config.repo.as_str()])
                .extend(tail);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(url = %url, "GET");
        let response = self.http_client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GitHubError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                message: error_message(&body),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Resolve the head commit SHA of `branch`.
    pub async fn branch_head(&self, branch: &str) -> Result<CommitRef> {
        info!(branch = %branch, "GitHub: fetching branch");
        let branch: Branch = self.get_json(self.repo_url(&["branches", branch])?).await?;
        info!(branch = %branch.name, sha = %branch.commit.sha, "GitHub: resolved head commit");
        Ok(CommitRef(branch.commit.sha))
    }

    /// Every check-run attempt on `commit`, following pagination.
    pub async fn check_runs(&self, commit: &CommitRef) -> Result<Vec<CheckRun>> {
        info!("GitHub: fetching check runs");
        let base = self.repo_url(&["commits", commit.as_str(), "check-runs"])?;

        let mut runs = Vec::new();
        let mut page = 1u32;
        loop {
            let mut url = base.clone();
            url.query_pairs_mut()
                .append_pair("filter", "all")
                .append_pair("per_page", &self.config.per_page.to_string())
                .append_pair("page", &page.to_string());

            let batch: CheckRunsPage = self.get_json(url).await?;
            let page_len = batch.check_runs.len();
            runs.extend(batch.check_runs);
            debug!(page, page_len, total = batch.total_count, "Fetched check-run page");

            if !has_more(runs.len(), batch.total_count, page_len) {
                break;
            }
            page += 1;
        }
        Ok(runs)
    }
}

#[async_trait]
impl CheckRunSource for GitHubClient {
    async fn branch_head_commit(&self, branch: &str) -> SourceResult<CommitRef> {
        Ok(self.branch_head(branch).await?)
    }

    async fn fetch_check_runs(&self, commit: &CommitRef) -> SourceResult<Vec<CheckRun>> {
        Ok(self.check_runs(commit).await?)
    }
}

/// Whether another page should be requested.
fn has_more(fetched: usize, total_count: u64, last_page_len: usize) -> bool {
    last_page_len > 0 && (fetched as u64) < total_count
}

/// GitHub's `message` field when present, otherwise the first line of the body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiMessage>(body) {
        Ok(msg) => msg.message,
        Err(_) => body.lines().next().unwrap_or_default().chars().take(200).collect(),
    }
}

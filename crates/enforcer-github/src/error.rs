//! Error types for enforcer-github

use enforcer_core::SourceError;
use thiserror::Error;

/// Errors that can occur talking to the GitHub REST API
#[derive(Error, Debug)]
pub enum GitHubError {
    /// Repository is not in `owner/name` form
    #[error("Invalid repository '{0}', expected owner/name")]
    InvalidRepository(String),

    /// API base URL could not be used to build request URLs
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Request never produced a response
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success status code
    #[error("GitHub returned {status} for {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GitHubError::Decode(err.to_string())
        } else {
            GitHubError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GitHubError {
    fn from(err: serde_json::Error) -> Self {
        GitHubError::Decode(err.to_string())
    }
}

impl From<GitHubError> for SourceError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Status {
                status: 401 | 403,
                message,
                ..
            } => SourceError::Unauthorized(message),
            GitHubError::Status {
                status: 404, url, ..
            } => SourceError::NotFound(url),
            GitHubError::Status {
                status, message, ..
            } => SourceError::Api { status, message },
            GitHubError::Http(msg) => SourceError::Transport(msg),
            GitHubError::Decode(msg) => SourceError::Decode(msg),
            GitHubError::InvalidRepository(repo) => SourceError::NotFound(repo),
            other @ (GitHubError::InvalidUrl(_) | GitHubError::ClientBuild(_)) => {
                SourceError::Transport(other.to_string())
            }
        }
    }
}

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, GitHubError>;

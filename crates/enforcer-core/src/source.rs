//! The check-run source seam.
//!
//! The poll loop only sees this trait. The GitHub client lives in the
//! `enforcer-github` crate; in-memory fakes for tests are in
//! [`crate::fakes`].

use async_trait::async_trait;

use crate::check_run::{CheckRun, CommitRef};
use crate::error::SourceError;

/// Result type for source operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Read-only access to a repository's check runs.
#[async_trait]
pub trait CheckRunSource: Send + Sync {
    /// Resolve the commit a branch currently points at.
    async fn branch_head_commit(&self, branch: &str) -> SourceResult<CommitRef>;

    /// Every check-run attempt recorded against `commit`, reruns included.
    async fn fetch_check_runs(&self, commit: &CommitRef) -> SourceResult<Vec<CheckRun>>;
}

//! GitHub REST payloads the client reads.

use enforcer_core::CheckRun;
use serde::Deserialize;

/// `GET /repos/{owner}/{repo}/branches/{branch}`
#[derive(Debug, Deserialize)]
pub struct Branch {
    pub name: String,
    pub commit: BranchCommit,
}

#[derive(Debug, Deserialize)]
pub struct BranchCommit {
    pub sha: String,
}

/// One page of `GET /repos/{owner}/{repo}/commits/{ref}/check-runs`
#[derive(Debug, Deserialize)]
pub struct CheckRunsPage {
    pub total_count: u64,
    pub check_runs: Vec<CheckRun>,
}

/// Error body GitHub attaches to non-success responses.
#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

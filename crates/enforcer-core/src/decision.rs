//! Gate decision policy.

use serde::{Deserialize, Serialize};

use crate::classify::ClassifiedBatch;

/// How the gate reacts to a failure while other checks are still running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Fail as soon as any check fails.
    #[default]
    FailFast,

    /// Wait for every check to finish before failing, so the report is complete.
    Exhaustive,
}

impl From<bool> for Strategy {
    fn from(exhaustive: bool) -> Self {
        if exhaustive {
            Strategy::Exhaustive
        } else {
            Strategy::FailFast
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::FailFast => write!(f, "fail-fast"),
            Strategy::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

/// Result of one decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Checks are still running; poll again.
    Retry,
    Success,
    Failure,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Retry)
    }
}

/// Decide the gate for one poll.
///
/// Precedence:
/// 1. any failure under fail-fast → `Failure`
/// 2. anything incomplete → `Retry`
/// 3. any failure (everything finished) → `Failure`
/// 4. otherwise → `Success`
///
/// Unrecognized runs never influence the outcome.
pub fn decide(batch: &ClassifiedBatch, strategy: Strategy) -> Outcome {
    if !batch.failed.is_empty() && strategy == Strategy::FailFast {
        return Outcome::Failure;
    }
    if !batch.incomplete.is_empty() {
        return Outcome::Retry;
    }
    if !batch.failed.is_empty() {
        return Outcome::Failure;
    }
    Outcome::Success
}

//! Check-run observations and their status/conclusion taxonomies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle stage of a check run.
///
/// `Waiting`, `Requested` and `Pending` are pre-completion stages GitHub
/// reports for Actions jobs; they count as incomplete alongside `Queued`
/// and `InProgress`. Anything else is kept verbatim in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Requested,
    Pending,
    Unknown(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Queued => "queued",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
            Status::Waiting => "waiting",
            Status::Requested => "requested",
            Status::Pending => "pending",
            Status::Unknown(raw) => raw,
        }
    }

    /// Whether the run has not reached a conclusion yet.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            Status::Queued
                | Status::InProgress
                | Status::Waiting
                | Status::Requested
                | Status::Pending
        )
    }
}

impl From<&str> for Status {
    fn from(raw: &str) -> Self {
        match raw {
            "queued" => Status::Queued,
            "in_progress" => Status::InProgress,
            "completed" => Status::Completed,
            "waiting" => Status::Waiting,
            "requested" => Status::Requested,
            "pending" => Status::Pending,
            other => Status::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        Status::from(raw.as_str())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result of a completed check run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Conclusion {
    Success,
    Failure,
    /// Not documented by GitHub but observed in the wild.
    Failed,
    Neutral,
    Skipped,
    Cancelled,
    TimedOut,
    ActionRequired,
    Stale,
    StartupFailure,
    Unknown(String),
}

/// Bucket a conclusion falls into when deciding the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConclusionClass {
    Succeeded,
    Failed,
    Ignored,
    Unrecognized,
}

impl Conclusion {
    pub fn as_str(&self) -> &str {
        match self {
            Conclusion::Success => "success",
            Conclusion::Failure => "failure",
            Conclusion::Failed => "failed",
            Conclusion::Neutral => "neutral",
            Conclusion::Skipped => "skipped",
            Conclusion::Cancelled => "cancelled",
            Conclusion::TimedOut => "timed_out",
            Conclusion::ActionRequired => "action_required",
            Conclusion::Stale => "stale",
            Conclusion::StartupFailure => "startup_failure",
            Conclusion::Unknown(raw) => raw,
        }
    }

    pub fn class(&self) -> ConclusionClass {
        match self {
            Conclusion::Success => ConclusionClass::Succeeded,
            Conclusion::Neutral | Conclusion::Skipped => ConclusionClass::Ignored,
            Conclusion::ActionRequired
            | Conclusion::Cancelled
            | Conclusion::TimedOut
            | Conclusion::Failure
            | Conclusion::Failed
            | Conclusion::Stale
            | Conclusion::StartupFailure => ConclusionClass::Failed,
            Conclusion::Unknown(_) => ConclusionClass::Unrecognized,
        }
    }
}

impl From<&str> for Conclusion {
    fn from(raw: &str) -> Self {
        match raw {
            "success" => Conclusion::Success,
            "failure" => Conclusion::Failure,
            "failed" => Conclusion::Failed,
            "neutral" => Conclusion::Neutral,
            "skipped" => Conclusion::Skipped,
            "cancelled" => Conclusion::Cancelled,
            "timed_out" => Conclusion::TimedOut,
            "action_required" => Conclusion::ActionRequired,
            "stale" => Conclusion::Stale,
            "startup_failure" => Conclusion::StartupFailure,
            other => Conclusion::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Conclusion {
    fn from(raw: String) -> Self {
        Conclusion::from(raw.as_str())
    }
}

impl From<Conclusion> for String {
    fn from(conclusion: Conclusion) -> Self {
        conclusion.as_str().to_string()
    }
}

impl std::fmt::Display for Conclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed execution of a named check against a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    /// Unique per attempt; reruns of the same check get a larger id.
    pub id: u64,

    /// Logical check identity, shared by reruns.
    pub name: String,

    pub status: Status,

    /// Only set once `status` is `completed`.
    #[serde(default)]
    pub conclusion: Option<Conclusion>,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CheckRun {
    pub fn new(id: u64, name: impl Into<String>, status: Status) -> Self {
        Self {
            id,
            name: name.into(),
            status,
            conclusion: None,
            completed_at: None,
        }
    }

    /// A completed run with the given conclusion.
    pub fn completed(id: u64, name: impl Into<String>, conclusion: Conclusion) -> Self {
        Self {
            id,
            name: name.into(),
            status: Status::Completed,
            conclusion: Some(conclusion),
            completed_at: None,
        }
    }

    pub fn with_completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at);
        self
    }

    /// Conclusion rendered for logs and summaries, `none` when absent.
    pub fn conclusion_label(&self) -> &str {
        self.conclusion.as_ref().map(|c| c.as_str()).unwrap_or("none")
    }
}

/// Commit the gate is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitRef(pub String);

impl CommitRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form (first 7 chars), the way git abbreviates SHAs.
    pub fn short(&self) -> &str {
        &self.0[..7.min(self.0.len())]
    }
}

impl std::fmt::Display for CommitRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

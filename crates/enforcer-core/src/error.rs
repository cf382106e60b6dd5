//! Error types for enforcer-core

use std::time::Duration;

use thiserror::Error;

/// Failures reported by a [`CheckRunSource`](crate::source::CheckRunSource).
///
/// None of these are retried by the poll loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Network or TLS failure before a response arrived
    #[error("Transport error: {0}")]
    Transport(String),

    /// Credentials rejected or lacking permission
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Repository, branch or commit does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success API response
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be understood
    #[error("Could not decode response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Decode(err.to_string())
    }
}

/// Non-success terminations of the poll loop.
///
/// A failed gate is not an error; it is `Verdict::Failed`.
#[derive(Error, Debug)]
pub enum EnforcerError {
    /// Checks were still running when the time budget ran out
    #[error("Timed out after {attempts} attempt(s) ({elapsed:?}); still waiting on: {}", .pending.join(", "))]
    TimedOut {
        attempts: u32,
        elapsed: Duration,
        pending: Vec<String>,
    },

    /// The check-run source failed
    #[error("Check-run source failed: {0}")]
    Source(#[from] SourceError),

    /// Invalid startup configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for enforcer-core operations
pub type Result<T> = std::result::Result<T, EnforcerError>;

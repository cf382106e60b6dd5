//! GitHub check-run source for pr-enforcer
//!
//! [`GitHubClient`] talks to the GitHub REST API (public or Enterprise) and
//! implements [`enforcer_core::CheckRunSource`]:
//! - `GET /repos/{owner}/{repo}/branches/{branch}` resolves the head commit
//! - `GET /repos/{owner}/{repo}/commits/{sha}/check-runs` lists every
//!   attempt, following pagination
//!
//! Error responses are mapped onto [`enforcer_core::SourceError`] so the
//! poll loop can treat them as fatal.

pub mod client;
pub mod error;
pub mod models;

pub use client::{GitHubClient, GitHubConfig, DEFAULT_API_URL, MAX_PER_PAGE};
pub use error::{GitHubError, Result};

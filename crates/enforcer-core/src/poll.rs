//! The bounded polling loop that drives the gate to a verdict.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, error, warn, Instrument};

use crate::check_run::{CheckRun, CommitRef};
use crate::classify::ClassifiedBatch;
use crate::config::EnforcerConfig;
use crate::decision::{decide, Outcome};
use crate::dedup::reduce_to_latest;
use crate::error::{EnforcerError, Result};
use crate::obs;
use crate::source::CheckRunSource;
use crate::summary::SummaryReporter;

/// Terminal gate result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Passed,
    Failed { failed: Vec<String> },
}

impl Verdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }
}

/// What the loop saw when it stopped.
#[derive(Debug, Clone, Serialize)]
pub struct PollReport {
    pub verdict: Verdict,

    /// Number of fetch-classify-decide cycles performed.
    pub attempts: u32,

    pub elapsed: Duration,

    /// Latest attempt per name, before the ignore set was applied.
    pub runs: Vec<CheckRun>,

    /// Names whose outcome could not be classified.
    pub unrecognized: Vec<String>,
}

/// Polls a [`CheckRunSource`] until the gate passes, fails or runs out of time.
///
/// Exactly one cycle is in flight at a time. Only "still running" is
/// retried; a source error ends the run immediately.
pub struct PollLoop {
    source: Arc<dyn CheckRunSource>,
    reporter: SummaryReporter,
    config: EnforcerConfig,
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn CheckRunSource>,
        reporter: SummaryReporter,
        config: EnforcerConfig,
    ) -> Self {
        Self {
            source,
            reporter,
            config,
        }
    }

    pub fn config(&self) -> &EnforcerConfig {
        &self.config
    }

    /// Poll `commit` until a terminal verdict.
    ///
    /// Returns `EnforcerError::TimedOut` when the next wait would overrun the
    /// budget while checks are still running, and `EnforcerError::Source` when
    /// a fetch fails. A summary is published on every exit except a fetch
    /// failure on the very first attempt.
    pub async fn run(&self, commit: &CommitRef) -> Result<PollReport> {
        self.poll(commit)
            .instrument(obs::poll_span(commit.short()))
            .await
    }

    async fn poll(&self, commit: &CommitRef) -> Result<PollReport> {
        let start = Instant::now();
        let mut attempts = 0u32;
        let mut last_seen: Option<Vec<CheckRun>> = None;

        loop {
            attempts += 1;
            obs::emit_attempt_started(attempts, start.elapsed());

            let fetched = match self.source.fetch_check_runs(commit).await {
                Ok(runs) => runs,
                Err(e) => {
                    error!(error = %e, attempt = attempts, "Fetching check runs failed");
                    if let Some(runs) = &last_seen {
                        self.reporter.report(runs);
                    }
                    return Err(e.into());
                }
            };
            debug!(count = fetched.len(), "Fetched check runs");
            for run in &fetched {
                debug!(
                    name = %run.name,
                    id = run.id,
                    status = %run.status,
                    conclusion = %run.conclusion_label(),
                );
            }

            let latest = reduce_to_latest(fetched);
            let considered = self.config.ignore.exclude(latest.clone());
            let batch = ClassifiedBatch::classify(&considered);
            batch.log();

            let outcome = decide(&batch, self.config.strategy);
            obs::emit_decided(
                attempts,
                outcome,
                batch.failed.len(),
                batch.incomplete.len(),
            );

            match outcome {
                Outcome::Success => {
                    self.reporter.report(&latest);
                    return Ok(self.finish(Verdict::Passed, attempts, start, latest, &batch));
                }
                Outcome::Failure => {
                    let failed = batch.failed_names();
                    error!(failed = ?failed, "Failed checks detected, bailing out");
                    self.reporter.report(&latest);
                    return Ok(self.finish(
                        Verdict::Failed { failed },
                        attempts,
                        start,
                        latest,
                        &batch,
                    ));
                }
                Outcome::Retry => {
                    if !batch.failed.is_empty() {
                        warn!(
                            failed = ?batch.failed_names(),
                            "Failed checks detected, waiting for the rest to finish"
                        );
                    }

                    let elapsed = start.elapsed();
                    if elapsed + self.config.interval > self.config.timeout {
                        let pending = batch.incomplete_names();
                        error!(
                            attempts,
                            elapsed_secs = elapsed.as_secs(),
                            pending = ?pending,
                            "Time budget exhausted"
                        );
                        self.reporter.report(&latest);
                        obs::emit_gate_finished(attempts, elapsed, false);
                        return Err(EnforcerError::TimedOut {
                            attempts,
                            elapsed,
                            pending,
                        });
                    }

                    last_seen = Some(latest);
                    obs::emit_retry_scheduled(self.config.interval);
                    tokio::time::sleep(self.config.interval).await;
                }
            }
        }
    }

    fn finish(
        &self,
        verdict: Verdict,
        attempts: u32,
        start: Instant,
        runs: Vec<CheckRun>,
        batch: &ClassifiedBatch,
    ) -> PollReport {
        let elapsed = start.elapsed();
        obs::emit_gate_finished(attempts, elapsed, verdict.is_passed());
        PollReport {
            verdict,
            attempts,
            elapsed,
            runs,
            unrecognized: batch.unrecognized.iter().map(|r| r.name.clone()).collect(),
        }
    }
}

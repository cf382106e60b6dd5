//! Structured lifecycle events for a gate run.
//!
//! - `poll_span` tags every line of a run with the commit under evaluation
//! - `emit_*` functions log the key transitions with a stable `event` field

use std::time::Duration;

use tracing::info;

use crate::decision::Outcome;

/// Span for one gate run; attach it with `tracing::Instrument`.
pub fn poll_span(commit: &str) -> tracing::Span {
    tracing::info_span!("enforcer.poll", commit = %commit)
}

/// Emit event: a poll attempt is starting.
pub fn emit_attempt_started(attempt: u32, elapsed: Duration) {
    info!(
        event = "poll.attempt",
        attempt = attempt,
        elapsed_secs = elapsed.as_secs(),
        "==================== Attempt {attempt} ===================="
    );
}

/// Emit event: the decision engine produced an outcome for this attempt.
pub fn emit_decided(attempt: u32, outcome: Outcome, failed: usize, incomplete: usize) {
    info!(
        event = "poll.decided",
        attempt = attempt,
        outcome = ?outcome,
        failed = failed,
        incomplete = incomplete,
    );
}

/// Emit event: checks still running, next poll scheduled.
pub fn emit_retry_scheduled(interval: Duration) {
    info!(
        event = "poll.retry",
        interval_secs = interval.as_secs(),
        "Retry in {} seconds",
        interval.as_secs()
    );
}

/// Emit event: the gate reached a terminal state.
pub fn emit_gate_finished(attempts: u32, elapsed: Duration, passed: bool) {
    info!(
        event = "gate.finished",
        attempts = attempts,
        elapsed_secs = elapsed.as_secs(),
        passed = passed,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_span_create() {
        let span = poll_span("0123456");
        let _entered = span.enter();
        emit_decided(1, Outcome::Retry, 0, 2);
    }
}

//! Partitioning of a reduced batch into gate buckets.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::check_run::{CheckRun, ConclusionClass, Status};

/// One poll's view of the checks, rebuilt from scratch every cycle.
///
/// Every input run lands in exactly one bucket. `unrecognized` holds
/// completed runs with a missing or unknown conclusion and runs with an
/// unknown status; they neither pass nor fail the gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassifiedBatch {
    pub ignored: Vec<CheckRun>,
    pub succeeded: Vec<CheckRun>,
    pub failed: Vec<CheckRun>,
    pub incomplete: Vec<CheckRun>,
    pub unrecognized: Vec<CheckRun>,
}

impl ClassifiedBatch {
    pub fn classify(runs: &[CheckRun]) -> Self {
        let mut batch = Self::default();

        for run in runs {
            let bucket = if run.status.is_incomplete() {
                &mut batch.incomplete
            } else if run.status != Status::Completed {
                &mut batch.unrecognized
            } else {
                match run.conclusion.as_ref().map(|c| c.class()) {
                    Some(ConclusionClass::Succeeded) => &mut batch.succeeded,
                    Some(ConclusionClass::Failed) => &mut batch.failed,
                    Some(ConclusionClass::Ignored) => &mut batch.ignored,
                    Some(ConclusionClass::Unrecognized) | None => &mut batch.unrecognized,
                }
            };
            bucket.push(run.clone());
        }

        batch
    }

    /// Runs that are no longer incomplete, whatever their conclusion.
    pub fn completed_count(&self) -> usize {
        self.ignored.len() + self.succeeded.len() + self.failed.len() + self.unrecognized.len()
    }

    pub fn total(&self) -> usize {
        self.completed_count() + self.incomplete.len()
    }

    pub fn failed_names(&self) -> Vec<String> {
        names(&self.failed)
    }

    pub fn incomplete_names(&self) -> Vec<String> {
        names(&self.incomplete)
    }

    /// Bucket counts at info, member names at debug, unknowns at warn.
    pub fn log(&self) {
        info!(count = self.incomplete.len(), "Waiting on completion");
        log_members("incomplete", &self.incomplete);

        info!(count = self.completed_count(), "Completed");

        info!(count = self.ignored.len(), "Ignored completion");
        log_members("ignored", &self.ignored);

        info!(count = self.succeeded.len(), "Succeeded");
        log_members("succeeded", &self.succeeded);

        info!(count = self.failed.len(), "Failed");
        log_members("failed", &self.failed);

        for run in &self.unrecognized {
            warn!(
                name = %run.name,
                status = %run.status,
                conclusion = %run.conclusion_label(),
                "Unrecognized check outcome; counted as neither success nor failure"
            );
        }
    }
}

fn names(runs: &[CheckRun]) -> Vec<String> {
    runs.iter().map(|r| r.name.clone()).collect()
}

fn log_members(bucket: &str, runs: &[CheckRun]) {
    for run in runs {
        debug!(bucket, name = %run.name, id = run.id);
    }
}

//! In-memory fakes for the source and summary seams (testing only)
//!
//! `ScriptedSource` replays canned poll results; `MemorySummary` keeps every
//! published table for inspection.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::check_run::{CheckRun, CommitRef};
use crate::error::SourceError;
use crate::source::{CheckRunSource, SourceResult};
use crate::summary::{SummaryError, SummarySink};

#[derive(Debug, Clone)]
enum Step {
    Batch(Vec<CheckRun>),
    Fail(SourceError),
}

/// Source that answers each fetch with the next scripted step.
///
/// Once the script is exhausted the final step is repeated forever.
#[derive(Debug)]
pub struct ScriptedSource {
    head: CommitRef,
    steps: Mutex<VecDeque<Step>>,
    fetches: AtomicUsize,
}

impl ScriptedSource {
    /// Answer with `batches` in order.
    pub fn new(batches: Vec<Vec<CheckRun>>) -> Self {
        Self::from_steps(batches.into_iter().map(Step::Batch).collect())
    }

    /// Answer every fetch with the same batch.
    pub fn repeating(batch: Vec<CheckRun>) -> Self {
        Self::new(vec![batch])
    }

    /// Fail every fetch.
    pub fn failing(err: SourceError) -> Self {
        Self::from_steps(VecDeque::from([Step::Fail(err)]))
    }

    /// Fail every fetch after the scripted batches have been served.
    pub fn then_fail(self, err: SourceError) -> Self {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push_back(Step::Fail(err));
        }
        self
    }

    /// Head commit returned by `branch_head_commit`.
    pub fn with_head(mut self, sha: &str) -> Self {
        self.head = CommitRef(sha.to_string());
        self
    }

    /// Number of `fetch_check_runs` calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn from_steps(steps: VecDeque<Step>) -> Self {
        Self {
            head: CommitRef("0000000000000000000000000000000000000000".to_string()),
            steps: Mutex::new(steps),
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CheckRunSource for ScriptedSource {
    async fn branch_head_commit(&self, _branch: &str) -> SourceResult<CommitRef> {
        Ok(self.head.clone())
    }

    async fn fetch_check_runs(&self, _commit: &CommitRef) -> SourceResult<Vec<CheckRun>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let mut steps = self.steps.lock().unwrap();
        let step = if steps.len() > 1 {
            steps.pop_front()
        } else {
            steps.front().cloned()
        };
        match step {
            Some(Step::Batch(runs)) => Ok(runs),
            Some(Step::Fail(err)) => Err(err),
            None => Ok(Vec::new()),
        }
    }
}

/// Summary sink that records every published table.
#[derive(Debug, Default)]
pub struct MemorySummary {
    published: Mutex<Vec<String>>,
}

impl MemorySummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

impl SummarySink for MemorySummary {
    fn publish(&self, markdown: &str) -> Result<(), SummaryError> {
        self.published.lock().unwrap().push(markdown.to_string());
        Ok(())
    }
}

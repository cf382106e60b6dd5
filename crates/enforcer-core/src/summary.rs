//! Summary table rendering and the sinks it is published to.
//!
//! Two sinks ship with the crate:
//! - `StepSummaryFile` appends to the file named by `GITHUB_STEP_SUMMARY`
//! - `LogSummary` writes the table to the log stream when no file is set
//!
//! Publishing is best effort: a sink failure is logged and never changes
//! the gate verdict.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::check_run::CheckRun;

/// Errors raised while publishing a summary.
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Failed to write summary to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for rendered summaries.
pub trait SummarySink: Send + Sync {
    fn publish(&self, markdown: &str) -> Result<(), SummaryError>;
}

/// Append-only step-summary file provided by the CI runner.
#[derive(Debug, Clone)]
pub struct StepSummaryFile {
    path: PathBuf,
}

impl StepSummaryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SummarySink for StepSummaryFile {
    fn publish(&self, markdown: &str) -> Result<(), SummaryError> {
        let write_err = |source: std::io::Error| SummaryError::Write {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        writeln!(file, "{markdown}").map_err(write_err)
    }
}

/// Fallback sink that writes the table to the log stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSummary;

impl SummarySink for LogSummary {
    fn publish(&self, markdown: &str) -> Result<(), SummaryError> {
        info!("Check summary:\n{markdown}");
        Ok(())
    }
}

/// Pick the step-summary file when one is configured, the log otherwise.
pub fn sink_for(step_summary: Option<PathBuf>) -> Arc<dyn SummarySink> {
    match step_summary {
        Some(path) => Arc::new(StepSummaryFile::new(path)),
        None => Arc::new(LogSummary),
    }
}

/// Render runs as a Markdown table.
pub fn render_table(runs: &[CheckRun]) -> String {
    let mut md = String::from("\n| Run Name | Status | Conclusion | Completed At |\n");
    md.push_str("|--------|--------|--------|--------|\n");
    for run in runs {
        let completed_at = run
            .completed_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_default();
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(&run.name),
            run.status,
            run.conclusion_label(),
            completed_at
        ));
    }
    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Renders the final run set and hands it to the configured sink.
#[derive(Clone)]
pub struct SummaryReporter {
    sink: Arc<dyn SummarySink>,
}

impl SummaryReporter {
    pub fn new(sink: Arc<dyn SummarySink>) -> Self {
        Self { sink }
    }

    pub fn report(&self, runs: &[CheckRun]) {
        if let Err(e) = self.sink.publish(&render_table(runs)) {
            warn!(error = %e, "Could not publish check summary");
        }
    }
}

impl std::fmt::Debug for SummaryReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryReporter").finish_non_exhaustive()
    }
}

//! pr-enforcer core: gate a merge on a commit's CI checks
//!
//! Each poll cycle:
//! - fetches every check-run attempt for the commit from a [`CheckRunSource`]
//! - keeps the latest attempt per check name ([`reduce_to_latest`])
//! - drops ignored names, the invoking check included ([`IgnoreSet`])
//! - buckets the rest ([`ClassifiedBatch`]) and decides ([`decide`])
//!
//! [`PollLoop`] repeats the cycle on a fixed interval until the gate passes,
//! fails, or the time budget runs out, then publishes a summary table.

pub mod annotation;
pub mod check_run;
pub mod classify;
pub mod config;
pub mod decision;
pub mod dedup;
pub mod error;
pub mod fakes;
pub mod filter;
pub mod obs;
pub mod poll;
pub mod source;
pub mod summary;
pub mod telemetry;

pub use annotation::{Annotation, AnnotationLevel};
pub use check_run::{CheckRun, CommitRef, Conclusion, ConclusionClass, Status};
pub use classify::ClassifiedBatch;
pub use config::EnforcerConfig;
pub use decision::{decide, Outcome, Strategy};
pub use dedup::reduce_to_latest;
pub use error::{EnforcerError, Result, SourceError};
pub use filter::IgnoreSet;
pub use poll::{PollLoop, PollReport, Verdict};
pub use source::{CheckRunSource, SourceResult};
pub use summary::{
    render_table, sink_for, LogSummary, StepSummaryFile, SummaryError, SummaryReporter,
    SummarySink,
};
pub use telemetry::{init_tracing, level_for};

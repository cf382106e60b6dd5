//! End-to-end gate runs against scripted check-run sources.

use std::sync::Arc;
use std::time::Duration;

use enforcer_core::fakes::{MemorySummary, ScriptedSource};
use enforcer_core::{
    CheckRun, CheckRunSource, CommitRef, Conclusion, EnforcerConfig, EnforcerError, IgnoreSet,
    PollLoop, Status, StepSummaryFile, Strategy, SummaryReporter, Verdict,
};

fn queued(id: u64, name: &str) -> CheckRun {
    CheckRun::new(id, name, Status::Queued)
}

fn running(id: u64, name: &str) -> CheckRun {
    CheckRun::new(id, name, Status::InProgress)
}

fn done(id: u64, name: &str, conclusion: Conclusion) -> CheckRun {
    CheckRun::completed(id, name, conclusion)
}

fn gate(
    source: Arc<ScriptedSource>,
    summary: Arc<MemorySummary>,
    strategy: Strategy,
    ignore: IgnoreSet,
) -> PollLoop {
    let config = EnforcerConfig::from_secs(10, 300, strategy, ignore).unwrap();
    PollLoop::new(source, SummaryReporter::new(summary), config)
}

// ---- whole pull-request lifecycles ----

#[tokio::test(start_paused = true)]
async fn rerun_of_failed_check_lets_gate_pass() {
    let source = Arc::new(ScriptedSource::new(vec![
        vec![done(1, "test", Conclusion::Failure), running(2, "lint")],
        vec![
            done(1, "test", Conclusion::Failure),
            done(2, "lint", Conclusion::Success),
            queued(3, "test"),
        ],
        vec![
            done(1, "test", Conclusion::Failure),
            done(2, "lint", Conclusion::Success),
            done(3, "test", Conclusion::Success),
        ],
    ]));
    let summary = Arc::new(MemorySummary::new());
    // Exhaustive: polling continues past the failure until rerun id 3 lands.
    let poll = gate(
        source.clone(),
        summary.clone(),
        Strategy::Exhaustive,
        IgnoreSet::default(),
    );

    let report = poll.run(&CommitRef("abc1234".to_string())).await.unwrap();
    assert_eq!(report.verdict, Verdict::Passed);
    assert_eq!(report.attempts, 3);

    let table = &summary.published()[0];
    assert!(table.contains("| test | completed | success |"));
    assert!(!table.contains("failure"));
}

#[tokio::test(start_paused = true)]
async fn ignored_and_own_checks_never_block() {
    let source = Arc::new(ScriptedSource::repeating(vec![
        running(1, "enforce-all-checks"),
        done(2, "CodeQL", Conclusion::Failure),
        queued(3, "bridgecrew"),
        done(4, "build", Conclusion::Success),
        done(5, "docs", Conclusion::Skipped),
    ]));
    let poll = gate(
        source.clone(),
        Arc::new(MemorySummary::new()),
        Strategy::FailFast,
        IgnoreSet::new(Some("enforce-all-checks"), Some("label, CodeQL, bridgecrew")),
    );

    let report = poll.run(&CommitRef("abc1234".to_string())).await.unwrap();
    assert!(report.verdict.is_passed());
    assert_eq!(report.attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn fail_fast_and_exhaustive_diverge_on_same_history() {
    let history = vec![
        vec![done(1, "lint", Conclusion::Cancelled), running(2, "test")],
        vec![
            done(1, "lint", Conclusion::Cancelled),
            done(2, "test", Conclusion::ActionRequired),
        ],
    ];

    let fast_source = Arc::new(ScriptedSource::new(history.clone()));
    let fast = gate(
        fast_source.clone(),
        Arc::new(MemorySummary::new()),
        Strategy::FailFast,
        IgnoreSet::default(),
    )
    .run(&CommitRef("abc1234".to_string()))
    .await
    .unwrap();

    let full_source = Arc::new(ScriptedSource::new(history));
    let full = gate(
        full_source.clone(),
        Arc::new(MemorySummary::new()),
        Strategy::Exhaustive,
        IgnoreSet::default(),
    )
    .run(&CommitRef("abc1234".to_string()))
    .await
    .unwrap();

    assert_eq!(
        fast.verdict,
        Verdict::Failed {
            failed: vec!["lint".to_string()]
        }
    );
    assert_eq!(fast_source.fetch_count(), 1);

    assert_eq!(
        full.verdict,
        Verdict::Failed {
            failed: vec!["lint".to_string(), "test".to_string()]
        }
    );
    assert_eq!(full_source.fetch_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn timeout_never_overruns_budget_by_more_than_an_interval() {
    let source = Arc::new(ScriptedSource::repeating(vec![queued(1, "deploy")]));
    let config =
        EnforcerConfig::from_secs(7, 30, Strategy::FailFast, IgnoreSet::default()).unwrap();
    let poll = PollLoop::new(
        source.clone(),
        SummaryReporter::new(Arc::new(MemorySummary::new())),
        config,
    );

    let err = poll.run(&CommitRef("abc1234".to_string())).await.unwrap_err();
    let (attempts, elapsed) = match err {
        EnforcerError::TimedOut {
            attempts, elapsed, ..
        } => (attempts, elapsed),
        other => panic!("expected TimedOut, got {other:?}"),
    };
    // Polls at t=0, 7, 14, 21, 28; another wait would end at 35 > 30.
    assert_eq!(attempts, 5);
    assert!(elapsed < Duration::from_secs(30));
    assert_eq!(source.fetch_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn head_commit_resolved_from_source() {
    let source = Arc::new(
        ScriptedSource::repeating(vec![done(1, "build", Conclusion::Success)])
            .with_head("feedfacecafebeef"),
    );
    let commit = source.branch_head_commit("main").await.unwrap();
    assert_eq!(commit.short(), "feedfac");

    let report = gate(
        source.clone(),
        Arc::new(MemorySummary::new()),
        Strategy::FailFast,
        IgnoreSet::default(),
    )
    .run(&commit)
    .await
    .unwrap();
    assert!(report.verdict.is_passed());
}

#[tokio::test(start_paused = true)]
async fn summary_written_to_step_summary_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("step_summary.md");

    let source = Arc::new(ScriptedSource::repeating(vec![
        done(1, "build", Conclusion::Success),
        done(2, "lint", Conclusion::Failure),
    ]));
    let config =
        EnforcerConfig::from_secs(10, 60, Strategy::FailFast, IgnoreSet::default()).unwrap();
    let poll = PollLoop::new(
        source,
        SummaryReporter::new(Arc::new(StepSummaryFile::new(&path))),
        config,
    );

    let report = poll.run(&CommitRef("abc1234".to_string())).await.unwrap();
    assert!(!report.verdict.is_passed());

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("| Run Name | Status | Conclusion | Completed At |"));
    assert!(content.contains("| build | completed | success |"));
    assert!(content.contains("| lint | completed | failure |"));
}

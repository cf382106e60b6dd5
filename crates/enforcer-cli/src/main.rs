//! pr-enforcer - wait for every CI check on a branch head, then pass or fail
//!
//! Typically run as the last job of a pull-request workflow:
//!
//! ```text
//! pr-enforcer --repository owner/repo --branch "$GITHUB_HEAD_REF" \
//!     --interval 10 --timeout 1800 --name enforce-all-checks --ignore "label, CodeQL"
//! ```
//!
//! Exit status is 0 when every considered check succeeded, 1 otherwise.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use enforcer_core::{
    init_tracing, level_for, sink_for, Annotation, AnnotationLevel, CheckRunSource,
    EnforcerConfig, IgnoreSet, PollLoop, PollReport, Strategy, SummaryReporter, Verdict,
};
use enforcer_github::{GitHubClient, GitHubConfig, DEFAULT_API_URL};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "pr-enforcer")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Gate a pull request on the CI checks of its head commit", long_about = None)]
struct Cli {
    /// GitHub token with `checks:read` on the repository
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Repository in owner/name form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// Branch whose head commit is gated
    #[arg(long)]
    branch: String,

    /// Seconds between polls of the check runs
    #[arg(long)]
    interval: u64,

    /// Overall time budget in seconds
    #[arg(long)]
    timeout: u64,

    /// Name of the check running this tool; it is never waited on
    #[arg(long)]
    name: Option<String>,

    /// Comma-separated check names to ignore
    #[arg(long)]
    ignore: Option<String>,

    /// Wait for every check to finish instead of failing on the first failure
    #[arg(long)]
    exhaustive: bool,

    /// Enable debug logs
    #[arg(long)]
    debug: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Markdown file the summary table is appended to (log output when unset)
    #[arg(long, env = "GITHUB_STEP_SUMMARY")]
    summary_file: Option<PathBuf>,
}

impl Cli {
    fn enforcer_config(&self) -> Result<EnforcerConfig> {
        let ignore = IgnoreSet::new(self.name.as_deref(), self.ignore.as_deref());
        Ok(EnforcerConfig::from_secs(
            self.interval,
            self.timeout,
            Strategy::from(self.exhaustive),
            ignore,
        )?)
    }

    fn github_config(&self) -> Result<GitHubConfig> {
        Ok(GitHubConfig::new(&self.repository, &self.token)?.with_api_url(&self.api_url))
    }

    /// Echo the effective settings; the token is never printed.
    fn log(&self) {
        info!("Using config:");
        info!("{:>10} {}", "repository", self.repository);
        info!("{:>10} {}", "branch", self.branch);
        info!("{:>10} {}", "name", self.name.as_deref().unwrap_or("-"));
        info!("{:>10} {}", "api", self.api_url);
        info!("{:>10} {}", "debug", self.debug);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json, level_for(cli.debug));

    match run(&cli).await {
        Ok(report) if conclude(&report) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            println!("{}", Annotation::gate_failed(format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<PollReport> {
    cli.log();
    let config = cli.enforcer_config().context("Invalid gate settings")?;
    config.log();

    let client = GitHubClient::new(cli.github_config()?).context("Failed to set up GitHub client")?;
    let source: Arc<dyn CheckRunSource> = Arc::new(client);

    let commit = source
        .branch_head_commit(&cli.branch)
        .await
        .with_context(|| format!("Failed to resolve head of branch '{}'", cli.branch))?;
    info!(commit = %commit, "Gating commit");

    let reporter = SummaryReporter::new(sink_for(cli.summary_file.clone()));
    let poll = PollLoop::new(source, reporter, config);
    Ok(poll.run(&commit).await?)
}

/// Emit annotations for a finished gate; true when it passed.
fn conclude(report: &PollReport) -> bool {
    for name in &report.unrecognized {
        println!(
            "{}",
            Annotation {
                level: AnnotationLevel::Warning,
                title: "Unrecognized check outcome".to_string(),
                message: format!("'{name}' finished with an unknown conclusion and was not counted"),
            }
        );
    }

    match &report.verdict {
        Verdict::Passed => {
            info!(
                attempts = report.attempts,
                elapsed_secs = report.elapsed.as_secs(),
                "All checks passed"
            );
            true
        }
        Verdict::Failed { failed } => {
            let reason = format!("Failed checks: {}", failed.join(", "));
            error!("{reason}");
            println!("{}", Annotation::gate_failed(reason));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use enforcer_core::CheckRun;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["pr-enforcer", "--token", "t", "--repository", "o/r"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_required_options() {
        let cli = parse(&["--branch", "main", "--interval", "10", "--timeout", "300"]);
        assert_eq!(cli.branch, "main");
        assert_eq!(cli.interval, 10);
        assert_eq!(cli.timeout, 300);
        assert!(!cli.exhaustive);
        assert!(cli.name.is_none());
    }

    #[test]
    fn test_missing_branch_rejected() {
        let result = Cli::try_parse_from([
            "pr-enforcer",
            "--token",
            "t",
            "--repository",
            "o/r",
            "--interval",
            "10",
            "--timeout",
            "300",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_enforcer_config_includes_self_and_ignores() {
        let cli = parse(&[
            "--branch",
            "main",
            "--interval",
            "10",
            "--timeout",
            "300",
            "--name",
            "enforce-all-checks",
            "--ignore",
            "label, CodeQL",
            "--exhaustive",
        ]);

        let config = cli.enforcer_config().unwrap();
        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.strategy, Strategy::Exhaustive);
        assert!(config.ignore.contains("enforce-all-checks"));
        assert!(config.ignore.contains("label"));
        assert!(config.ignore.contains("CodeQL"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let cli = parse(&["--branch", "main", "--interval", "0", "--timeout", "300"]);
        assert!(cli.enforcer_config().is_err());
    }

    #[test]
    fn test_bad_repository_rejected() {
        let cli = Cli::try_parse_from([
            "pr-enforcer",
            "--token",
            "t",
            "--repository",
            "not-a-repo",
            "--branch",
            "main",
            "--interval",
            "10",
            "--timeout",
            "300",
        ])
        .unwrap();
        assert!(cli.github_config().is_err());
    }

    #[test]
    fn test_conclude_reports_verdict() {
        let passed = PollReport {
            verdict: Verdict::Passed,
            attempts: 1,
            elapsed: Duration::ZERO,
            runs: vec![],
            unrecognized: vec![],
        };
        assert!(conclude(&passed));

        let failed = PollReport {
            verdict: Verdict::Failed {
                failed: vec!["lint".to_string()],
            },
            attempts: 2,
            elapsed: Duration::from_secs(10),
            runs: vec![CheckRun::new(1, "lint", enforcer_core::Status::Completed)],
            unrecognized: vec!["odd".to_string()],
        };
        assert!(!conclude(&failed));
    }
}

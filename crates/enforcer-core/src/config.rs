//! Startup configuration of the gate.

use std::time::Duration;

use tracing::info;

use crate::decision::Strategy;
use crate::error::{EnforcerError, Result};
use crate::filter::IgnoreSet;

/// Immutable settings shared by every poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcerConfig {
    /// Wait between polls while checks are still running.
    pub interval: Duration,

    /// Overall budget measured from the first poll.
    pub timeout: Duration,

    pub strategy: Strategy,

    pub ignore: IgnoreSet,
}

impl EnforcerConfig {
    /// Build a config from whole-second values as given on the command line.
    pub fn from_secs(
        interval_secs: u64,
        timeout_secs: u64,
        strategy: Strategy,
        ignore: IgnoreSet,
    ) -> Result<Self> {
        if interval_secs == 0 {
            return Err(EnforcerError::Config(
                "interval must be at least 1 second".to_string(),
            ));
        }
        Ok(Self {
            interval: Duration::from_secs(interval_secs),
            timeout: Duration::from_secs(timeout_secs),
            strategy,
            ignore,
        })
    }

    /// Echo the effective settings, one per line.
    pub fn log(&self) {
        info!("{:>10} {}s", "interval", self.interval.as_secs());
        info!("{:>10} {}s", "timeout", self.timeout.as_secs());
        info!("{:>10} {}", "strategy", self.strategy);
        info!("{:>10} {}", "ignore", self.ignore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_secs() {
        let config = EnforcerConfig::from_secs(
            10,
            300,
            Strategy::Exhaustive,
            IgnoreSet::new(Some("gate"), None),
        )
        .unwrap();

        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.strategy, Strategy::Exhaustive);
        assert!(config.ignore.contains("gate"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = EnforcerConfig::from_secs(0, 60, Strategy::FailFast, IgnoreSet::default())
            .unwrap_err();
        assert!(matches!(err, EnforcerError::Config(_)));
    }

    #[test]
    fn test_zero_timeout_allowed() {
        let config =
            EnforcerConfig::from_secs(5, 0, Strategy::FailFast, IgnoreSet::default()).unwrap();
        assert_eq!(config.timeout, Duration::ZERO);
    }
}

//! Names excluded from the gate.

use std::collections::BTreeSet;

use crate::check_run::CheckRun;

/// Check names the gate never waits on.
///
/// Always contains the invoking check's own name when one is known, so the
/// gate does not wait forever on itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    names: BTreeSet<String>,
}

impl IgnoreSet {
    /// Build the set from the invoking check's name and a comma-separated
    /// user list. Entries are trimmed; empty entries are dropped.
    pub fn new(self_name: Option<&str>, user_list: Option<&str>) -> Self {
        let mut names: BTreeSet<String> = user_list
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if let Some(own) = self_name.map(str::trim).filter(|n| !n.is_empty()) {
            names.insert(own.to_string());
        }

        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Drop every run whose name is in the set.
    pub fn exclude(&self, runs: Vec<CheckRun>) -> Vec<CheckRun> {
        runs.into_iter()
            .filter(|run| !self.contains(&run.name))
            .collect()
    }
}

impl std::fmt::Display for IgnoreSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check_run::{Conclusion, Status};

    #[test]
    fn test_user_list_is_trimmed() {
        let set = IgnoreSet::new(None, Some("label,  CodeQL , bridgecrew"));
        assert!(set.contains("label"));
        assert!(set.contains("CodeQL"));
        assert!(set.contains("bridgecrew"));
        assert!(!set.contains(" CodeQL "));
    }

    #[test]
    fn test_self_name_always_included() {
        let set = IgnoreSet::new(Some("enforce-all-checks"), None);
        assert!(set.contains("enforce-all-checks"));

        let set = IgnoreSet::new(Some("enforce-all-checks"), Some("lint"));
        assert!(set.contains("enforce-all-checks"));
        assert!(set.contains("lint"));
    }

    #[test]
    fn test_empty_entries_dropped() {
        let set = IgnoreSet::new(None, Some(" , ,"));
        assert!(set.is_empty());
        assert!(IgnoreSet::new(Some("  "), None).is_empty());
    }

    #[test]
    fn test_exclude_removes_regardless_of_outcome() {
        let set = IgnoreSet::new(Some("gate"), Some("flaky"));
        let runs = vec![
            CheckRun::new(1, "gate", Status::InProgress),
            CheckRun::completed(2, "flaky", Conclusion::Failure),
            CheckRun::completed(3, "build", Conclusion::Success),
        ];

        let kept = set.exclude(runs);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "build");
    }

    #[test]
    fn test_display_is_sorted() {
        let set = IgnoreSet::new(Some("zeta"), Some("alpha"));
        assert_eq!(set.to_string(), "alpha, zeta");
    }
}

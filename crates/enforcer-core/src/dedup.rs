//! Reduction of rerun attempts to the latest attempt per check name.

use std::collections::HashMap;

use tracing::debug;

use crate::check_run::CheckRun;

/// Keep exactly one run per name: the one with the largest `id`.
///
/// Output is ordered by the first appearance of each name in `runs`, so the
/// same input always yields the same order.
pub fn reduce_to_latest(runs: Vec<CheckRun>) -> Vec<CheckRun> {
    let mut slot_by_name: HashMap<String, usize> = HashMap::new();
    let mut attempts: Vec<usize> = Vec::new();
    let mut latest: Vec<CheckRun> = Vec::new();

    for run in runs {
        match slot_by_name.get(&run.name) {
            Some(&slot) => {
                attempts[slot] += 1;
                if run.id > latest[slot].id {
                    latest[slot] = run;
                }
            }
            None => {
                slot_by_name.insert(run.name.clone(), latest.len());
                attempts.push(1);
                latest.push(run);
            }
        }
    }

    for (run, count) in latest.iter().zip(&attempts) {
        debug!(
            name = %run.name,
            attempts = *count,
            latest_id = run.id,
            status = %run.status,
            conclusion = %run.conclusion_label(),
            "Latest attempt"
        );
    }

    latest
}

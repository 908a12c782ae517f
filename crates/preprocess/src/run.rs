//! Parallel fan-out over units and reduction of their statistics.

use std::fmt;

use fmprep_cache::{UnitKey, UnitOutcome};
use fmprep_stats::StatsAccumulator;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::PreprocessError;
use crate::processor::{UnitProcessor, UnitReport};
use crate::unit::UnitTask;

/// A unit that failed, with its rendered error.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitFailure {
    /// The failed unit.
    pub key: UnitKey,
    /// Error message.
    pub error: String,
}

/// Per-outcome counts of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Units computed and written.
    pub processed: usize,
    /// Units skipped because their cache file existed.
    pub skipped: usize,
    /// Units that produced no variables.
    pub empty: usize,
    /// Units that failed.
    pub failed: Vec<UnitFailure>,
}

impl RunSummary {
    /// Number of units accounted for.
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.empty + self.failed.len()
    }

    /// Returns `true` if no unit failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, outcome: &UnitOutcome) {
        match outcome {
            UnitOutcome::Written(_) => self.processed += 1,
            UnitOutcome::Skipped(_) => self.skipped += 1,
            UnitOutcome::Empty => self.empty += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} units: {} processed, {} skipped, {} empty, {} failed",
            self.total(),
            self.processed,
            self.skipped,
            self.empty,
            self.failed.len()
        )
    }
}

/// Result of [`run_units`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// Outcome counts and failures.
    pub summary: RunSummary,
    /// Statistics of every successful unit, merged in unit order.
    pub stats: StatsAccumulator,
}

/// Processes `tasks` on a pool of `threads` workers (`0` uses rayon's
/// default) and merges the workers' statistics in task order.
///
/// A failing unit is recorded in the summary and does not stop its
/// siblings.
///
/// # Errors
///
/// Returns [`PreprocessError::ThreadPool`] if the pool cannot be built.
pub fn run_units(
    processor: &UnitProcessor,
    tasks: &[UnitTask],
    threads: usize,
) -> Result<RunOutput, PreprocessError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| PreprocessError::ThreadPool {
            reason: e.to_string(),
        })?;
    info!(units = tasks.len(), threads = pool.current_num_threads(), "processing units");

    let results: Vec<Result<UnitReport, PreprocessError>> =
        pool.install(|| tasks.par_iter().map(|task| processor.process(task)).collect());

    let mut summary = RunSummary::default();
    let mut stats = StatsAccumulator::new();
    for (task, result) in tasks.iter().zip(results) {
        match result {
            Ok(report) => {
                summary.record(&report.outcome);
                stats.merge(report.stats);
            }
            Err(e) => {
                warn!(unit = %task.key(), error = %e, "unit failed");
                summary.failed.push(UnitFailure {
                    key: task.key().clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    info!(summary = %summary, "run complete");
    Ok(RunOutput { summary, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn summary_counts_and_display() {
        let mut s = RunSummary::default();
        s.record(&UnitOutcome::Written(PathBuf::from("a.nc")));
        s.record(&UnitOutcome::Skipped(PathBuf::from("b.nc")));
        s.record(&UnitOutcome::Empty);
        assert!(s.is_success());
        assert_eq!(s.to_string(), "3 units: 1 processed, 1 skipped, 1 empty, 0 failed");
    }
}
